// Sleeping footage: a timed playback standing in for the video, plus its lifecycle signals.

use std::time::Duration;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::config::StoryConfig;
use crate::page::{Footage, FootageProgress};
use crate::scenes::{Scenes, StorySet};
use crate::sequencer::story_enabled;

pub struct FootagePlugin;

impl Plugin for FootagePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<FootageSignal>()
            .add_systems(OnEnter(Scenes::VideoReveal), autoplay_footage)
            .add_systems(
                Update,
                (
                    (footage_controls, advance_footage)
                        .chain()
                        .in_set(StorySet::Input),
                    watch_footage_load
                        .in_set(StorySet::Input)
                        .run_if(resource_exists::<AssetServer>),
                    (log_footage_signals, footage_progress).in_set(StorySet::React),
                )
                    .run_if(story_enabled),
            );
    }
}

/// Lifecycle of the footage. Only `Ended` moves the story on.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum FootageSignal {
    Loaded,
    Error(String),
    Play,
    Pause,
    Ended,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

#[derive(Component, Debug, Clone, Default)]
pub struct Playback {
    state: PlaybackState,
    position: Duration,
}

impl Playback {
    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[cfg(test)]
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Starts from the beginning unless already playing.
    pub fn play(&mut self) -> Option<FootageSignal> {
        match self.state {
            PlaybackState::Playing => None,
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                Some(FootageSignal::Play)
            }
            PlaybackState::Idle | PlaybackState::Ended => {
                self.position = Duration::ZERO;
                self.state = PlaybackState::Playing;
                Some(FootageSignal::Play)
            }
        }
    }

    pub fn pause(&mut self) -> Option<FootageSignal> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        self.state = PlaybackState::Paused;
        Some(FootageSignal::Pause)
    }

    /// Click on the footage: pause while playing, otherwise (re)play.
    pub fn toggle(&mut self) -> Option<FootageSignal> {
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Returns `Ended` on the tick that reaches `length`.
    pub fn tick(&mut self, delta: Duration, length: Duration) -> Option<FootageSignal> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        self.position = (self.position + delta).min(length);
        if self.position < length {
            return None;
        }
        self.state = PlaybackState::Ended;
        Some(FootageSignal::Ended)
    }

    pub fn progress(&self, length: Duration) -> f32 {
        if length.is_zero() {
            return 1.0;
        }
        (self.position.as_secs_f32() / length.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Whether the frame image's load outcome has been reported yet.
#[derive(Component, Debug, Default, PartialEq, Eq)]
pub enum FootageLoad {
    #[default]
    Pending,
    Reported,
}

fn autoplay_footage(
    mut footage: Query<&mut Playback, With<Footage>>,
    mut signals: MessageWriter<FootageSignal>,
) {
    let Ok(mut playback) = footage.single_mut() else {
        return;
    };
    if let Some(signal) = playback.play() {
        signals.write(signal);
    }
}

fn footage_controls(
    mut footage: Query<(&Interaction, &mut Playback), (Changed<Interaction>, With<Footage>)>,
    mut signals: MessageWriter<FootageSignal>,
) {
    for (interaction, mut playback) in &mut footage {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if let Some(signal) = playback.toggle() {
            signals.write(signal);
        }
    }
}

fn advance_footage(
    time: Res<Time>,
    config: Res<StoryConfig>,
    mut footage: Query<&mut Playback, With<Footage>>,
    mut signals: MessageWriter<FootageSignal>,
) {
    for mut playback in &mut footage {
        if let Some(signal) = playback.tick(time.delta(), config.footage_length) {
            signals.write(signal);
        }
    }
}

fn watch_footage_load(
    asset_server: Res<AssetServer>,
    mut footage: Query<(&ImageNode, &mut FootageLoad), With<Footage>>,
    mut signals: MessageWriter<FootageSignal>,
) {
    for (image, mut load) in &mut footage {
        if *load == FootageLoad::Reported {
            continue;
        }
        match asset_server.load_state(&image.image) {
            LoadState::Loaded => signals.write(FootageSignal::Loaded),
            LoadState::Failed(err) => signals.write(FootageSignal::Error(err.to_string())),
            _ => continue,
        };
        *load = FootageLoad::Reported;
    }
}

fn log_footage_signals(mut signals: MessageReader<FootageSignal>) {
    for signal in signals.read() {
        match signal {
            FootageSignal::Loaded => info!("Footage loaded, ready for playback"),
            FootageSignal::Error(reason) => error!("Footage failed to load: {reason}"),
            FootageSignal::Play => info!("Footage playing"),
            FootageSignal::Pause => info!("Footage paused"),
            FootageSignal::Ended => info!("Footage ended"),
        }
    }
}

fn footage_progress(
    config: Res<StoryConfig>,
    footage: Query<&Playback, With<Footage>>,
    mut bar: Query<&mut Node, With<FootageProgress>>,
) {
    let Ok(playback) = footage.single() else {
        return;
    };
    let Ok(mut node) = bar.single_mut() else {
        return;
    };
    node.width = Val::Percent(playback.progress(config.footage_length) * 100.0);
}
