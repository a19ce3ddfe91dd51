// Scene sequencer: phone, footage end, the word "alone", and the cues that chain them.

use bevy::prelude::*;

use crate::config::StoryConfig;
use crate::footage::{FootageSignal, Playback};
use crate::page::{Darkness, EndCaption, Footage, Phone, Revelation, Token};
use crate::proximity::Pursuit;
use crate::scenes::{Latch, Scenes, StorySet, advance_scene};
use crate::timeline::{Cue, CueFired, Timeline};
use crate::transition::Fade;

pub struct SequencerPlugin;

impl Plugin for SequencerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Sequencer>()
            .add_message::<PhoneActivated>()
            .add_message::<TokenActivated>()
            .add_systems(PostStartup, check_elements)
            .add_systems(
                Update,
                (
                    (phone_input, token_input).in_set(StorySet::Input),
                    (
                        on_phone_activated,
                        on_footage_ended,
                        on_token_activated,
                        react_to_cues,
                    )
                        .chain()
                        .in_set(StorySet::React),
                )
                    .run_if(story_enabled),
            );
    }
}

const PHONE_PRESSED_SCALE: f32 = 0.95;
const TOKEN_HIGHLIGHT: Color = Color::srgb(1.0, 0.0, 0.0);
const TOKEN_GLOW: Color = Color::srgba(1.0, 0.0, 0.0, 0.2);

#[derive(Message, Debug, Clone, Copy)]
pub struct PhoneActivated;

#[derive(Message, Debug, Clone, Copy)]
pub struct TokenActivated;

/// All story state that outlives a single handler.
#[derive(Resource, Debug)]
pub struct Sequencer {
    enabled: bool,
    phone: Latch,
    text_handler: Latch,
    proximity: Latch,
    pursuit: Pursuit,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self {
            enabled: true,
            phone: Latch::default(),
            text_handler: Latch::default(),
            proximity: Latch::default(),
            pursuit: Pursuit::default(),
        }
    }
}

impl Sequencer {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true the first time only; later presses are ignored.
    pub fn activate_phone(&mut self) -> bool {
        self.phone.set()
    }

    /// Arms the token. Returns false when it was already armed.
    pub fn arm_text_handler(&mut self) -> bool {
        self.text_handler.set()
    }

    pub fn text_handler_armed(&self) -> bool {
        self.text_handler.is_set()
    }

    /// Starts the proximity loop. Returns false when it is already running.
    pub fn start_proximity(&mut self) -> bool {
        self.proximity.set()
    }

    pub fn proximity_started(&self) -> bool {
        self.proximity.is_set()
    }

    #[cfg(test)]
    pub fn pursuit(&self) -> &Pursuit {
        &self.pursuit
    }

    pub fn pursuit_mut(&mut self) -> &mut Pursuit {
        &mut self.pursuit
    }
}

pub fn story_enabled(sequencer: Option<Res<Sequencer>>) -> bool {
    sequencer.is_some_and(|sequencer| sequencer.enabled)
}

fn check_elements(
    mut sequencer: ResMut<Sequencer>,
    phone: Query<(), With<Phone>>,
    footage: Query<(), With<Footage>>,
    token: Query<(), With<Token>>,
    darkness: Query<(), With<Darkness>>,
) {
    let missing: Vec<&str> = [
        ("phone", phone.is_empty()),
        ("footage", footage.is_empty()),
        ("token", token.is_empty()),
        ("darkness", darkness.is_empty()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    if missing.is_empty() {
        info!("Story elements found, sequencer ready");
        return;
    }
    error!("Story elements missing: {missing:?}; sequencer disabled");
    sequencer.enabled = false;
}

fn phone_input(
    phone: Query<&Interaction, (Changed<Interaction>, With<Phone>)>,
    mut activated: MessageWriter<PhoneActivated>,
) {
    for interaction in &phone {
        if *interaction == Interaction::Pressed {
            activated.write(PhoneActivated);
        }
    }
}

fn token_input(
    token: Query<&Interaction, (Changed<Interaction>, With<Token>)>,
    sequencer: Res<Sequencer>,
    mut activated: MessageWriter<TokenActivated>,
) {
    for interaction in &token {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if sequencer.text_handler_armed() {
            activated.write(TokenActivated);
        } else {
            debug!("Token pressed before it was armed");
        }
    }
}

fn on_phone_activated(
    mut activated: MessageReader<PhoneActivated>,
    config: Res<StoryConfig>,
    mut sequencer: ResMut<Sequencer>,
    mut timeline: ResMut<Timeline>,
    mut phone: Query<&mut UiTransform, With<Phone>>,
) {
    for _ in activated.read() {
        if !sequencer.activate_phone() {
            debug!("Phone already activated");
            continue;
        }
        info!("Phone activated");

        if let Ok(mut transform) = phone.single_mut() {
            transform.scale = Vec2::splat(PHONE_PRESSED_SCALE);
        }
        let timings = &config.timings;
        timeline.after(timings.phone_pulse, Cue::ReleasePhone);
        timeline.chain(&[
            (timings.intro_exit, Cue::EnterVideoReveal),
            (timings.revelation, Cue::ShowRevelation),
        ]);
    }
}

fn on_footage_ended(
    mut commands: Commands,
    mut signals: MessageReader<FootageSignal>,
    config: Res<StoryConfig>,
    mut sequencer: ResMut<Sequencer>,
    mut caption: Query<(&mut Visibility, Option<&Children>), With<EndCaption>>,
    texts: Query<(), With<TextColor>>,
) {
    for signal in signals.read() {
        if *signal != FootageSignal::Ended {
            continue;
        }
        let Ok((mut visibility, children)) = caption.single_mut() else {
            warn!("Footage ended without an end caption, token left unarmed");
            continue;
        };
        if !sequencer.arm_text_handler() {
            debug!("Token already armed, ignoring repeated footage end");
            continue;
        }
        info!("Footage finished, end caption shown and token armed");

        *visibility = Visibility::Inherited;
        for child in children.into_iter().flatten() {
            if texts.contains(*child) {
                commands
                    .entity(*child)
                    .insert(Fade::in_over(config.timings.caption_fade));
            }
        }
    }
}

fn on_token_activated(
    mut activated: MessageReader<TokenActivated>,
    config: Res<StoryConfig>,
    mut timeline: ResMut<Timeline>,
    mut token: Query<(&mut TextColor, &mut BackgroundColor), With<Token>>,
    mut footage: Query<&mut Playback, With<Footage>>,
    mut signals: MessageWriter<FootageSignal>,
) {
    for _ in activated.read() {
        info!("Token activated, moving to the final scene");

        if let Ok((mut color, mut glow)) = token.single_mut() {
            color.0 = TOKEN_HIGHLIGHT;
            glow.0 = TOKEN_GLOW;
        }
        if let Ok(mut playback) = footage.single_mut() {
            if let Some(signal) = playback.pause() {
                signals.write(signal);
            }
        }

        let timings = &config.timings;
        timeline.chain(&[
            (timings.token_exit, Cue::EnterFinalReveal),
            (timings.proximity_start, Cue::StartProximity),
        ]);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn react_to_cues(
    mut commands: Commands,
    mut cues: MessageReader<CueFired>,
    config: Res<StoryConfig>,
    scene: Res<State<Scenes>>,
    mut next_scene: ResMut<NextState<Scenes>>,
    mut sequencer: ResMut<Sequencer>,
    mut phone: Query<&mut UiTransform, With<Phone>>,
    revelation: Query<Entity, With<Revelation>>,
) {
    for CueFired(cue) in cues.read() {
        match cue {
            Cue::ReleasePhone => {
                if let Ok(mut transform) = phone.single_mut() {
                    transform.scale = Vec2::ONE;
                }
            }
            Cue::EnterVideoReveal => {
                advance_scene(**scene, Scenes::VideoReveal, &mut next_scene);
            }
            Cue::ShowRevelation => {
                if let Ok(entity) = revelation.single() {
                    commands
                        .entity(entity)
                        .insert(Fade::in_over(config.timings.caption_fade));
                    info!("Revelation caption shown");
                }
            }
            Cue::EnterFinalReveal => {
                advance_scene(**scene, Scenes::FinalReveal, &mut next_scene);
            }
            Cue::StartProximity => {
                if sequencer.start_proximity() {
                    info!("Proximity loop started");
                } else {
                    warn!("Proximity loop already running");
                }
            }
            Cue::EndJumpPulse | Cue::StartAmbientDrift => {}
        }
    }
}
