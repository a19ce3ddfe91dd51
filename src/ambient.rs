// Atmosphere: hover feedback on the mystery photo and a slow background drift.

use std::time::Duration;

use bevy::color::Mix;
use bevy::prelude::*;

use crate::config::StoryConfig;
use crate::page::MysteryPhoto;
use crate::scenes::StorySet;
use crate::sequencer::story_enabled;
use crate::timeline::{Cue, CueFired, Timeline};

pub struct AmbientPlugin;

impl Plugin for AmbientPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, schedule_drift).add_systems(
            Update,
            (photo_hover, start_drift, drift_background)
                .chain()
                .in_set(StorySet::React)
                .run_if(story_enabled),
        );
    }
}

const HOVER_SCALE: f32 = 1.05;
const HOVER_BORDER: Color = Color::srgba(1.0, 0.42, 0.42, 0.3);
const DRIFT_FROM: Srgba = Srgba::rgb(0.04, 0.04, 0.05);
const DRIFT_TO: Srgba = Srgba::rgb(0.09, 0.03, 0.04);

/// Time since the background started drifting.
#[derive(Resource, Debug, Default)]
struct Drift(Duration);

fn schedule_drift(config: Res<StoryConfig>, mut timeline: ResMut<Timeline>) {
    timeline.after(config.timings.ambient_start, Cue::StartAmbientDrift);
}

fn photo_hover(
    mut photo: Query<
        (&Interaction, &mut UiTransform, &mut BorderColor),
        (Changed<Interaction>, With<MysteryPhoto>),
    >,
) {
    for (interaction, mut transform, mut border) in &mut photo {
        match *interaction {
            Interaction::Hovered | Interaction::Pressed => {
                transform.scale = Vec2::splat(HOVER_SCALE);
                *border = BorderColor::all(HOVER_BORDER);
            }
            Interaction::None => {
                transform.scale = Vec2::ONE;
                *border = BorderColor::all(Color::NONE);
            }
        }
    }
}

fn start_drift(mut commands: Commands, mut cues: MessageReader<CueFired>) {
    if cues.read().any(|fired| fired.0 == Cue::StartAmbientDrift) {
        info!("Background drift started");
        commands.init_resource::<Drift>();
    }
}

fn drift_background(
    time: Res<Time>,
    config: Res<StoryConfig>,
    drift: Option<ResMut<Drift>>,
    clear_color: Option<ResMut<ClearColor>>,
) {
    let (Some(mut drift), Some(mut clear_color)) = (drift, clear_color) else {
        return;
    };
    drift.0 += time.delta();
    clear_color.0 = DRIFT_FROM
        .mix(&DRIFT_TO, drift_factor(drift.0, config.timings.ambient_cycle))
        .into();
}

/// Eased ping-pong between 0 and 1, one leg per `cycle`.
fn drift_factor(elapsed: Duration, cycle: Duration) -> f32 {
    if cycle.is_zero() {
        return 0.0;
    }
    let phase = (elapsed.as_secs_f32() / cycle.as_secs_f32()).rem_euclid(2.0);
    let t = 1.0 - (phase - 1.0).abs();
    t * t * (3.0 - 2.0 * t)
}
