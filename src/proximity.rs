// Proximity loop: the flashlight follows the pointer and the creature waits to be found.
use std::time::Duration;

use bevy::prelude::*;
use bevy::ui::{
    BackgroundGradient, ColorStop, ComputedNode, Gradient, RadialGradient, RadialGradientShape,
    UiGlobalTransform, UiPosition,
};
use bevy::window::{CursorOptions, PrimaryWindow};

use crate::config::{Flashlight, PursuitConfig, StoryConfig};
use crate::page::{Creature, Darkness};
use crate::scenes::{Latch, StorySet};
use crate::sequencer::{Sequencer, react_to_cues, story_enabled};
use crate::timeline::{Cue, CueFired, Timeline};

pub struct ProximityPlugin;

impl Plugin for ProximityPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerMoved>().add_systems(
            Update,
            (
                pursue_pointer.run_if(proximity_active),
                end_jump_pulse,
            )
                .chain()
                .in_set(StorySet::React)
                .after(react_to_cues)
                .run_if(story_enabled),
        );
    }
}

pub(crate) const CREATURE_DARK: Color = Color::srgb(0.1, 0.1, 0.1);
pub(crate) const CREATURE_LIT: Color = Color::srgb(0.78, 0.74, 0.66);
const JUMP_SCALE: f32 = 1.3;

/// A pointer sample in logical pixels, origin at the top-left of the window.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PointerMoved {
    pub position: Vec2,
}

/// The creature is currently inside the flashlight.
#[derive(Component)]
pub struct Illuminated;

/// The one-off jump is playing.
#[derive(Component)]
pub struct JumpPulse;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Illumination {
    /// The creature has not been revealed yet.
    Unrevealed,
    Dark,
    Lit {
        offset: Vec2,
        /// True only on the sample that triggers the one-off jump.
        jump: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutcome {
    pub revealed_now: bool,
    pub illumination: Illumination,
}

/// State of the proximity loop, owned by the sequencer.
#[derive(Debug, Default)]
pub struct Pursuit {
    samples: u64,
    revealed: Latch,
    scared: Latch,
    last_admitted: Option<Duration>,
}

impl Pursuit {
    pub fn samples(&self) -> u64 {
        self.samples
    }

    #[cfg(test)]
    pub fn revealed(&self) -> bool {
        self.revealed.is_set()
    }

    #[cfg(test)]
    pub fn scared(&self) -> bool {
        self.scared.is_set()
    }

    /// Drops samples closer than `throttle` to the last admitted one.
    pub fn admit(&mut self, now: Duration, throttle: Option<Duration>) -> bool {
        if let (Some(throttle), Some(last)) = (throttle, self.last_admitted) {
            if now.saturating_sub(last) < throttle {
                return false;
            }
        }
        self.last_admitted = Some(now);
        true
    }

    /// Folds one pointer sample into the loop.
    ///
    /// `target` is the creature's on-screen rect, `None` when it is not on the page.
    /// `viewport` is the window size, used for the follow offset.
    pub fn sample(
        &mut self,
        pointer: Vec2,
        target: Option<Rect>,
        viewport: Option<Vec2>,
        config: &PursuitConfig,
    ) -> SampleOutcome {
        self.samples += 1;

        let revealed_now =
            target.is_some() && self.samples > config.reveal_after && self.revealed.set();

        let Some(rect) = target.filter(|_| self.revealed.is_set()) else {
            return SampleOutcome {
                revealed_now,
                illumination: Illumination::Unrevealed,
            };
        };

        let lit = distance_to_center(pointer, rect)
            .is_some_and(|distance| distance < config.illumination_radius);
        let illumination = if lit {
            Illumination::Lit {
                offset: follow_offset(pointer, viewport, config.follow_damping),
                jump: self.scared.set(),
            }
        } else {
            Illumination::Dark
        };

        SampleOutcome {
            revealed_now,
            illumination,
        }
    }
}

/// Euclidean distance from `pointer` to the centre of `rect`, or `None` for an empty or
/// non-finite rect.
pub fn distance_to_center(pointer: Vec2, rect: Rect) -> Option<f32> {
    if rect.is_empty() || !rect.min.is_finite() || !rect.max.is_finite() {
        return None;
    }
    let distance = pointer.distance(rect.center());
    distance.is_finite().then_some(distance)
}

/// Pulls the creature towards the pointer's side of the screen.
pub fn follow_offset(pointer: Vec2, viewport: Option<Vec2>, damping: Vec2) -> Vec2 {
    let Some(viewport) = viewport else {
        return Vec2::ZERO;
    };
    (pointer - viewport / 2.0) * damping
}

/// The darkness overlay with a clear circle around `at`.
pub fn beam_gradient(flashlight: &Flashlight, at: Vec2) -> BackgroundGradient {
    let stops = flashlight
        .stops
        .iter()
        .map(|stop| ColorStop::new(Color::BLACK.with_alpha(stop.darkness), Val::Px(stop.radius)))
        .collect();
    let position = UiPosition::new(Vec2::splat(-0.5), Val::Px(at.x), Val::Px(at.y));
    BackgroundGradient(vec![Gradient::Radial(RadialGradient::new(
        position,
        RadialGradientShape::FarthestCorner,
        stops,
    ))])
}

fn proximity_active(sequencer: Res<Sequencer>) -> bool {
    sequencer.proximity_started()
}

/// On-screen rect of a UI node in logical pixels.
fn node_rect(node: &ComputedNode, transform: &UiGlobalTransform) -> Rect {
    let scale = node.inverse_scale_factor();
    Rect::from_center_size(transform.translation * scale, node.size() * scale)
}

#[allow(clippy::too_many_arguments)]
fn pursue_pointer(
    mut commands: Commands,
    mut moves: MessageReader<PointerMoved>,
    time: Res<Time>,
    config: Res<StoryConfig>,
    mut sequencer: ResMut<Sequencer>,
    mut timeline: ResMut<Timeline>,
    window: Query<&Window, With<PrimaryWindow>>,
    mut cursor: Query<&mut CursorOptions>,
    mut darkness: Query<(&mut BackgroundGradient, &mut BackgroundColor), With<Darkness>>,
    mut creature: Query<
        (
            Entity,
            &ComputedNode,
            &UiGlobalTransform,
            &mut Visibility,
            &mut UiTransform,
            &mut BackgroundColor,
        ),
        (With<Creature>, Without<Darkness>),
    >,
) {
    let viewport = window.single().ok().map(|w| Vec2::new(w.width(), w.height()));

    for moved in moves.read() {
        let pursuit = sequencer.pursuit_mut();
        if !pursuit.admit(time.elapsed(), config.pursuit.throttle) {
            continue;
        }

        if let Ok((mut gradient, mut background)) = darkness.single_mut() {
            *gradient = beam_gradient(&config.flashlight, moved.position);
            background.0 = Color::NONE;
        }

        let mut found = creature.single_mut().ok();
        let target = found
            .as_ref()
            .map(|(_, node, transform, ..)| node_rect(node, transform));
        let outcome = pursuit.sample(moved.position, target, viewport, &config.pursuit);

        let Some((entity, _, _, visibility, ui_transform, color)) = found.as_mut() else {
            continue;
        };

        if outcome.revealed_now {
            **visibility = Visibility::Inherited;
            info!("Creature revealed after {} samples", pursuit.samples());
        }

        match outcome.illumination {
            Illumination::Unrevealed => {}
            Illumination::Lit { offset, jump } => {
                commands.entity(*entity).insert(Illuminated);
                color.0 = CREATURE_LIT;
                ui_transform.translation = Val2::px(offset.x, offset.y);
                set_cursor_visible(&mut cursor, false);

                if jump {
                    info!("Jump scare");
                    commands.entity(*entity).insert(JumpPulse);
                    ui_transform.scale = Vec2::splat(JUMP_SCALE);
                    timeline.after(config.timings.jump_pulse, Cue::EndJumpPulse);
                }
            }
            Illumination::Dark => {
                commands.entity(*entity).remove::<Illuminated>();
                color.0 = CREATURE_DARK;
                ui_transform.translation = Val2::ZERO;
                set_cursor_visible(&mut cursor, true);
            }
        }
    }
}

fn set_cursor_visible(cursor: &mut Query<&mut CursorOptions>, visible: bool) {
    if let Ok(mut cursor) = cursor.single_mut() {
        cursor.visible = visible;
    }
}

fn end_jump_pulse(
    mut commands: Commands,
    mut cues: MessageReader<CueFired>,
    mut creature: Query<(Entity, &mut UiTransform), With<JumpPulse>>,
) {
    if !cues.read().any(|fired| fired.0 == Cue::EndJumpPulse) {
        return;
    }
    for (entity, mut ui_transform) in &mut creature {
        ui_transform.scale = Vec2::ONE;
        commands.entity(entity).remove::<JumpPulse>();
    }
}
