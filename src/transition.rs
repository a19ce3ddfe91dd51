// Text that fades in over a fixed time once the story reveals it.

use std::time::Duration;

use bevy::prelude::*;

use crate::scenes::StorySet;

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, fade_text.after(StorySet::React));
    }
}

/// Drives a `TextColor` alpha towards `to`. Removed once finished.
#[derive(Component, Debug, Clone)]
pub struct Fade {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
}

impl Fade {
    pub fn in_over(duration: Duration) -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Opacity the fade settles on.
    #[cfg(test)]
    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.alpha()
    }

    pub fn alpha(&self) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

fn fade_text(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: Query<(Entity, &mut Fade, &mut TextColor)>,
) {
    for (entity, mut fade, mut color) in &mut fades {
        let alpha = fade.advance(time.delta());
        color.0.set_alpha(alpha);
        if fade.finished() {
            commands.entity(entity).remove::<Fade>();
        }
    }
}
