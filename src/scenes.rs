/// Story scenes, panel visibility and the one-shot latches shared by the sequencer.
use bevy::prelude::*;
use strum::{Display, EnumIter, IntoEnumIterator};

pub struct ScenesPlugin;

impl Plugin for ScenesPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Scenes>().configure_sets(
            Update,
            (StorySet::Input, StorySet::Timeline, StorySet::React).chain(),
        );

        for scene in Scenes::iter() {
            app.add_systems(OnEnter(scene), show_scene_panels);
        }
    }
}

/// Ordered so that a later scene compares greater than an earlier one.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, States, Display, EnumIter,
)]
pub enum Scenes {
    #[default]
    Intro,
    VideoReveal,
    FinalReveal,
}

/// Per-frame ordering of the story systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorySet {
    /// Interactions become story messages.
    Input,
    /// Due timeline cues fire.
    Timeline,
    /// Handlers react to messages and cues.
    React,
}

/// A UI region that is shown only while its scene is current.
#[derive(Component, Debug, Clone, Copy)]
pub struct ScenePanel(pub Scenes);

/// Requests a move to `target`, ignoring anything that is not strictly forward.
pub fn advance_scene(current: Scenes, target: Scenes, next: &mut NextState<Scenes>) -> bool {
    if target <= current {
        debug!("Ignoring scene change {current} -> {target}");
        return false;
    }
    info!("Scene {current} -> {target}");
    next.set(target);
    true
}

fn show_scene_panels(scene: Res<State<Scenes>>, mut panels: Query<(&ScenePanel, &mut Visibility)>) {
    for (panel, mut visibility) in &mut panels {
        *visibility = if panel.0 == **scene {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// A flag that goes from false to true at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latch(bool);

impl Latch {
    /// Sets the latch, returning true only for the call that flipped it.
    pub fn set(&mut self) -> bool {
        let flipped = !self.0;
        self.0 = true;
        flipped
    }

    pub fn is_set(self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_flips_once() {
        let mut latch = Latch::default();
        assert!(!latch.is_set());
        assert!(latch.set());
        assert!(!latch.set());
        assert!(!latch.set());
        assert!(latch.is_set());
    }

    #[test]
    fn scenes_only_move_forward() {
        let mut next = NextState::<Scenes>::default();
        assert!(!advance_scene(Scenes::VideoReveal, Scenes::Intro, &mut next));
        assert!(!advance_scene(Scenes::VideoReveal, Scenes::VideoReveal, &mut next));
        assert!(matches!(next, NextState::Unchanged));

        assert!(advance_scene(Scenes::VideoReveal, Scenes::FinalReveal, &mut next));
        assert!(matches!(next, NextState::Pending(Scenes::FinalReveal)));
    }

    #[test]
    fn scene_order_follows_the_story() {
        let order: Vec<Scenes> = Scenes::iter().collect();
        assert_eq!(
            order,
            vec![Scenes::Intro, Scenes::VideoReveal, Scenes::FinalReveal]
        );
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
