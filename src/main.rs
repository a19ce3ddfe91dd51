// Main
mod ambient;
mod config;
mod footage;
mod page;
mod proximity;
mod scenes;
mod sequencer;
#[cfg(test)]
mod testing;
mod timeline;
mod transition;

use bevy::prelude::*;
use ambient::AmbientPlugin;
use config::StoryConfig;
use footage::FootagePlugin;
use page::PagePlugin;
use proximity::ProximityPlugin;
use scenes::ScenesPlugin;
use sequencer::SequencerPlugin;
use timeline::TimelinePlugin;
use transition::TransitionPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Alone".into(),
                ..default()
            }),
            ..default()
        }))
        .init_resource::<StoryConfig>()
        .add_plugins((
            ScenesPlugin,
            TimelinePlugin,
            PagePlugin,
            SequencerPlugin,
            FootagePlugin,
            ProximityPlugin,
            TransitionPlugin,
            AmbientPlugin,
        ))
        .run();
}
