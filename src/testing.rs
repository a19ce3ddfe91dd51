// Headless story app driven by a hand-advanced clock.

use std::time::Duration;

use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::ui::{BackgroundGradient, ComputedNode, UiGlobalTransform};
use bevy::window::{CursorOptions, PrimaryWindow};

use crate::config::StoryConfig;
use crate::footage::{FootagePlugin, Playback};
use crate::page::{Creature, Darkness, EndCaption, Footage, MysteryPhoto, Phone, Revelation, Token};
use crate::proximity::ProximityPlugin;
use crate::scenes::{ScenePanel, Scenes, ScenesPlugin};
use crate::sequencer::SequencerPlugin;
use crate::timeline::TimelinePlugin;
use crate::transition::TransitionPlugin;

/// Where the creature sits on the test page, in logical pixels.
pub const CREATURE_CENTER: Vec2 = Vec2::new(400.0, 300.0);
const CREATURE_SIZE: Vec2 = Vec2::new(140.0, 220.0);

pub struct StoryPage {
    pub window: Entity,
    pub intro: Entity,
    pub video_reveal: Entity,
    pub final_reveal: Entity,
    pub phone: Entity,
    pub photo: Entity,
    pub footage: Entity,
    pub revelation: Entity,
    pub end_caption: Entity,
    pub token: Entity,
    pub creature: Entity,
    pub darkness: Entity,
}

/// The story plugins without rendering, a window backend or assets.
pub fn story_app() -> App {
    let mut app = App::new();
    app.add_plugins(StatesPlugin)
        .insert_resource(Time::<()>::default())
        .init_resource::<StoryConfig>()
        .add_plugins((
            ScenesPlugin,
            TimelinePlugin,
            SequencerPlugin,
            FootagePlugin,
            ProximityPlugin,
            TransitionPlugin,
        ));
    app
}

pub fn spawn_story_page(world: &mut World) -> StoryPage {
    let window = world
        .spawn((Window::default(), CursorOptions::default(), PrimaryWindow))
        .id();

    let panel = |world: &mut World, scene: Scenes| {
        let visibility = if scene == Scenes::Intro {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        world.spawn((ScenePanel(scene), visibility)).id()
    };
    let intro = panel(world, Scenes::Intro);
    let video_reveal = panel(world, Scenes::VideoReveal);
    let final_reveal = panel(world, Scenes::FinalReveal);

    let phone = world
        .spawn((Phone, Interaction::None, UiTransform::default()))
        .id();
    let photo = world
        .spawn((
            MysteryPhoto,
            Interaction::None,
            UiTransform::default(),
            BorderColor::all(Color::NONE),
        ))
        .id();
    let footage = world
        .spawn((Footage, Playback::default(), Interaction::None))
        .id();
    let revelation = world
        .spawn((Revelation, TextColor(Color::WHITE.with_alpha(0.0))))
        .id();
    let end_caption = world.spawn((EndCaption, Visibility::Hidden)).id();
    world.entity_mut(end_caption).with_children(|row| {
        row.spawn(TextColor(Color::WHITE));
    });
    let token = world
        .spawn((
            Token,
            Interaction::None,
            TextColor(Color::WHITE),
            BackgroundColor(Color::NONE),
        ))
        .id();
    // Laid out by hand, there is no layout pass without the UI plugin.
    let creature = world
        .spawn((
            Creature,
            Node::default(),
            ComputedNode {
                size: CREATURE_SIZE,
                inverse_scale_factor: 1.0,
                ..default()
            },
            UiGlobalTransform::from(Affine2::from_translation(CREATURE_CENTER)),
            UiTransform::default(),
            BackgroundColor(Color::BLACK),
            Visibility::Hidden,
        ))
        .id();
    let darkness = world
        .spawn((
            Darkness,
            BackgroundColor(Color::BLACK),
            BackgroundGradient(Vec::new()),
        ))
        .id();

    StoryPage {
        window,
        intro,
        video_reveal,
        final_reveal,
        phone,
        photo,
        footage,
        revelation,
        end_caption,
        token,
        creature,
        darkness,
    }
}

/// Advances the clock by `millis` and runs one frame.
pub fn tick(app: &mut App, millis: u64) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(millis));
    app.update();
}

/// Holds a button pressed for one frame that takes no time.
pub fn press(app: &mut App, entity: Entity) {
    set_interaction(app, entity, Interaction::Pressed);
    tick(app, 0);
    set_interaction(app, entity, Interaction::None);
}

pub fn set_interaction(app: &mut App, entity: Entity, interaction: Interaction) {
    if let Some(mut current) = app.world_mut().get_mut::<Interaction>(entity) {
        *current = interaction;
    }
}
