// The story page: UI tree, element markers and the window cursor bridge.

use bevy::prelude::*;
use bevy::ui::{BackgroundGradient, FocusPolicy};
use bevy::window::CursorMoved;

use crate::footage::{FootageLoad, Playback};
use crate::proximity::PointerMoved;
use crate::scenes::{ScenePanel, Scenes, StorySet};

pub struct PagePlugin;

impl Plugin for PagePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(PAGE_BACKGROUND))
            .add_systems(Startup, spawn_page)
            .add_systems(Update, forward_cursor.in_set(StorySet::Input));
    }
}

pub const PAGE_BACKGROUND: Color = Color::srgb(0.04, 0.04, 0.05);
const TEXT_COLOR: Color = Color::srgb(0.85, 0.85, 0.85);
const PHONE_COLOR: Color = Color::srgb(0.12, 0.12, 0.14);
const FRAME_PATH: &str = "footage/sleeping.png";

#[derive(Component)]
pub struct Phone;

#[derive(Component)]
pub struct MysteryPhoto;

#[derive(Component)]
pub struct Footage;

#[derive(Component)]
pub struct FootageProgress;

/// Caption that fades in shortly after the footage appears.
#[derive(Component)]
pub struct Revelation;

/// Caption panel shown once the footage has ended.
#[derive(Component)]
pub struct EndCaption;

/// The word that moves the story to its final scene.
#[derive(Component)]
pub struct Token;

#[derive(Component)]
pub struct Creature;

/// Full-screen darkness with the flashlight cut into it.
#[derive(Component)]
pub struct Darkness;

fn spawn_page(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn(Camera2d);

    let panel = |scene: Scenes| {
        (
            ScenePanel(scene),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            if scene == Scenes::Intro {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            },
        )
    };

    commands.spawn(panel(Scenes::Intro)).with_children(|parent| {
        parent.spawn(caption("3:07 AM. A message from an unknown number.", 28.0));

        parent
            .spawn((
                Phone,
                Button,
                Node {
                    width: Val::Px(180.0),
                    height: Val::Px(320.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    border: UiRect::all(Val::Px(6.0)),
                    ..default()
                },
                BorderColor::all(Color::srgb(0.3, 0.3, 0.32)),
                BackgroundColor(PHONE_COLOR),
            ))
            .with_children(|phone| {
                phone
                    .spawn((
                        MysteryPhoto,
                        Interaction::default(),
                        FocusPolicy::Pass,
                        Node {
                            width: Val::Px(140.0),
                            height: Val::Px(140.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BorderColor::all(Color::NONE),
                        BackgroundColor(Color::srgb(0.2, 0.2, 0.22)),
                    ))
                    .with_children(|photo| {
                        photo.spawn(caption("1 photo", 18.0));
                    });
            });
    });

    commands
        .spawn(panel(Scenes::VideoReveal))
        .with_children(|parent| {
            parent.spawn((
                Revelation,
                Text::new("It isn't a photo. It's a video of me, sleeping."),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(TEXT_COLOR.with_alpha(0.0)),
            ));

            parent
                .spawn((
                    Footage,
                    Playback::default(),
                    FootageLoad::default(),
                    Button,
                    ImageNode::new(asset_server.load(FRAME_PATH)),
                    Node {
                        width: Val::Px(480.0),
                        height: Val::Px(270.0),
                        flex_direction: FlexDirection::Column,
                        justify_content: JustifyContent::FlexEnd,
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.08, 0.08, 0.1)),
                ))
                .with_children(|footage| {
                    footage.spawn((
                        FootageProgress,
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Px(4.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.7, 0.1, 0.1)),
                    ));
                });

            parent
                .spawn((
                    EndCaption,
                    Node {
                        column_gap: Val::Px(8.0),
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    Visibility::Hidden,
                ))
                .with_children(|row| {
                    row.spawn(caption("I live", 30.0));
                    row.spawn((
                        Token,
                        Button,
                        Text::new("alone"),
                        TextFont {
                            font_size: 30.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        BackgroundColor(Color::NONE),
                    ));
                    row.spawn(caption(".", 30.0));
                });
        });

    commands
        .spawn(panel(Scenes::FinalReveal))
        .with_children(|parent| {
            parent
                .spawn((
                    Creature,
                    Node {
                        width: Val::Px(140.0),
                        height: Val::Px(220.0),
                        position_type: PositionType::Absolute,
                        left: Val::Percent(62.0),
                        top: Val::Percent(30.0),
                        justify_content: JustifyContent::SpaceEvenly,
                        padding: UiRect::top(Val::Px(40.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                    Visibility::Hidden,
                ))
                .with_children(|creature| {
                    for _ in 0..2 {
                        creature.spawn((
                            Node {
                                width: Val::Px(12.0),
                                height: Val::Px(6.0),
                                ..default()
                            },
                            BackgroundColor(Color::srgb(0.6, 0.0, 0.0)),
                        ));
                    }
                });

            parent.spawn((
                Darkness,
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    position_type: PositionType::Absolute,
                    ..default()
                },
                BackgroundColor(Color::BLACK),
                BackgroundGradient(Vec::new()),
                GlobalZIndex(10),
            ));
        });
}

fn caption(text: &str, size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(TEXT_COLOR),
    )
}

fn forward_cursor(mut cursor: MessageReader<CursorMoved>, mut moves: MessageWriter<PointerMoved>) {
    for moved in cursor.read() {
        moves.write(PointerMoved {
            position: moved.position,
        });
    }
}
