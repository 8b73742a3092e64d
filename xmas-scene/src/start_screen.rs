//! This module handles the start screen, which is just a button and a caption.

use crate::{Advent, AppState, Config};
use bevy::prelude::*;
use tracing_unwrap::ResultExt;

/// The root node of the start screen.
#[derive(Component)]
pub(super) struct StartScreen;

/// The start button itself.
#[derive(Component)]
pub(super) struct StartButton;

/// Spawn the start button and its caption in the middle of the window.
pub(super) fn spawn_start_screen(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<Config>,
) {
    let start_screen = &config.start_screen;
    let font: Handle<Font> = asset_server.load(config.assets.font.as_str());
    let [r, g, b] = start_screen.colour;
    let colour = Color::rgb_u8(r, g, b);

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    size: Size::new(Val::Percent(100.), Val::Percent(100.)),
                    // Bevy's UI y axis points up, so this puts the caption below the button
                    flex_direction: FlexDirection::ColumnReverse,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                background_color: Color::NONE.into(),
                ..default()
            },
            StartScreen,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    ButtonBundle {
                        style: Style {
                            padding: UiRect::all(Val::Px(16.)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        background_color: colour.into(),
                        ..default()
                    },
                    StartButton,
                ))
                .with_children(|button| {
                    button.spawn(TextBundle::from_section(
                        start_screen.button_label.clone(),
                        TextStyle {
                            font: font.clone(),
                            font_size: 32.,
                            color: Color::WHITE,
                        },
                    ));
                });

            parent.spawn(
                TextBundle::from_section(
                    start_screen.caption.clone(),
                    TextStyle {
                        font,
                        font_size: 24.,
                        color: colour,
                    },
                )
                .with_style(Style {
                    margin: UiRect::all(Val::Px(16.)),
                    ..default()
                }),
            );
        });
}

/// Start the scene when the start button is clicked.
pub(super) fn press_start(
    buttons: Query<&Interaction, (Changed<Interaction>, With<StartButton>)>,
    mut advent: ResMut<Advent>,
    mut state: ResMut<State<AppState>>,
) {
    for interaction in buttons.iter() {
        if *interaction == Interaction::Clicked && advent.start() {
            info!("Starting the advent scene");
            state
                .set(AppState::Running)
                .expect_or_log("We should be able to leave the start screen");
        }
    }
}

/// Remove the start screen entirely.
pub(super) fn despawn_start_screen(
    mut commands: Commands,
    screens: Query<Entity, With<StartScreen>>,
) {
    for entity in screens.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
