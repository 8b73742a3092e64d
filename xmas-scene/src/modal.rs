//! This module handles clicking on decorations and the picture that pops up afterwards.

use crate::{Advent, Config};
use bevy::prelude::*;
use xmas_advent::{cursor_ray, ClickOutcome, Modal};

/// The full-window overlay that shows a picture.
#[derive(Component)]
pub(super) struct ModalOverlay;

/// Handle left clicks in the running scene.
///
/// While the modal is open, any click closes it. Otherwise the click is cast into the scene as a
/// ray and every decoration it hits is tried, nearest first, until one of them opens.
pub(super) fn handle_clicks(
    mouse: Res<Input<MouseButton>>,
    windows: Res<Windows>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    config: Res<Config>,
    mut advent: ResMut<Advent>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    if let Modal::Open(day) = advent.modal() {
        debug!(day, "Closing modal");
        advent.click_modal();
        return;
    }

    let Some(cursor) = windows.get_primary().and_then(Window::cursor_position) else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(viewport_size) = camera.logical_viewport_size() else {
        return;
    };
    let Some((origin, direction)) = cursor_ray(
        cursor,
        viewport_size,
        camera_transform.compute_matrix(),
        camera.projection_matrix(),
    ) else {
        return;
    };

    let hits = advent
        .calendar()
        .pick(origin, direction, config.pick_radius);
    trace!(?hits, "Picked decorations");

    for day in hits {
        if let ClickOutcome::Revealed(day) = advent.click_decoration(day) {
            info!(day, "Revealed today's picture");
            break;
        }
    }
}

/// Rebuild the overlay whenever the modal opens or closes.
pub(super) fn show_modal(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<Config>,
    advent: Res<Advent>,
    overlays: Query<Entity, With<ModalOverlay>>,
) {
    if !advent.is_changed() {
        return;
    }

    for entity in overlays.iter() {
        commands.entity(entity).despawn_recursive();
    }

    let Modal::Open(day) = advent.modal() else {
        return;
    };

    let max_percent = config.modal.max_image_percent;
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    size: Size::new(Val::Percent(100.), Val::Percent(100.)),
                    position_type: PositionType::Absolute,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                background_color: Color::rgba(0., 0., 0., config.modal.overlay_alpha).into(),
                ..default()
            },
            ModalOverlay,
        ))
        .with_children(|parent| {
            if let Some(path) = advent.calendar().image_for(day) {
                parent.spawn(ImageBundle {
                    style: Style {
                        max_size: Size::new(Val::Percent(max_percent), Val::Percent(max_percent)),
                        ..default()
                    },
                    image: UiImage(asset_server.load(path)),
                    ..default()
                });
            } else {
                warn!(day, "No picture for this day");
                parent.spawn(TextBundle::from_section(
                    format!("Decoration {day}"),
                    TextStyle {
                        font: asset_server.load(config.assets.font.as_str()),
                        font_size: 48.,
                        color: Color::WHITE,
                    },
                ));
            }
        });
}
