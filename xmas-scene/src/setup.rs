//! This module handles the camera and the lights.

use crate::Config;
use bevy::prelude::*;
use smooth_bevy_cameras::controllers::orbit::{OrbitCameraBundle, OrbitCameraController};

/// Spawn the orbit camera. Panning and zooming are disabled, so the camera can only rotate around
/// its target.
pub(super) fn setup_camera(mut commands: Commands, config: Res<Config>) {
    let camera = &config.camera;

    // Hold LControl to orbit the camera
    commands
        .spawn(Camera3dBundle {
            projection: PerspectiveProjection {
                fov: camera.fov_degrees.to_radians(),
                ..default()
            }
            .into(),
            ..default()
        })
        .insert(OrbitCameraBundle::new(
            OrbitCameraController {
                mouse_rotate_sensitivity: Vec2::splat(camera.rotate_sensitivity),
                mouse_translate_sensitivity: Vec2::ZERO,
                mouse_wheel_zoom_sensitivity: 0.,
                smoothing_weight: 0.1,
                ..default()
            },
            camera.position,
            camera.target,
            Vec3::Y,
        ));
}

/// Spawn the sun and the point light that light up the tree.
pub(super) fn setup_lights(mut commands: Commands, config: Res<Config>) {
    let lighting = &config.lighting;

    debug!("Adding lights to scene");
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: lighting.sun_illuminance,
                shadows_enabled: true,
                ..default()
            },
            transform: Transform::from_translation(lighting.sun_position)
                .looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        Name::new("Sun"),
    ));

    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                intensity: lighting.point_light_intensity,
                range: 100.,
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_translation(lighting.point_light_position),
            ..default()
        },
        Name::new("Point light"),
    ));
}
