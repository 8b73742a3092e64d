//! This module mirrors the particle field onto snowflake scenes.

use crate::Config;
use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::instrument;
use tracing_unwrap::ResultExt;
use xmas_snowfall::{
    ParticleField, Pose, SnowfallConfig, SnowfallError, Template, VisualBinding,
};

/// The index of this snowflake in the particle field.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct SnowflakeIndex(pub(super) usize);

/// The handle to the snowflake model, which every snowflake is cloned from.
#[derive(Resource)]
pub(super) struct SnowflakeScene(Handle<Scene>);

/// The simulated particles and the entities that show them.
#[derive(Resource)]
pub(crate) struct Snowfall {
    /// The particles.
    field: ParticleField,

    /// The snowflake entities, or `None` until the snowflake model has loaded.
    binding: Option<VisualBinding<Entity>>,

    /// The RNG used to resample the field and to seed the jitter of each binding.
    rng: StdRng,
}

impl Snowfall {
    /// Scatter a new particle field. No snowflakes get spawned until the model has loaded.
    pub(crate) fn new(config: SnowfallConfig, mut rng: StdRng) -> Self {
        let field = ParticleField::initialize(config, &mut rng);
        Self {
            field,
            binding: None,
            rng,
        }
    }
}

/// Spawns one snowflake scene per particle, starting at that particle's pose.
struct SnowflakeTemplate<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    scene: Handle<Scene>,
    ready: bool,
    field: &'a ParticleField,
}

impl Template for SnowflakeTemplate<'_, '_, '_> {
    type Instance = Entity;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn instantiate(&mut self, index: usize) -> Entity {
        let particle = self.field.particles()[index];
        let pose = Pose {
            translation: particle.position,
            euler: particle.rotation,
        };

        self.commands
            .spawn((
                SceneBundle {
                    scene: self.scene.clone(),
                    transform: Transform::from_translation(pose.translation)
                        .with_rotation(pose.rotation()),
                    ..default()
                },
                SnowflakeIndex(index),
            ))
            .id()
    }
}

/// Start loading the snowflake model.
pub(super) fn load_snowflake_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<Config>,
) {
    let handle: Handle<Scene> = asset_server.load(config.assets.snowflake.as_str());
    commands.insert_resource(SnowflakeScene(handle));
}

/// Spawn the snowflakes once the model has loaded.
pub(super) fn bind_snowflakes(
    mut commands: Commands,
    mut snowfall: ResMut<Snowfall>,
    snowflake: Res<SnowflakeScene>,
    scenes: Res<Assets<Scene>>,
) {
    if snowfall.binding.is_some() {
        return;
    }

    let snowfall = &mut *snowfall;
    let jitter_rng = StdRng::seed_from_u64(snowfall.rng.gen());
    let mut template = SnowflakeTemplate {
        commands: &mut commands,
        scene: snowflake.0.clone(),
        ready: scenes.get(&snowflake.0).is_some(),
        field: &snowfall.field,
    };

    match VisualBinding::bind_all(&snowfall.field, &mut template, jitter_rng) {
        Ok(binding) => {
            info!(snowflakes = binding.len(), "Spawned snowflakes");
            snowfall.binding = Some(binding);
        }
        Err(SnowfallError::TemplateNotReady) => trace!("Snowflake model hasn't loaded yet"),
        Err(e) => error!(?e, "Unable to spawn snowflakes"),
    }
}

/// Let the snow fall and move every snowflake to its particle.
#[instrument(skip_all)]
pub(super) fn animate_snowfall(
    time: Res<Time>,
    mut snowfall: ResMut<Snowfall>,
    mut snowflakes: Query<(&mut Transform, &SnowflakeIndex)>,
) {
    let snowfall = &mut *snowfall;
    let Some(binding) = snowfall.binding.as_mut() else {
        return;
    };

    snowfall.field.advance(time.delta());
    let mut index = 0;
    binding
        .sync(&snowfall.field, |&mut entity, pose| {
            if let Ok((mut transform, snowflake)) = snowflakes.get_mut(entity) {
                debug_assert_eq!(snowflake.0, index, "Snowflake {entity:?} is out of order");
                transform.translation = pose.translation;
                transform.rotation = pose.rotation();
            }
            index += 1;
        })
        .expect_or_log("The snowflakes should always match the particle field");
}

/// Scatter the snow again when R is pressed.
pub(super) fn reset_snowfall(
    mut commands: Commands,
    keys: Res<Input<KeyCode>>,
    mut snowfall: ResMut<Snowfall>,
) {
    if !keys.just_pressed(KeyCode::R) {
        return;
    }

    let snowfall = &mut *snowfall;
    if let Some(binding) = snowfall.binding.take() {
        for entity in binding.into_instances() {
            commands.entity(entity).despawn_recursive();
        }
    }
    snowfall.field.reinitialize(&mut snowfall.rng);
    info!("Reset snowfall");
}
