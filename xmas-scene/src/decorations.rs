//! This module handles the tree and the decorations hanging on it.

use crate::{Advent, Config};
use bevy::{asset::LoadState, prelude::*};
use tracing::instrument;

/// The Christmas tree model.
#[derive(Component)]
pub(super) struct Tree;

/// Marks the tree once its load result has been logged.
#[derive(Component)]
pub(super) struct Reported;

/// The day of a decoration and the colour it gets painted in.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct DecorationDay {
    pub(super) day: u32,
    pub(super) tint: Color,
}

/// Marks a decoration once every mesh in it has its own tinted material.
#[derive(Component)]
pub(super) struct Tinted;

/// Spawn the tree and one decoration for every day in the calendar.
pub(super) fn spawn_tree_and_decorations(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<Config>,
    advent: Res<Advent>,
) {
    let tree: Handle<Scene> = asset_server.load(config.assets.tree.as_str());
    commands.spawn((
        SceneBundle {
            scene: tree,
            ..default()
        },
        Tree,
        Name::new("Christmas tree"),
    ));

    debug!("Adding decorations to tree");
    let decoration: Handle<Scene> = asset_server.load(config.assets.decoration.as_str());
    for &placed in advent.calendar().decorations() {
        let [r, g, b] = placed.tint;
        commands.spawn((
            SceneBundle {
                scene: decoration.clone(),
                transform: Transform::from_translation(placed.position),
                ..default()
            },
            DecorationDay {
                day: placed.day,
                tint: Color::rgb_linear(r, g, b),
            },
            Name::new(format!("Decoration {}", placed.day)),
        ));
    }
    debug!("Finished adding decorations to tree");
}

/// Log once whether the tree model loaded.
pub(super) fn report_tree_loaded(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    trees: Query<(Entity, &Handle<Scene>), (With<Tree>, Without<Reported>)>,
) {
    for (entity, handle) in trees.iter() {
        match asset_server.get_load_state(handle) {
            LoadState::Loaded => info!("Christmas tree loaded successfully"),
            LoadState::Failed => warn!("Unable to load Christmas tree"),
            _ => continue,
        }
        commands.entity(entity).insert(Reported);
    }
}

/// Give every mesh of a decoration its own copy of its material, painted in the decoration's
/// tint. The meshes only exist once the decoration's scene has spawned, so this keeps trying until
/// then.
#[instrument(skip_all)]
pub(super) fn tint_decorations(
    mut commands: Commands,
    decorations: Query<(Entity, &DecorationDay), Without<Tinted>>,
    children: Query<&Children>,
    mut mesh_materials: Query<&mut Handle<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, decoration) in decorations.iter() {
        let mut descendants = Vec::new();
        collect_descendants(entity, &children, &mut descendants);

        let meshes: Vec<Entity> = descendants
            .into_iter()
            .filter(|&e| mesh_materials.get(e).is_ok())
            .collect();
        if meshes.is_empty() {
            continue;
        }

        for mesh in meshes {
            let Ok(mut handle) = mesh_materials.get_mut(mesh) else {
                continue;
            };

            // Materials are shared between every instance of the model
            let Some(mut material) = materials.get(&*handle).cloned() else {
                continue;
            };
            material.base_color = decoration.tint;
            *handle = materials.add(material);
        }

        commands.entity(entity).insert(Tinted);
        trace!(day = decoration.day, "Tinted decoration");
    }
}

/// Push every descendant of the given entity onto `out`, depth first.
fn collect_descendants(entity: Entity, children: &Query<&Children>, out: &mut Vec<Entity>) {
    if let Ok(kids) = children.get(entity) {
        for &child in kids.iter() {
            out.push(child);
            collect_descendants(child, children, out);
        }
    }
}
