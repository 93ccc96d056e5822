use bevy::prelude::*;
use bevy::render::primitives::Aabb;

use crate::engine::assets::bounds::SceneBounds;

/// Parent of everything loaded into the viewer. Pointer tools treat its
/// direct children as the grabbable top-level objects.
#[derive(Component, Debug, Default)]
pub struct ViewerSceneRoot;

pub fn spawn_scene_root(commands: &mut Commands) -> Entity {
    commands
        .spawn((
            ViewerSceneRoot,
            Transform::default(),
            Visibility::default(),
            Name::new("viewer_scene_root"),
        ))
        .id()
}

/// World-space bounds of every mesh in `meshes`.
pub fn scene_bounds<'a>(
    meshes: impl IntoIterator<Item = (&'a Aabb, &'a GlobalTransform)>,
) -> SceneBounds {
    meshes
        .into_iter()
        .fold(SceneBounds::EMPTY, |mut bounds, (aabb, transform)| {
            bounds.include_aabb(aabb, transform);
            bounds
        })
}
