//! Grab-and-rotate controls.
//!
//! Pressing on the model grabs its top-level object and pins a pivot at the
//! surface hit; dragging rotates the object about that pivot. With nothing
//! under the cursor the mesh nearest the camera is grabbed about its center.
//! The wheel moves the camera along the line to the pivot.

pub mod rotation;
pub mod state;

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::window::PrimaryWindow;
use constants::interaction::{PIVOT_MAX_DISTANCE, PIVOT_MIN_DISTANCE};
use constants::render_settings::PIVOT_AXES_LENGTH;

use crate::engine::assets::bounds::world_center;
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::orbit::OrbitState;
use crate::engine::camera::viewer_camera::{ActiveCamera, ViewerCamera};
use crate::engine::core::app_state::{AppState, ViewerSet};
use crate::engine::scene::helpers::{PivotMarker, SceneHelper};
use crate::engine::scene::model::ViewerSceneRoot;
use crate::tools::control_manager::{
    ControlMode, ControlModeChanged, control_mode_is, handle_control_mode_events,
};
use crate::tools::pointer::{
    PointerRaycaster, browser_wheel_delta, nearest_by_center, top_level_ancestor,
};
use rotation::{drag_angles, rotate_about_pivot, rotation_axes, wheel_zoom_target};
use state::PivotDragState;

pub struct PivotDragPlugin;

impl Plugin for PivotDragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PivotDragState>()
            .add_systems(
                Update,
                clear_pivot_on_mode_change
                    .after(handle_control_mode_events)
                    .in_set(ViewerSet::Commands),
            )
            .add_systems(
                Update,
                (pivot_press, pivot_drag, pivot_release, pivot_wheel_zoom)
                    .chain()
                    .in_set(ViewerSet::PointerInput)
                    .run_if(in_state(AppState::Running).and(control_mode_is(ControlMode::Pivot))),
            )
            .add_systems(Update, show_pivot_marker.in_set(ViewerSet::Feedback));
    }
}

fn clear_pivot_on_mode_change(
    mut changes: EventReader<ControlModeChanged>,
    mut state: ResMut<PivotDragState>,
) {
    if changes.read().last().is_some() {
        state.clear();
    }
}

/// Grab the object under the cursor, or the mesh nearest the camera.
pub fn pivot_press(
    mouse: Res<ButtonInput<MouseButton>>,
    mut pointer: PointerRaycaster,
    roots: Query<Entity, With<ViewerSceneRoot>>,
    parents: Query<&ChildOf>,
    meshes: Query<(Entity, &Aabb, &GlobalTransform), (With<Mesh3d>, Without<SceneHelper>)>,
    mut state: ResMut<PivotDragState>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(cursor) = pointer.cursor() else {
        return;
    };
    let Ok(root) = roots.single() else {
        return;
    };
    let grabbable = |entity: Entity| {
        top_level_ancestor(entity, root, |child| {
            parents.get(child).ok().map(|child_of| child_of.parent())
        })
        .unwrap_or(entity)
    };

    if let Some(hit) = pointer.hit_at(cursor) {
        let object = grabbable(hit.entity);
        state.grab(object, hit.point, true, cursor);
        debug!("Grabbed {object} at surface point {:?}", hit.point);
        return;
    }

    let Some(camera) = pointer.camera_transform().map(|transform| transform.translation()) else {
        return;
    };
    let centers = meshes
        .iter()
        .map(|(entity, aabb, transform)| (entity, world_center(aabb, transform)));
    if let Some((mesh, center)) = nearest_by_center(camera, centers) {
        let object = grabbable(mesh);
        state.grab(object, center, false, cursor);
        debug!("Grabbed {object} about nearest mesh center {center:?}");
    }
}

/// Rotate the grabbed object about the pivot by the pointer travel.
pub fn pivot_drag(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut state: ResMut<PivotDragState>,
    mut objects: Query<(&mut Transform, Option<&ChildOf>)>,
    globals: Query<&GlobalTransform>,
) {
    let Some(cursor) = windows.single().ok().and_then(Window::cursor_position) else {
        // Restart the delta when the pointer comes back instead of jumping.
        state.bypass_change_detection().forget_cursor();
        return;
    };
    let (Some(object), Some(pivot)) = (state.grabbed(), state.pivot()) else {
        return;
    };
    let Some(delta) = state.drag_delta(cursor) else {
        return;
    };
    if delta == Vec2::ZERO {
        return;
    }
    let Ok((mut transform, child_of)) = objects.get_mut(object) else {
        state.clear();
        return;
    };

    let parent = child_of
        .and_then(|child_of| globals.get(child_of.parent()).ok())
        .copied()
        .unwrap_or(GlobalTransform::IDENTITY);
    let (_, parent_rotation, _) = parent.to_scale_rotation_translation();
    let pivot_local = parent.affine().inverse().transform_point3(pivot);

    rotate_about_pivot(
        &mut transform,
        pivot_local,
        rotation_axes(state.surface_hit(), parent_rotation),
        drag_angles(delta),
    );
}

pub fn pivot_release(mouse: Res<ButtonInput<MouseButton>>, mut state: ResMut<PivotDragState>) {
    if mouse.just_released(MouseButton::Left) && state.is_dragging() {
        state.release();
    }
}

/// Move the camera towards or away from the pivot by the wheel delta.
pub fn pivot_wheel_zoom(
    mut wheel: EventReader<MouseWheel>,
    state: Res<PivotDragState>,
    active: Res<ActiveCamera>,
    cameras: Query<&Transform, With<ViewerCamera>>,
    config: Option<Res<ViewerConfig>>,
    mut orbit: ResMut<OrbitState>,
) {
    let wheel_delta: f32 = wheel
        .read()
        .map(|event| browser_wheel_delta(event.unit, event.y))
        .sum();
    if wheel_delta == 0.0 {
        return;
    }
    let Some(pivot) = state.pivot() else {
        return;
    };
    let Ok(camera) = cameras.get(active.entity()) else {
        return;
    };

    let (min, max) = config.map_or((PIVOT_MIN_DISTANCE, PIVOT_MAX_DISTANCE), |config| {
        (config.min_zoom_distance, config.max_zoom_distance)
    });
    if let Some(target) = wheel_zoom_target(camera.translation, pivot, wheel_delta, min, max) {
        orbit.set_camera_target(target);
    }
}

/// Keep the pivot sphere and axes on the pivot while one is set.
pub fn show_pivot_marker(
    state: Res<PivotDragState>,
    mut markers: Query<(&mut Transform, &mut Visibility), With<PivotMarker>>,
    mut gizmos: Gizmos,
) {
    let pivot = state.pivot();
    if let Some(point) = pivot {
        gizmos.axes(Transform::from_translation(point), PIVOT_AXES_LENGTH);
    }

    if !state.is_changed() {
        return;
    }
    for (mut transform, mut visibility) in &mut markers {
        match pivot {
            Some(point) => {
                transform.translation = point;
                visibility.set_if_neq(Visibility::Visible);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}
