//! Orbit controls with click-to-retarget.
//!
//! Left drag orbits, right drag pans and the wheel dollies. A click moves the
//! orbit center to the surface under the cursor; a double click also pulls
//! the camera towards it.

pub mod controls;
pub mod debounce;

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::interaction::{CLICK_GRACE_MS, ORTHOGRAPHIC_MIN_SCALE};
use std::time::Duration;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::orbit::OrbitState;
use crate::engine::camera::viewer_camera::{ActiveCamera, ViewerCamera};
use crate::engine::core::app_state::{AppState, ViewerSet};
use crate::engine::scene::helpers::{OrbitMarker, fade_orbit_marker, show_orbit_marker};
use crate::tools::control_manager::{
    ControlMode, ControlModeChanged, control_mode_is, handle_control_mode_events,
};
use crate::tools::interaction_gate::interaction_listening;
use crate::tools::pointer::{PointerRaycaster, browser_wheel_delta};
use controls::{
    dolly, dolly_factor, orbit_rotate, pan_translation, pan_units_per_pixel, zoom_to_position,
};
use debounce::{ClickAction, ClickDebouncer, is_click};

/// Press position of the current left-button gesture plus the click debouncer.
#[derive(Resource, Debug)]
pub struct OrbitClickState {
    press: Option<Vec2>,
    resolved: Option<ClickAction>,
    debouncer: ClickDebouncer,
}

impl Default for OrbitClickState {
    fn default() -> Self {
        Self {
            press: None,
            resolved: None,
            debouncer: ClickDebouncer::new(Duration::from_millis(CLICK_GRACE_MS)),
        }
    }
}

impl OrbitClickState {
    pub fn reset(&mut self) {
        self.press = None;
        self.resolved = None;
        self.debouncer.cancel();
    }
}

pub struct OrbitClickPlugin;

impl Plugin for OrbitClickPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitClickState>()
            .add_systems(
                Update,
                (
                    apply_click_grace.run_if(resource_exists_and_changed::<ViewerConfig>),
                    reset_clicks_on_mode_change.after(handle_control_mode_events),
                )
                    .in_set(ViewerSet::Commands),
            )
            .add_systems(
                Update,
                (
                    orbit_pointer_input.run_if(
                        control_mode_is(ControlMode::Orbit).and(interaction_listening),
                    ),
                    resolve_orbit_clicks.run_if(control_mode_is(ControlMode::Orbit)),
                )
                    .chain()
                    .in_set(ViewerSet::PointerInput)
                    .run_if(in_state(AppState::Running)),
            )
            .add_systems(Update, fade_orbit_marker.in_set(ViewerSet::Feedback));
    }
}

fn apply_click_grace(config: Res<ViewerConfig>, mut state: ResMut<OrbitClickState>) {
    state.debouncer.set_grace(config.click_grace());
}

fn reset_clicks_on_mode_change(
    mut changes: EventReader<ControlModeChanged>,
    mut state: ResMut<OrbitClickState>,
) {
    if changes.read().last().is_some() {
        state.reset();
    }
}

/// Drag, wheel and click gestures for the live camera in orbit mode.
pub fn orbit_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    active: Res<ActiveCamera>,
    mut cameras: Query<(&Camera, &mut Transform, &mut Projection), With<ViewerCamera>>,
    mut orbit: ResMut<OrbitState>,
    mut state: ResMut<OrbitClickState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, mut transform, mut projection)) = cameras.get_mut(active.entity()) else {
        return;
    };
    let cursor = window.cursor_position();
    let viewport = camera
        .logical_viewport_size()
        .unwrap_or_else(|| Vec2::new(window.width(), window.height()));
    let delta: Vec2 = motion.read().map(|event| event.delta).sum();

    if mouse.just_pressed(MouseButton::Left) {
        state.press = cursor;
    }

    if delta != Vec2::ZERO {
        if mouse.pressed(MouseButton::Left) {
            transform.translation = orbit_rotate(transform.translation, orbit.center, delta, viewport.y);
            transform.look_at(orbit.center, Vec3::Y);
        } else if mouse.pressed(MouseButton::Right) {
            let distance = transform.translation.distance(orbit.center);
            let units = pan_units_per_pixel(&projection, distance, viewport.y);
            let translation = pan_translation(delta, transform.right().as_vec3(), units);
            transform.translation += translation;
            orbit.center += translation;
        }
    }

    if mouse.just_released(MouseButton::Left) {
        let press = state.press.take();
        if let (Some(press), Some(release)) = (press, cursor) {
            if is_click(press, release) {
                state.resolved = state.debouncer.click(release);
            }
        }
    }

    let wheel_delta: f32 = wheel
        .read()
        .map(|event| browser_wheel_delta(event.unit, event.y))
        .sum();
    if wheel_delta != 0.0 {
        let factor = dolly_factor(wheel_delta);
        match &mut *projection {
            Projection::Orthographic(orthographic) => {
                orthographic.scale = (orthographic.scale * factor).max(ORTHOGRAPHIC_MIN_SCALE);
            }
            _ => {
                transform.translation = dolly(transform.translation, orbit.center, factor);
            }
        }
    }
}

/// Fire debounced clicks: retarget the orbit at the surface under the cursor
/// and, for double clicks, pull the camera in front of it.
pub fn resolve_orbit_clicks(
    time: Res<Time>,
    mut state: ResMut<OrbitClickState>,
    mut pointer: PointerRaycaster,
    mut orbit: ResMut<OrbitState>,
    mut markers: Query<(&mut Transform, &mut OrbitMarker)>,
) {
    let action = match state.resolved.take() {
        Some(action) => Some(action),
        None => state.debouncer.tick(time.delta()),
    };
    let Some(action) = action else {
        return;
    };

    let (cursor, zoom_to) = match action {
        ClickAction::Single(cursor) => (cursor, false),
        ClickAction::Double(cursor) => (cursor, true),
    };
    let Some(hit) = pointer.hit_at(cursor) else {
        return;
    };

    orbit.set_orbit_target(hit.point);
    if zoom_to {
        if let Some(camera) = pointer.camera_transform() {
            orbit.set_camera_target(zoom_to_position(hit.point, camera.forward().as_vec3()));
        }
    }
    show_orbit_marker(hit.point, &mut markers);

    debug!("Orbit target set to {:?} (zoom: {zoom_to})", hit.point);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::pointer::test_scene::{pointer_app, spawn_cube};
    use constants::interaction::ZOOM_TO_OFFSET;

    fn click_app(action: ClickAction) -> App {
        let mut app = pointer_app();
        let mut state = OrbitClickState::default();
        state.resolved = Some(action);
        app.insert_resource(state)
            .init_resource::<OrbitState>()
            .add_systems(Update, resolve_orbit_clicks);
        spawn_cube(&mut app, Vec3::ZERO, 2.0);
        app
    }

    #[test]
    fn reset_clears_gesture_and_pending_click() {
        let mut state = OrbitClickState::default();
        state.press = Some(Vec2::ONE);
        state.debouncer.click(Vec2::ONE);

        state.reset();

        assert!(state.press.is_none());
        assert!(!state.debouncer.has_pending());
    }

    #[test]
    fn config_grace_reaches_the_debouncer() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<OrbitClickState>()
            .insert_resource(ViewerConfig {
                click_grace_ms: 50,
                ..default()
            })
            .add_systems(Update, apply_click_grace);
        app.update();

        let mut state = app.world_mut().resource_mut::<OrbitClickState>();
        state.debouncer.click(Vec2::ZERO);
        assert_eq!(
            state.debouncer.tick(Duration::from_millis(60)),
            Some(ClickAction::Single(Vec2::ZERO))
        );
    }

    #[test]
    fn single_click_retargets_the_orbit_only() {
        let mut app = click_app(ClickAction::Single(Vec2::new(50.0, 50.0)));
        app.update();

        let orbit = app.world().resource::<OrbitState>();
        let target = orbit.orbit_target().expect("orbit target");
        assert!(target.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-3));
        assert!(orbit.camera_target().is_none());
    }

    #[test]
    fn double_click_also_pulls_the_camera_in_front_of_the_hit() {
        let mut app = click_app(ClickAction::Double(Vec2::new(50.0, 50.0)));
        app.update();

        let orbit = app.world().resource::<OrbitState>();
        let camera = orbit.camera_target().expect("camera target");
        // The camera looks down -Z, so backing off from the hit lands on +Z.
        assert!(camera.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0 + ZOOM_TO_OFFSET), 1e-3));
    }

    #[test]
    fn click_on_empty_space_changes_nothing() {
        let mut app = click_app(ClickAction::Double(Vec2::new(1.0, 1.0)));
        app.update();

        assert!(!app.world().resource::<OrbitState>().is_converging());
    }
}
