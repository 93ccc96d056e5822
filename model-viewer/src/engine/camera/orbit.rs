use bevy::prelude::*;
use constants::interaction::{CAMERA_TARGET_EPSILON, EASING_SPEED, ORBIT_TARGET_EPSILON};

use crate::engine::camera::camera_control::CameraTween;
use crate::engine::camera::viewer_camera::{ActiveCamera, ViewerCamera};
use crate::tools::control_manager::{ControlManager, ControlMode};

/// Orbit center plus the two independent convergences that may be in flight:
/// the center easing towards a clicked point, and the camera easing towards
/// a zoom-to position. A new target replaces the old one, never queues.
#[derive(Resource, Debug, Clone)]
pub struct OrbitState {
    pub center: Vec3,
    orbit_target: Option<Vec3>,
    camera_target: Option<Vec3>,
    easing: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            orbit_target: None,
            camera_target: None,
            easing: EASING_SPEED,
        }
    }
}

impl OrbitState {
    pub fn set_orbit_target(&mut self, target: Vec3) {
        self.orbit_target = Some(target);
    }

    pub fn set_camera_target(&mut self, target: Vec3) {
        self.camera_target = Some(target);
    }

    pub fn orbit_target(&self) -> Option<Vec3> {
        self.orbit_target
    }

    pub fn camera_target(&self) -> Option<Vec3> {
        self.camera_target
    }

    /// Drop both convergences, leaving the center where it is.
    pub fn cancel(&mut self) {
        self.orbit_target = None;
        self.camera_target = None;
    }

    /// Jump the center without easing, cancelling everything in flight.
    pub fn reset(&mut self, center: Vec3) {
        self.center = center;
        self.cancel();
    }

    pub fn is_converging(&self) -> bool {
        self.orbit_target.is_some() || self.camera_target.is_some()
    }

    /// Advance the center one frame. Returns whether it moved.
    pub fn step_center(&mut self) -> bool {
        let Some(target) = self.orbit_target else {
            return false;
        };
        self.center = converge(self.center, target, self.easing, ORBIT_TARGET_EPSILON, &mut self.orbit_target);
        true
    }

    /// Advance `position` one frame towards the camera target. Returns whether it moved.
    pub fn step_camera(&mut self, position: &mut Vec3) -> bool {
        let Some(target) = self.camera_target else {
            return false;
        };
        *position = converge(*position, target, self.easing, CAMERA_TARGET_EPSILON, &mut self.camera_target);
        true
    }
}

fn converge(current: Vec3, target: Vec3, rate: f32, epsilon: f32, slot: &mut Option<Vec3>) -> Vec3 {
    let next = current.lerp(target, rate);
    if next.distance(target) < epsilon {
        *slot = None;
        target
    } else {
        next
    }
}

/// Whether the camera is being animated by a convergence or a tween this frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CameraMotion {
    pub in_motion: bool,
}

/// Per-frame convergence step for the active camera.
/// In orbit mode the camera re-aims at the center; in pivot mode only its position moves.
pub fn advance_orbit_convergence(
    mut orbit: ResMut<OrbitState>,
    active: Res<ActiveCamera>,
    control: Res<ControlManager>,
    mut cameras: Query<&mut Transform, (With<ViewerCamera>, Without<CameraTween>)>,
) {
    if !orbit.is_converging() {
        return;
    }
    let Ok(mut transform) = cameras.get_mut(active.entity()) else {
        return;
    };

    let center_moved = orbit.step_center();
    let camera_moved = orbit.step_camera(&mut transform.translation);

    if (center_moved || camera_moved) && control.is_active(ControlMode::Orbit) {
        transform.look_at(orbit.center, Vec3::Y);
    }
}

pub fn update_camera_motion(
    orbit: Res<OrbitState>,
    tweens: Query<(), With<CameraTween>>,
    mut motion: ResMut<CameraMotion>,
) {
    let in_motion = orbit.is_converging() || !tweens.is_empty();
    if motion.in_motion != in_motion {
        motion.in_motion = in_motion;
    }
}
