use bevy::math::curve::{Curve, EaseFunction, EasingCurve};
use bevy::prelude::*;
use std::time::Duration;

use crate::engine::camera::orbit::OrbitState;

/// A smooth camera move requested from outside the camera's owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    pub position: Vec3,
    pub up: Vec3,
    pub duration: Duration,
    pub look_at: Option<Vec3>,
}

/// Registration slot for whichever camera currently accepts external moves.
///
/// The camera switcher registers the live camera; callers such as the RPC
/// bridge go through [`CameraControl::update_camera`] and learn from the
/// return value whether anyone was listening.
#[derive(Resource, Debug, Default)]
pub struct CameraControl {
    owner: Option<Entity>,
    pending: Option<CameraMove>,
}

impl CameraControl {
    /// Register `owner`, replacing any previous registration.
    pub fn register(&mut self, owner: Entity) {
        if self.owner != Some(owner) {
            debug!("Camera updater registered for {owner}");
        }
        self.owner = Some(owner);
    }

    pub fn unregister(&mut self) {
        self.owner = None;
        self.pending = None;
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    /// Queue a move for the registered camera. Returns `false` without an owner.
    pub fn update_camera(&mut self, request: CameraMove) -> bool {
        if self.owner.is_none() {
            warn!("Camera updater not registered yet, dropping camera move");
            return false;
        }
        self.pending = Some(request);
        true
    }

    fn take_pending(&mut self) -> Option<(Entity, CameraMove)> {
        let owner = self.owner?;
        self.pending.take().map(|request| (owner, request))
    }
}

/// Eased position (and optionally view direction) animation on a camera.
#[derive(Component, Debug, Clone)]
pub struct CameraTween {
    start_position: Vec3,
    target_position: Vec3,
    up: Vec3,
    look: Option<LookTween>,
    elapsed: Duration,
    duration: Duration,
    easing: EasingCurve<f32>,
}

#[derive(Debug, Clone, Copy)]
struct LookTween {
    start_direction: Vec3,
    end_direction: Vec3,
    target: Vec3,
}

impl CameraTween {
    pub fn new(from: &Transform, request: CameraMove) -> Self {
        let look = request.look_at.map(|target| LookTween {
            start_direction: from.forward().as_vec3(),
            end_direction: (target - from.translation).normalize_or(from.forward().as_vec3()),
            target,
        });

        Self {
            start_position: from.translation,
            target_position: request.position,
            up: request.up.normalize_or(Vec3::Y),
            look,
            elapsed: Duration::ZERO,
            duration: request.duration,
            easing: EasingCurve::new(0.0, 1.0, EaseFunction::CubicInOut),
        }
    }

    pub fn look_target(&self) -> Option<Vec3> {
        self.look.map(|look| look.target)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `delta` and write the eased pose into `transform`.
    pub fn advance(&mut self, delta: Duration, transform: &mut Transform) {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        let alpha = self.easing.sample_clamped(progress);

        transform.translation = self.start_position.lerp(self.target_position, alpha);

        match self.look {
            Some(look) => {
                let direction = look.start_direction.lerp(look.end_direction, alpha);
                // Opposite start/end directions pass through zero halfway; hold the pose there.
                if direction.length_squared() > f32::EPSILON {
                    let focus = transform.translation + direction;
                    transform.look_at(focus, self.up);
                }
            }
            // Without a look-at the view direction is kept and only rolled onto `up` at the end.
            None if self.is_finished() => {
                let forward = transform.forward();
                transform.look_to(forward, self.up);
            }
            None => {}
        }
    }
}

/// Hand any queued move to the registered camera, replacing a running tween.
pub fn start_camera_moves(
    mut control: ResMut<CameraControl>,
    mut commands: Commands,
    cameras: Query<&Transform>,
) {
    let Some((owner, request)) = control.take_pending() else {
        return;
    };
    let Ok(transform) = cameras.get(owner) else {
        warn!("Registered camera {owner} no longer exists");
        control.unregister();
        return;
    };

    info!(
        "Camera move to {:?} over {} ms",
        request.position,
        request.duration.as_millis()
    );
    commands.entity(owner).insert(CameraTween::new(transform, request));
}

pub fn animate_camera_moves(
    time: Res<Time>,
    mut commands: Commands,
    mut orbit: ResMut<OrbitState>,
    mut tweens: Query<(Entity, &mut Transform, &mut CameraTween)>,
) {
    for (entity, mut transform, mut tween) in &mut tweens {
        tween.advance(time.delta(), &mut transform);

        if tween.is_finished() {
            if let Some(target) = tween.look_target() {
                orbit.reset(target);
            }
            commands.entity(entity).remove::<CameraTween>();
        }
    }
}
