use bevy::prelude::*;
use constants::interaction::{
    ORBIT_MIN_RADIUS, ORBIT_POLAR_EPSILON, ORBIT_ZOOM_SCALE, WHEEL_NOTCH_PIXELS, ZOOM_TO_OFFSET,
};
use std::f32::consts::{PI, TAU};

/// Rotate `position` about `center` for a drag of `delta` pixels.
/// A drag across the full viewport height turns one full revolution; the
/// polar angle stays strictly between the poles so `look_at` keeps working.
pub fn orbit_rotate(position: Vec3, center: Vec3, delta: Vec2, viewport_height: f32) -> Vec3 {
    let offset = position - center;
    let radius = offset.length();
    if radius <= f32::EPSILON || viewport_height <= 0.0 {
        return position;
    }

    let azimuth = offset.x.atan2(offset.z) - TAU * delta.x / viewport_height;
    let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() - TAU * delta.y / viewport_height)
        .clamp(ORBIT_POLAR_EPSILON, PI - ORBIT_POLAR_EPSILON);

    center
        + Vec3::new(
            radius * polar.sin() * azimuth.sin(),
            radius * polar.cos(),
            radius * polar.sin() * azimuth.cos(),
        )
}

/// World units covered by one screen pixel at the orbit center.
pub fn pan_units_per_pixel(projection: &Projection, distance: f32, viewport_height: f32) -> f32 {
    if viewport_height <= 0.0 {
        return 0.0;
    }
    match projection {
        Projection::Perspective(perspective) => {
            2.0 * distance * (perspective.fov * 0.5).tan() / viewport_height
        }
        Projection::Orthographic(orthographic) => orthographic.area.height() / viewport_height,
        #[allow(unreachable_patterns)]
        _ => 0.0,
    }
}

/// Translation for a pan drag, kept in the ground plane: horizontal drags
/// slide along the camera's right axis, vertical drags along the
/// horizontal forward axis.
pub fn pan_translation(delta: Vec2, camera_right: Vec3, units_per_pixel: f32) -> Vec3 {
    let right = camera_right.normalize_or_zero();
    let ground_forward = Vec3::Y.cross(right);
    (-right * delta.x + ground_forward * delta.y) * units_per_pixel
}

/// Multiplier for the orbit radius (or orthographic scale) for a browser
/// wheel delta. Scrolling up (negative) zooms in.
pub fn dolly_factor(wheel_delta: f32) -> f32 {
    let scale = ORBIT_ZOOM_SCALE.powf(wheel_delta.abs() / WHEEL_NOTCH_PIXELS);
    if wheel_delta < 0.0 {
        scale
    } else if wheel_delta > 0.0 {
        1.0 / scale
    } else {
        1.0
    }
}

/// Move `position` along its offset from `center` by `factor`.
pub fn dolly(position: Vec3, center: Vec3, factor: f32) -> Vec3 {
    let offset = position - center;
    let radius = (offset.length() * factor).max(ORBIT_MIN_RADIUS);
    center + offset.normalize_or(Vec3::Z) * radius
}

/// Where a double click parks the camera: a fixed distance back from the hit
/// along the current view direction.
pub fn zoom_to_position(hit: Vec3, view_direction: Vec3) -> Vec3 {
    hit - view_direction * ZOOM_TO_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_radius_and_clamps_poles() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let start = center + Vec3::new(0.0, 0.0, 10.0);

        let quarter = orbit_rotate(start, center, Vec2::new(-250.0, 0.0), 1000.0);
        assert!((quarter.distance(center) - 10.0).abs() < 1e-4);
        assert!(quarter.abs_diff_eq(center + Vec3::new(10.0, 0.0, 0.0), 1e-3));

        let over_the_top = orbit_rotate(start, center, Vec2::new(0.0, 5000.0), 1000.0);
        let offset = over_the_top - center;
        assert!(offset.y > 9.99 && offset.y <= 10.0 + 1e-4);
        assert!(Vec2::new(offset.x, offset.z).length() > 0.0);
    }

    #[test]
    fn pan_stays_in_ground_plane() {
        let right = Vec3::new(1.0, 0.0, 0.0);
        let translation = pan_translation(Vec2::new(10.0, 20.0), right, 0.5);
        assert_eq!(translation.y, 0.0);
        assert!(translation.abs_diff_eq(Vec3::new(-5.0, 0.0, -10.0), 1e-5));
    }

    #[test]
    fn perspective_pan_matches_view_height() {
        let projection = Projection::from(PerspectiveProjection {
            fov: std::f32::consts::FRAC_PI_2,
            ..default()
        });
        // The frustum is 20 units tall at distance 10, spread over 100 px.
        assert!((pan_units_per_pixel(&projection, 10.0, 100.0) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn wheel_direction_sets_zoom_direction() {
        assert!(dolly_factor(-100.0) < 1.0);
        assert!((dolly_factor(-100.0) - ORBIT_ZOOM_SCALE).abs() < 1e-6);
        assert!(dolly_factor(100.0) > 1.0);
        assert_eq!(dolly_factor(0.0), 1.0);

        let closer = dolly(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, dolly_factor(-100.0));
        assert!((closer.z - 9.5).abs() < 1e-5);
        assert!(dolly(Vec3::Z, Vec3::ZERO, 0.0).z >= ORBIT_MIN_RADIUS);
    }

    #[test]
    fn zoom_to_backs_off_along_the_view() {
        let hit = Vec3::new(2.0, 1.0, -3.0);
        let forward = Vec3::new(0.0, -0.6, -0.8);

        let position = zoom_to_position(hit, forward);
        assert!(position.abs_diff_eq(Vec3::new(2.0, 7.0, 5.0), 1e-5));
        assert!((position.distance(hit) - ZOOM_TO_OFFSET).abs() < 1e-5);
    }
}
