use bevy::prelude::*;
use constants::interaction::{PIVOT_ROTATION_SPEED, PIVOT_ZOOM_FACTOR};

/// Rotation angles (about the vertical then the horizontal axis) for a
/// pointer move of `delta` pixels.
pub fn drag_angles(delta: Vec2) -> Vec2 {
    Vec2::new(delta.x * PIVOT_ROTATION_SPEED, -delta.y * PIVOT_ROTATION_SPEED)
}

/// World Y and X axes to rotate about. Surface grabs express them in the
/// grabbed object's parent space; fallback grabs use them as-is.
pub fn rotation_axes(surface_hit: bool, parent_rotation: Quat) -> (Vec3, Vec3) {
    if surface_hit {
        let to_parent = parent_rotation.inverse();
        (
            (to_parent * Vec3::Y).normalize(),
            (to_parent * Vec3::X).normalize(),
        )
    } else {
        (Vec3::Y, Vec3::X)
    }
}

/// Rotate a local transform about `pivot` (in the same parent space),
/// vertical axis first.
pub fn rotate_about_pivot(transform: &mut Transform, pivot: Vec3, axes: (Vec3, Vec3), angles: Vec2) {
    let (axis_y, axis_x) = axes;
    transform.rotate_around(pivot, Quat::from_axis_angle(axis_y, angles.x));
    transform.rotate_around(pivot, Quat::from_axis_angle(axis_x, angles.y));
}

/// Camera position after a wheel step towards or away from `pivot`, on the
/// line through both and at a distance clamped to `[min, max]`.
pub fn wheel_zoom_target(camera: Vec3, pivot: Vec3, wheel_delta: f32, min: f32, max: f32) -> Option<Vec3> {
    let towards_pivot = (pivot - camera).try_normalize()?;
    let distance = (camera.distance(pivot) + wheel_delta * PIVOT_ZOOM_FACTOR).clamp(min, max);
    Some(pivot - towards_pivot * distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotation_keeps_the_pivot_fixed() {
        let pivot = Vec3::new(2.0, 1.0, -3.0);
        let mut transform = Transform::from_xyz(5.0, 0.0, 1.0)
            .with_rotation(Quat::from_rotation_z(0.4))
            .with_scale(Vec3::splat(2.0));
        let pivot_in_object = transform.compute_affine().inverse().transform_point3(pivot);

        for delta in [Vec2::new(30.0, 0.0), Vec2::new(-12.0, 45.0), Vec2::new(200.0, -80.0)] {
            let axes = rotation_axes(true, Quat::from_rotation_y(0.7));
            rotate_about_pivot(&mut transform, pivot, axes, drag_angles(delta));

            let moved = transform.transform_point(pivot_in_object);
            assert!(moved.abs_diff_eq(pivot, 1e-3), "{delta:?} moved pivot to {moved:?}");
        }
    }

    #[test]
    fn surface_axes_undo_the_parent_rotation() {
        let parent = Quat::from_rotation_z(FRAC_PI_2);
        let (axis_y, axis_x) = rotation_axes(true, parent);

        assert!((parent * axis_y).abs_diff_eq(Vec3::Y, 1e-5));
        assert!((parent * axis_x).abs_diff_eq(Vec3::X, 1e-5));
        assert_eq!(rotation_axes(false, parent), (Vec3::Y, Vec3::X));
    }

    #[test]
    fn horizontal_drag_turns_about_vertical_axis() {
        let mut transform = Transform::from_xyz(1.0, 0.0, 0.0);
        let quarter = Vec2::new(FRAC_PI_2 / PIVOT_ROTATION_SPEED, 0.0);
        rotate_about_pivot(&mut transform, Vec3::ZERO, (Vec3::Y, Vec3::X), drag_angles(quarter));

        assert!(transform.translation.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-4));
    }

    #[test]
    fn zoom_distance_stays_within_limits() {
        let pivot = Vec3::new(1.0, 2.0, 3.0);
        for start in [0.5_f32, 5.0, 30.0, 99.0, 400.0] {
            for wheel in [-10_000.0_f32, -300.0, -1.0, 0.0, 1.0, 300.0, 10_000.0] {
                let camera = pivot + Vec3::new(1.0, 0.5, -2.0).normalize() * start;
                let target = wheel_zoom_target(camera, pivot, wheel, 5.0, 100.0).expect("distinct points");
                let distance = target.distance(pivot);

                assert!((5.0 - 1e-3..=100.0 + 1e-3).contains(&distance), "{start} {wheel} -> {distance}");
                assert!((target - pivot).normalize().abs_diff_eq((camera - pivot).normalize(), 1e-4));
            }
        }
    }

    #[test]
    fn zoom_needs_distinct_camera_and_pivot() {
        assert!(wheel_zoom_target(Vec3::ONE, Vec3::ONE, 10.0, 5.0, 100.0).is_none());
    }
}
