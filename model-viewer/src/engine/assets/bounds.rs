use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use serde::Serialize;

/// World-space axis-aligned bounds of everything rendered in the scene.
/// Starts empty and grows as mesh bounds are folded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl SceneBounds {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Fold in a mesh's local bounds, transformed to world space corner by corner.
    pub fn include_aabb(&mut self, aabb: &Aabb, transform: &GlobalTransform) {
        let center = Vec3::from(aabb.center);
        let half = Vec3::from(aabb.half_extents);
        for corner in 0..8u8 {
            let sign = Vec3::new(
                if corner & 1 == 0 { -1.0 } else { 1.0 },
                if corner & 2 == 0 { -1.0 } else { 1.0 },
                if corner & 4 == 0 { -1.0 } else { 1.0 },
            );
            self.include_point(transform.transform_point(center + half * sign));
        }
    }

    /// Calculate center point for camera framing and orbit placement.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}

/// World center of a mesh's bounds. The world box of an affinely transformed
/// box is symmetric about the transformed center, so no corner pass is needed.
pub fn world_center(aabb: &Aabb, transform: &GlobalTransform) -> Vec3 {
    transform.transform_point(Vec3::from(aabb.center))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bounds_report_no_size() {
        let bounds = SceneBounds::default();
        assert!(bounds.is_empty());
        assert_eq!(bounds.size(), Vec3::ZERO);
    }

    #[test]
    fn transformed_aabb_covers_rotated_corners() {
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let transform = GlobalTransform::from(
            Transform::from_xyz(10.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4)),
        );

        let mut bounds = SceneBounds::default();
        bounds.include_aabb(&aabb, &transform);

        let reach = 2.0_f32.sqrt();
        assert!(bounds.center().abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-5));
        assert!(bounds.size().abs_diff_eq(Vec3::new(2.0 * reach, 2.0, 2.0 * reach), 1e-5));
        assert!((bounds.max_dimension() - 2.0 * reach).abs() < 1e-5);
    }

    #[test]
    fn world_center_follows_transform() {
        let aabb = Aabb::from_min_max(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
        let transform = GlobalTransform::from(Transform::from_xyz(1.0, 1.0, 1.0).with_scale(Vec3::splat(2.0)));
        assert!(world_center(&aabb, &transform).abs_diff_eq(Vec3::new(3.0, 5.0, 7.0), 1e-5));
    }
}
