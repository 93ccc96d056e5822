use bevy::ecs::system::SystemParam;
use bevy::input::mouse::MouseScrollUnit;
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;
use bevy::render::camera::CameraProjection;
use bevy::window::PrimaryWindow;
use constants::interaction::WHEEL_LINE_PIXELS;

use crate::engine::camera::viewer_camera::{ActiveCamera, ViewerCamera};
use crate::engine::scene::helpers::SceneHelper;

/// Nearest surface struck by a pointer ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// Window pixel coordinates (y down) to device coordinates in [-1, 1] (y up).
pub fn cursor_to_ndc(cursor: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        1.0 - cursor.y / viewport.y * 2.0,
    ))
}

/// Unproject a device coordinate into a world ray.
///
/// Bevy projections use reversed depth, so the near plane sits at NDC z = 1.
pub fn pointer_ray(ndc: Vec2, world_from_view: Mat4, clip_from_view: Mat4) -> Option<Ray3d> {
    let world_from_clip = world_from_view * clip_from_view.inverse();
    let near = world_from_clip.project_point3(ndc.extend(1.0));
    let far = world_from_clip.project_point3(ndc.extend(f32::EPSILON));
    if !near.is_finite() || !far.is_finite() {
        return None;
    }
    let direction = Dir3::new(far - near).ok()?;
    Some(Ray3d::new(near, direction))
}

/// Browser-style wheel delta in pixels: positive when scrolling down.
pub fn browser_wheel_delta(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => -y * WHEEL_LINE_PIXELS,
        MouseScrollUnit::Pixel => -y,
    }
}

/// Walk up from `entity` until the next parent is `root`. Returns `None`
/// when the chain never reaches `root`.
pub fn top_level_ancestor(
    entity: Entity,
    root: Entity,
    parent_of: impl Fn(Entity) -> Option<Entity>,
) -> Option<Entity> {
    let mut current = entity;
    loop {
        let parent = parent_of(current)?;
        if parent == root {
            return Some(current);
        }
        current = parent;
    }
}

/// Candidate whose center is closest to `origin`.
pub fn nearest_by_center(
    origin: Vec3,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<(Entity, Vec3)> {
    candidates.into_iter().min_by(|(_, a), (_, b)| {
        origin
            .distance_squared(*a)
            .total_cmp(&origin.distance_squared(*b))
    })
}

/// Cursor, live camera and mesh ray casting bundled for the pointer tools.
/// Visual helpers never block or receive hits.
#[derive(SystemParam)]
pub struct PointerRaycaster<'w, 's> {
    ray_cast: MeshRayCast<'w, 's>,
    helpers: Query<'w, 's, (), With<SceneHelper>>,
    active: Res<'w, ActiveCamera>,
    cameras: Query<
        'w,
        's,
        (&'static Camera, &'static Projection, &'static GlobalTransform),
        With<ViewerCamera>,
    >,
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
}

impl PointerRaycaster<'_, '_> {
    pub fn cursor(&self) -> Option<Vec2> {
        self.windows.single().ok()?.cursor_position()
    }

    /// Live camera viewport, or the whole window before the first render.
    pub fn viewport_size(&self) -> Option<Vec2> {
        let (camera, _, _) = self.cameras.get(self.active.entity()).ok()?;
        camera.logical_viewport_size().or_else(|| {
            let window = self.windows.single().ok()?;
            Some(Vec2::new(window.width(), window.height()))
        })
    }

    pub fn camera_transform(&self) -> Option<&GlobalTransform> {
        self.cameras
            .get(self.active.entity())
            .ok()
            .map(|(_, _, transform)| transform)
    }

    pub fn ray_at(&self, cursor: Vec2) -> Option<Ray3d> {
        let (_, projection, transform) = self.cameras.get(self.active.entity()).ok()?;
        let ndc = cursor_to_ndc(cursor, self.viewport_size()?)?;
        pointer_ray(ndc, transform.compute_matrix(), projection.get_clip_from_view())
    }

    /// Closest non-helper surface under `cursor`.
    pub fn hit_at(&mut self, cursor: Vec2) -> Option<PointerHit> {
        let ray = self.ray_at(cursor)?;
        self.hit_along(ray)
    }

    pub fn hit_along(&mut self, ray: Ray3d) -> Option<PointerHit> {
        let helpers = &self.helpers;
        let filter = |entity: Entity| !helpers.contains(entity);
        let settings = MeshRayCastSettings::default().with_filter(&filter);

        self.ray_cast
            .cast_ray(ray, &settings)
            .first()
            .map(|(entity, hit)| PointerHit {
                entity: *entity,
                point: hit.point,
                distance: hit.distance,
            })
    }
}

/// A window, a live camera and meshes that ray casts can hit without a renderer.
#[cfg(test)]
pub(crate) mod test_scene {
    use super::*;
    use crate::engine::camera::viewer_camera::CameraKind;
    use bevy::render::primitives::Aabb;
    use bevy::render::view::ViewVisibility;
    use bevy::window::WindowResolution;
    use std::f32::consts::FRAC_PI_2;

    /// 100 px square window; 90 degree perspective camera at z = 10 facing
    /// the origin, so a cursor offset of `n` px maps to `n / 50` units per
    /// unit of depth.
    pub fn pointer_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>();

        app.world_mut().spawn((
            Window {
                resolution: WindowResolution::new(100.0, 100.0),
                ..default()
            },
            PrimaryWindow,
        ));

        let transform = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
        let camera = app
            .world_mut()
            .spawn((
                Camera::default(),
                Projection::from(PerspectiveProjection {
                    fov: FRAC_PI_2,
                    aspect_ratio: 1.0,
                    ..default()
                }),
                transform,
                GlobalTransform::from(transform),
                ViewerCamera {
                    kind: CameraKind::Perspective,
                },
            ))
            .id();
        app.insert_resource(ActiveCamera::new(CameraKind::Perspective, camera, camera));
        app
    }

    pub fn set_cursor(app: &mut App, cursor: Option<Vec2>) {
        let world = app.world_mut();
        let mut windows = world.query_filtered::<&mut Window, With<PrimaryWindow>>();
        for mut window in windows.iter_mut(world) {
            window.set_cursor_position(cursor);
        }
    }

    /// Cube of edge `size` centered on `center`, already marked visible.
    pub fn spawn_cube(app: &mut App, center: Vec3, size: f32) -> Entity {
        let mesh = app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::from_length(size));
        let mut visibility = ViewVisibility::HIDDEN;
        visibility.set();
        let transform = Transform::from_translation(center);

        app.world_mut()
            .spawn((
                Mesh3d(mesh),
                transform,
                GlobalTransform::from(transform),
                Aabb::from_min_max(Vec3::splat(-size / 2.0), Vec3::splat(size / 2.0)),
                visibility,
            ))
            .id()
    }
}

#[cfg(test)]
mod tests {
    use super::test_scene::{pointer_app, set_cursor, spawn_cube};
    use super::*;
    use bevy::math::primitives::InfinitePlane3d;
    use bevy::render::camera::ScalingMode;
    use std::collections::HashMap;
    use std::f32::consts::FRAC_PI_2;

    #[derive(Resource, Default)]
    struct LastHit(Option<PointerHit>);

    fn record_hit(mut pointer: PointerRaycaster, mut last: ResMut<LastHit>) {
        last.0 = pointer.cursor().and_then(|cursor| pointer.hit_at(cursor));
    }

    fn hit_on_ground(ray: Ray3d) -> Vec3 {
        let distance = ray
            .intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Z))
            .expect("ray faces the plane");
        ray.get_point(distance)
    }

    #[test]
    fn ndc_maps_corners_and_center() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(cursor_to_ndc(Vec2::ZERO, viewport), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(cursor_to_ndc(viewport, viewport), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(cursor_to_ndc(viewport * 0.5, viewport), Some(Vec2::ZERO));
        assert_eq!(cursor_to_ndc(Vec2::ONE, Vec2::ZERO), None);
    }

    #[test]
    fn perspective_ray_matches_analytic_hit() {
        let projection = PerspectiveProjection {
            fov: FRAC_PI_2,
            aspect_ratio: 1.0,
            near: 0.1,
            ..default()
        };
        let camera = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);

        let ray = pointer_ray(
            Vec2::new(0.5, -0.25),
            camera.compute_matrix(),
            projection.get_clip_from_view(),
        )
        .expect("valid ray");

        // tan(45 deg) = 1, so NDC offsets scale directly with the 10 unit distance.
        assert!(hit_on_ground(ray).abs_diff_eq(Vec3::new(5.0, -2.5, 0.0), 1e-3));
    }

    #[test]
    fn orthographic_ray_is_parallel_to_view() {
        let mut projection = OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: 20.0,
                height: 10.0,
            },
            ..OrthographicProjection::default_3d()
        };
        projection.update(200.0, 100.0);
        let camera = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);

        let ray = pointer_ray(
            Vec2::new(0.5, 0.5),
            camera.compute_matrix(),
            projection.get_clip_from_view(),
        )
        .expect("valid ray");

        assert!(ray.direction.as_vec3().abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(hit_on_ground(ray).abs_diff_eq(Vec3::new(5.0, 2.5, 0.0), 1e-3));
    }

    #[test]
    fn wheel_lines_scale_to_pixels() {
        assert_eq!(browser_wheel_delta(MouseScrollUnit::Line, 1.0), -WHEEL_LINE_PIXELS);
        assert_eq!(browser_wheel_delta(MouseScrollUnit::Pixel, -40.0), 40.0);
    }

    #[test]
    fn ancestor_lookup_stops_below_root() {
        let mut world = World::new();
        let [root, model, node, leaf, stray] = [(); 5].map(|_| world.spawn_empty().id());
        let parents = HashMap::from([(model, root), (node, model), (leaf, node)]);
        let parent_of = |entity| parents.get(&entity).copied();

        assert_eq!(top_level_ancestor(leaf, root, parent_of), Some(model));
        assert_eq!(top_level_ancestor(model, root, parent_of), Some(model));
        assert_eq!(top_level_ancestor(stray, root, parent_of), None);
    }

    #[test]
    fn nearest_center_wins() {
        let mut world = World::new();
        let [a, b, c] = [(); 3].map(|_| world.spawn_empty().id());
        let candidates = [
            (a, Vec3::new(10.0, 0.0, 0.0)),
            (b, Vec3::new(0.0, 3.0, 0.0)),
            (c, Vec3::new(-4.0, 0.0, 0.0)),
        ];

        assert_eq!(nearest_by_center(Vec3::ZERO, candidates), Some(candidates[1]));
        assert_eq!(nearest_by_center(Vec3::ZERO, []), None);
    }

    #[test]
    fn helpers_are_transparent_to_the_pointer() {
        let mut app = pointer_app();
        app.init_resource::<LastHit>().add_systems(Update, record_hit);
        let model = spawn_cube(&mut app, Vec3::ZERO, 2.0);
        let marker = spawn_cube(&mut app, Vec3::new(0.0, 0.0, 5.0), 1.0);
        set_cursor(&mut app, Some(Vec2::new(55.0, 50.0)));

        app.update();
        let hit = app.world().resource::<LastHit>().0.expect("marker under cursor");
        assert_eq!(hit.entity, marker);

        app.world_mut().entity_mut(marker).insert(SceneHelper);
        app.update();
        let hit = app.world().resource::<LastHit>().0.expect("model under cursor");
        assert_eq!(hit.entity, model);
        // NDC x = 0.1 with a 45 degree half angle reaches x = 0.9 at the
        // front face, 9 units from the camera.
        assert!(hit.point.abs_diff_eq(Vec3::new(0.9, 0.0, 1.0), 1e-3));
    }

    #[test]
    fn empty_space_is_a_miss() {
        let mut app = pointer_app();
        app.init_resource::<LastHit>().add_systems(Update, record_hit);
        spawn_cube(&mut app, Vec3::ZERO, 2.0);
        set_cursor(&mut app, Some(Vec2::new(2.0, 2.0)));

        app.update();
        assert!(app.world().resource::<LastHit>().0.is_none());
    }
}
