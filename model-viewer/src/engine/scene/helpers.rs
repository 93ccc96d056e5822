use bevy::prelude::*;
use constants::render_settings::{
    MARKER_FADE_DELAY_SECS, MARKER_FADE_RATE, ORBIT_MARKER_RADIUS, PIVOT_MARKER_RADIUS,
};

/// Visual aid that must not be hit by pointer rays or counted in scene bounds.
#[derive(Component, Debug, Default)]
pub struct SceneHelper;

/// Sphere shown where the orbit center was last retargeted.
#[derive(Component, Debug, Default)]
pub struct OrbitMarker {
    pub fade: MarkerFade,
}

/// Sphere shown at the current pivot point.
#[derive(Component, Debug, Default)]
pub struct PivotMarker;

/// Opacity timeline of a marker: fully opaque when shown, holds for a delay,
/// then fades linearly and hides at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerFade {
    opacity: f32,
    shown_for: f32,
    delay: f32,
    rate: f32,
}

impl Default for MarkerFade {
    fn default() -> Self {
        Self {
            opacity: 0.0,
            shown_for: 0.0,
            delay: MARKER_FADE_DELAY_SECS,
            rate: MARKER_FADE_RATE,
        }
    }
}

impl MarkerFade {
    pub fn show(&mut self) {
        self.opacity = 1.0;
        self.shown_for = 0.0;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Advance by `delta_secs`. Returns whether the opacity changed.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        if !self.is_visible() {
            return false;
        }
        self.shown_for += delta_secs;
        if self.shown_for <= self.delay {
            return false;
        }
        let fading_for = (self.shown_for - self.delay).min(delta_secs);
        self.opacity = (self.opacity - fading_for * self.rate).max(0.0);
        true
    }
}

pub fn spawn_scene_helpers(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(ORBIT_MARKER_RADIUS).mesh().uv(16, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.0, 0.0, 0.0),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
        OrbitMarker::default(),
        SceneHelper,
        Name::new("orbit_marker"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(PIVOT_MARKER_RADIUS).mesh().uv(16, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0),
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
        PivotMarker,
        SceneHelper,
        Name::new("pivot_marker"),
    ));
}

/// Move the orbit marker to `point` and restart its fade.
pub fn show_orbit_marker(
    point: Vec3,
    markers: &mut Query<(&mut Transform, &mut OrbitMarker)>,
) {
    for (mut transform, mut marker) in markers.iter_mut() {
        transform.translation = point;
        marker.fade.show();
    }
}

pub fn fade_orbit_marker(
    time: Res<Time>,
    mut markers: Query<(
        &mut OrbitMarker,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (mut marker, mut visibility, material) in &mut markers {
        let just_shown = marker.is_changed() && marker.fade.opacity() == 1.0;
        if !marker.fade.tick(time.delta_secs()) && !just_shown {
            continue;
        }

        let visible = marker.fade.is_visible();
        visibility.set_if_neq(if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        });
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(marker.fade.opacity());
        }
    }
}
