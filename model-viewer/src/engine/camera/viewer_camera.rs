use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::render::primitives::Aabb;
use constants::camera::{
    INITIAL_CAMERA_POSITION, ORTHOGRAPHIC_FAR, ORTHOGRAPHIC_INITIAL_HEIGHT, ORTHOGRAPHIC_NEAR,
    PERSPECTIVE_FAR, PERSPECTIVE_FOV_DEGREES, PERSPECTIVE_NEAR,
};
use constants::camera::FIT_MARGIN;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::camera_control::{CameraControl, CameraTween};
use crate::engine::camera::framing::{ViewPreset, frame_camera};
use crate::engine::camera::orbit::OrbitState;
use crate::engine::scene::helpers::SceneHelper;
use crate::engine::scene::model::scene_bounds;
use crate::error::ViewerError;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::control_manager::InputSource;

/// Projection type of a viewer camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraKind {
    #[default]
    Perspective,
    Orthographic,
}

impl CameraKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perspective => "perspective",
            Self::Orthographic => "orthographic",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Perspective => Self::Orthographic,
            Self::Orthographic => Self::Perspective,
        }
    }
}

impl FromStr for CameraKind {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "perspective" => Ok(Self::Perspective),
            "orthographic" => Ok(Self::Orthographic),
            _ => Err(ViewerError::UnknownCameraType(s.to_string())),
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ViewerCamera {
    pub kind: CameraKind,
}

/// The single live camera. Both camera entities exist for the whole run;
/// exactly the one matching `kind` has `Camera::is_active` set.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ActiveCamera {
    pub kind: CameraKind,
    perspective: Entity,
    orthographic: Entity,
}

impl ActiveCamera {
    pub fn new(kind: CameraKind, perspective: Entity, orthographic: Entity) -> Self {
        Self {
            kind,
            perspective,
            orthographic,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity_for(self.kind)
    }

    pub fn entity_for(&self, kind: CameraKind) -> Entity {
        match kind {
            CameraKind::Perspective => self.perspective,
            CameraKind::Orthographic => self.orthographic,
        }
    }
}

/// Request to make `kind` the live camera.
#[derive(Event, Debug, Clone, Copy)]
pub struct CameraTypeRequest {
    pub kind: CameraKind,
    pub source: InputSource,
}

/// Request to re-frame the scene from a preset view with the live camera.
#[derive(Event, Debug, Clone, Copy)]
pub struct FrameSceneRequest {
    pub view: ViewPreset,
}

/// Spawn the perspective and orthographic cameras and record which is live.
pub fn spawn_viewer_cameras(commands: &mut Commands, kind: CameraKind) -> ActiveCamera {
    let start = Transform::from_translation(INITIAL_CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y);

    let perspective = commands
        .spawn((
            Camera3d::default(),
            Camera {
                is_active: kind == CameraKind::Perspective,
                ..default()
            },
            Projection::from(PerspectiveProjection {
                fov: PERSPECTIVE_FOV_DEGREES.to_radians(),
                near: PERSPECTIVE_NEAR,
                far: PERSPECTIVE_FAR,
                ..default()
            }),
            start,
            ViewerCamera {
                kind: CameraKind::Perspective,
            },
            Name::new("perspective_camera"),
        ))
        .id();

    let orthographic = commands
        .spawn((
            Camera3d::default(),
            Camera {
                is_active: kind == CameraKind::Orthographic,
                ..default()
            },
            Projection::from(OrthographicProjection {
                near: ORTHOGRAPHIC_NEAR,
                far: ORTHOGRAPHIC_FAR,
                scaling_mode: ScalingMode::FixedVertical {
                    viewport_height: ORTHOGRAPHIC_INITIAL_HEIGHT,
                },
                ..OrthographicProjection::default_3d()
            }),
            start,
            ViewerCamera {
                kind: CameraKind::Orthographic,
            },
            Name::new("orthographic_camera"),
        ))
        .id();

    let active = ActiveCamera::new(kind, perspective, orthographic);
    commands.insert_resource(active);
    active
}

/// Mark `kind` as the live camera and deactivate the other one.
pub fn select_live_camera(
    kind: CameraKind,
    active: &mut ActiveCamera,
    cameras: &mut Query<(&mut Camera, &ViewerCamera)>,
) {
    active.kind = kind;
    for (mut camera, viewer) in cameras.iter_mut() {
        camera.is_active = viewer.kind == kind;
    }
}

/// Switch the live camera. The newly live camera keeps nothing from the old
/// one: convergences are dropped and the scene is re-framed from scratch.
pub fn apply_camera_type_requests(
    mut events: EventReader<CameraTypeRequest>,
    mut active: ResMut<ActiveCamera>,
    mut cameras: Query<(&mut Camera, &ViewerCamera)>,
    mut orbit: ResMut<OrbitState>,
    mut control: ResMut<CameraControl>,
    mut frame_requests: EventWriter<FrameSceneRequest>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
) {
    for event in events.read() {
        if active.kind == event.kind {
            continue;
        }
        select_live_camera(event.kind, &mut active, &mut cameras);
        for kind in [CameraKind::Perspective, CameraKind::Orthographic] {
            commands.entity(active.entity_for(kind)).remove::<CameraTween>();
        }

        orbit.cancel();
        // Only hand over a registration that exists; the first one is made
        // once the scene is ready.
        if control.owner().is_some() {
            control.register(active.entity());
        }
        frame_requests.write(FrameSceneRequest {
            view: ViewPreset::Diagonal,
        });

        info!(
            "Camera switched to {} via {:?}",
            event.kind.as_str(),
            event.source
        );
        rpc_interface.send_notification(
            "camera_type_changed",
            serde_json::json!({ "camera_type": event.kind.as_str() }),
        );
    }
}

/// Place the live camera so the whole scene is visible from the requested view.
/// Only the last request of a frame is honoured.
pub fn frame_scene(
    mut requests: EventReader<FrameSceneRequest>,
    active: Res<ActiveCamera>,
    config: Option<Res<ViewerConfig>>,
    meshes: Query<(&Aabb, &GlobalTransform), (With<Mesh3d>, Without<SceneHelper>)>,
    mut cameras: Query<(&mut Transform, &mut Projection), With<ViewerCamera>>,
    mut orbit: ResMut<OrbitState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: Commands,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    let bounds = scene_bounds(meshes.iter());
    if bounds.is_empty() {
        warn!("Nothing to frame for the {} view", request.view.as_str());
        return;
    }

    let Ok((mut transform, mut projection)) = cameras.get_mut(active.entity()) else {
        return;
    };
    let fit_margin = config.map_or(FIT_MARGIN, |config| config.fit_margin);
    let Some(framed) = frame_camera(&mut projection, &bounds, request.view, fit_margin) else {
        return;
    };

    *transform = framed;
    orbit.reset(bounds.center());
    commands.entity(active.entity()).remove::<CameraTween>();

    info!(
        "Framed {} view with {} camera at {:?}",
        request.view.as_str(),
        active.kind.as_str(),
        framed.translation
    );
    rpc_interface.send_notification(
        "view_changed",
        serde_json::json!({
            "view": request.view.as_str(),
            "camera_type": active.kind.as_str(),
            "center": bounds.center().to_array(),
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::camera_control::CameraMove;

    fn camera_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<OrbitState>()
            .init_resource::<CameraControl>()
            .init_resource::<WebRpcInterface>()
            .add_event::<CameraTypeRequest>()
            .add_event::<FrameSceneRequest>()
            .add_systems(Update, apply_camera_type_requests);

        let perspective = app
            .world_mut()
            .spawn((
                Camera::default(),
                ViewerCamera {
                    kind: CameraKind::Perspective,
                },
            ))
            .id();
        let orthographic = app
            .world_mut()
            .spawn((
                Camera {
                    is_active: false,
                    ..default()
                },
                ViewerCamera {
                    kind: CameraKind::Orthographic,
                },
            ))
            .id();
        app.insert_resource(ActiveCamera::new(
            CameraKind::Perspective,
            perspective,
            orthographic,
        ));
        app
    }

    /// Live perspective camera mid-tween, a pending orbit target, and one
    /// model mesh (plus a far-off helper) when `with_model` is set.
    fn framing_app(with_model: bool) -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<WebRpcInterface>()
            .add_event::<FrameSceneRequest>()
            .add_systems(Update, frame_scene);

        let start = Transform::from_xyz(1.0, 2.0, 3.0);
        let tween = CameraTween::new(
            &start,
            CameraMove {
                position: Vec3::splat(50.0),
                up: Vec3::Y,
                duration: std::time::Duration::from_secs(5),
                look_at: None,
            },
        );
        let camera = app
            .world_mut()
            .spawn((
                start,
                Projection::from(PerspectiveProjection::default()),
                ViewerCamera {
                    kind: CameraKind::Perspective,
                },
                tween,
            ))
            .id();
        app.insert_resource(ActiveCamera::new(CameraKind::Perspective, camera, camera));

        let mut orbit = OrbitState::default();
        orbit.set_orbit_target(Vec3::splat(-7.0));
        orbit.set_camera_target(Vec3::splat(9.0));
        app.insert_resource(orbit);

        if with_model {
            app.world_mut().spawn((
                Mesh3d::default(),
                Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0)),
                GlobalTransform::from_xyz(4.0, 0.0, 0.0),
            ));
            app.world_mut().spawn((
                Mesh3d::default(),
                Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0)),
                GlobalTransform::from_xyz(-500.0, 0.0, 0.0),
                SceneHelper,
            ));
        }

        app.world_mut().send_event(FrameSceneRequest {
            view: ViewPreset::Front,
        });
        (app, camera)
    }

    fn live_cameras(app: &mut App) -> Vec<CameraKind> {
        let world = app.world_mut();
        let mut query = world.query::<(&Camera, &ViewerCamera)>();
        query
            .iter(world)
            .filter(|(camera, _)| camera.is_active)
            .map(|(_, viewer)| viewer.kind)
            .collect()
    }

    #[test]
    fn camera_kind_parses_selector_values() {
        assert_eq!("Perspective".parse::<CameraKind>().ok(), Some(CameraKind::Perspective));
        assert_eq!(" orthographic".parse::<CameraKind>().ok(), Some(CameraKind::Orthographic));
        assert!(matches!(
            "fisheye".parse::<CameraKind>(),
            Err(ViewerError::UnknownCameraType(name)) if name == "fisheye"
        ));
    }

    #[test]
    fn switching_always_leaves_exactly_one_live_camera() {
        let mut app = camera_app();

        for kind in [
            CameraKind::Orthographic,
            CameraKind::Orthographic,
            CameraKind::Perspective,
            CameraKind::Orthographic,
        ] {
            app.world_mut().send_event(CameraTypeRequest {
                kind,
                source: InputSource::Rpc,
            });
            app.update();

            assert_eq!(live_cameras(&mut app), vec![kind]);
            let active = *app.world().resource::<ActiveCamera>();
            assert_eq!(active.kind, kind);
            assert_eq!(active.entity(), active.entity_for(kind));
        }
    }

    #[test]
    fn switching_moves_an_existing_registration_and_reframes() {
        let mut app = camera_app();
        let active = *app.world().resource::<ActiveCamera>();
        app.world_mut()
            .resource_mut::<CameraControl>()
            .register(active.entity());
        app.world_mut().resource_mut::<OrbitState>().set_orbit_target(Vec3::X);

        app.world_mut().send_event(CameraTypeRequest {
            kind: CameraKind::Orthographic,
            source: InputSource::Keyboard,
        });
        app.update();

        assert_eq!(
            app.world().resource::<CameraControl>().owner(),
            Some(active.entity_for(CameraKind::Orthographic))
        );
        assert!(!app.world().resource::<OrbitState>().is_converging());
        let frame_requests = app.world().resource::<Events<FrameSceneRequest>>();
        assert_eq!(frame_requests.len(), 1);
    }

    #[test]
    fn framing_recenters_and_stops_all_motion() {
        let (mut app, camera) = framing_app(true);
        app.update();

        let orbit = app.world().resource::<OrbitState>();
        assert_eq!(orbit.center, Vec3::new(4.0, 0.0, 0.0));
        assert!(!orbit.is_converging());
        assert!(app.world().get::<CameraTween>(camera).is_none());

        let transform = app.world().get::<Transform>(camera).expect("camera");
        assert_ne!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert!(
            transform
                .forward()
                .as_vec3()
                .abs_diff_eq((Vec3::new(4.0, 0.0, 0.0) - transform.translation).normalize(), 1e-4)
        );
        let notifications: Vec<&str> = app
            .world()
            .resource::<WebRpcInterface>()
            .pending_notifications()
            .collect();
        assert_eq!(notifications, vec!["view_changed"]);
    }

    #[test]
    fn framing_an_empty_scene_is_a_no_op() {
        let (mut app, camera) = framing_app(false);
        app.update();

        let orbit = app.world().resource::<OrbitState>();
        assert_eq!(orbit.center, Vec3::ZERO);
        assert_eq!(orbit.orbit_target(), Some(Vec3::splat(-7.0)));
        assert!(app.world().get::<CameraTween>(camera).is_some());
        assert_eq!(
            app.world().get::<Transform>(camera).expect("camera").translation,
            Vec3::new(1.0, 2.0, 3.0)
        );
    }
}
