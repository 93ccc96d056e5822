use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::camera_control::{
    CameraControl, animate_camera_moves, start_camera_moves,
};
use crate::engine::camera::orbit::{
    CameraMotion, OrbitState, advance_orbit_convergence, update_camera_motion,
};
use crate::engine::camera::viewer_camera::{
    CameraKind, CameraTypeRequest, FrameSceneRequest, apply_camera_type_requests, frame_scene,
    spawn_viewer_cameras,
};
use crate::engine::core::app_state::{AppState, ViewerSet};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{ConfigLoader, resolve_viewer_config, start_loading};
use crate::engine::loading::environment::{
    attach_environment_lights, load_environment_maps, release_environment_on_exit,
};
use crate::engine::loading::model_loader::{
    ModelLoader, frame_when_ready, report_model_failure, spawn_model_when_configured,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::helpers::spawn_scene_helpers;
use crate::engine::scene::model::spawn_scene_root;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::control_manager::{
    ControlManager, ControlModeChanged, ControlModeEvent, handle_control_keyboard_shortcuts,
    handle_control_mode_events,
};
use crate::tools::interaction_gate::{InteractionGate, update_interaction_gate};
use crate::tools::orbit_click::OrbitClickPlugin;
use crate::tools::pivot_drag::PivotDragPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::FpsText;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ViewerConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerConfig>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .configure_sets(
            Update,
            (
                ViewerSet::Commands,
                ViewerSet::PointerInput,
                ViewerSet::CameraMotion,
                ViewerSet::Gate,
                ViewerSet::Feedback,
            )
                .chain(),
        );

    // Pointer controllers, one per control mode
    app.add_plugins(OrbitClickPlugin).add_plugins(PivotDragPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<ModelLoader>()
        .init_resource::<OrbitState>()
        .init_resource::<CameraMotion>()
        .init_resource::<CameraControl>()
        .init_resource::<ControlManager>()
        .init_resource::<InteractionGate>()
        .add_event::<CameraTypeRequest>()
        .add_event::<FrameSceneRequest>()
        .add_event::<ControlModeEvent>()
        .add_event::<ControlModeChanged>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                resolve_viewer_config,
                spawn_model_when_configured,
                load_environment_maps,
                report_model_failure,
                frame_when_ready,
            )
                .chain()
                .before(ViewerSet::Commands)
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(Update, attach_environment_lights)
        .add_systems(Last, release_environment_on_exit);

    // Requests apply in order: mode, camera type, then framing on the new camera.
    app.add_systems(
        Update,
        (
            handle_control_keyboard_shortcuts,
            handle_control_mode_events,
            apply_camera_type_requests,
            frame_scene,
        )
            .chain()
            .in_set(ViewerSet::Commands),
    )
    .add_systems(
        Update,
        (start_camera_moves, animate_camera_moves, advance_orbit_convergence)
            .chain()
            .in_set(ViewerSet::CameraMotion),
    )
    .add_systems(
        Update,
        (update_camera_motion, update_interaction_gate)
            .chain()
            .in_set(ViewerSet::Gate),
    )
    .add_systems(Update, fps_notification_system.in_set(ViewerSet::Feedback));

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system.in_set(ViewerSet::Feedback));
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

// Startup system that only handles basic initialisation
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_lighting(&mut commands);
    spawn_scene_root(&mut commands);
    spawn_viewer_cameras(&mut commands, CameraKind::default());
    spawn_scene_helpers(&mut commands, &mut meshes, &mut materials);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
