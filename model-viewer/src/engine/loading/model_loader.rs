use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::scene::SceneInstanceReady;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::camera_control::CameraControl;
use crate::engine::camera::framing::ViewPreset;
use crate::engine::camera::viewer_camera::{ActiveCamera, FrameSceneRequest};
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::helpers::SceneHelper;
use crate::engine::scene::model::{ViewerSceneRoot, scene_bounds};
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Resource, Default)]
pub struct ModelLoader {
    scene: Option<Handle<Scene>>,
}

/// Spawn the configured glTF scene under the viewer scene root once the
/// config has been settled.
pub fn spawn_model_when_configured(
    mut loading_progress: ResMut<LoadingProgress>,
    mut model_loader: ResMut<ModelLoader>,
    config: Option<Res<ViewerConfig>>,
    roots: Query<Entity, With<ViewerSceneRoot>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
) {
    if loading_progress.model_spawned || !loading_progress.config_resolved {
        return;
    }
    let (Some(config), Ok(root)) = (config, roots.single()) else {
        return;
    };

    info!("Loading model {}", config.model_path);
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(config.model_path.clone()));
    model_loader.scene = Some(scene.clone());

    commands
        .spawn((
            SceneRoot(scene),
            Name::new("loaded_model"),
            ChildOf(root),
        ))
        .observe(on_model_ready);

    loading_progress.model_spawned = true;
}

fn on_model_ready(_trigger: Trigger<SceneInstanceReady>, mut loading_progress: ResMut<LoadingProgress>) {
    info!("Model scene instance ready");
    loading_progress.scene_ready = true;
}

/// The model stays missing on failure; the viewer keeps running its empty scene
/// loop in `Loading` and reports the error once.
pub fn report_model_failure(
    model_loader: Res<ModelLoader>,
    asset_server: Res<AssetServer>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    if loading_progress.model_failed || loading_progress.scene_ready {
        return;
    }
    let Some(scene) = model_loader.scene.as_ref() else {
        return;
    };
    if let Some(LoadState::Failed(error)) = asset_server.get_load_state(scene) {
        error!("Model failed to load: {error}");
        loading_progress.model_failed = true;
    }
}

/// Frame the first time the instanced meshes report non-empty bounds, then
/// hand the live camera to the updater and start interaction.
pub fn frame_when_ready(
    loading_progress: Res<LoadingProgress>,
    meshes: Query<(&Aabb, &GlobalTransform), (With<Mesh3d>, Without<SceneHelper>)>,
    active: Res<ActiveCamera>,
    config: Option<Res<ViewerConfig>>,
    mut camera_control: ResMut<CameraControl>,
    mut frame_requests: EventWriter<FrameSceneRequest>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if !loading_progress.scene_ready {
        return;
    }
    // Aabbs are computed in PostUpdate, so the first ready frame may see none.
    let bounds = scene_bounds(meshes.iter());
    if bounds.is_empty() {
        return;
    }

    frame_requests.write(FrameSceneRequest {
        view: ViewPreset::Diagonal,
    });
    camera_control.register(active.entity());

    info!("→ Model ready, transitioning to Running state");
    rpc_interface.send_notification(
        "model_loaded",
        serde_json::json!({
            "model_path": config.map(|config| config.model_path.clone()),
            "bounds": {
                "min": bounds.min.to_array(),
                "max": bounds.max.to_array(),
            },
        }),
    );
    next_state.set(AppState::Running);
}
