use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::VIEWER_CONFIG_PATH;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::viewer_camera::{ActiveCamera, ViewerCamera, select_live_camera};
use crate::engine::loading::progress::LoadingProgress;
use crate::tools::control_manager::ControlManager;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ViewerConfig>>,
}

pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    config_loader.handle = Some(asset_server.load(VIEWER_CONFIG_PATH));
}

/// Settle the viewer config once the file has loaded or failed to, then
/// apply its initial camera type and control mode.
pub fn resolve_viewer_config(
    config_loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ViewerConfig>>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut control_manager: ResMut<ControlManager>,
    mut active: ResMut<ActiveCamera>,
    mut cameras: Query<(&mut Camera, &ViewerCamera)>,
    mut commands: Commands,
) {
    if loading_progress.config_resolved {
        return;
    }
    let Some(handle) = config_loader.handle.as_ref() else {
        return;
    };

    let config = match asset_server.load_state(handle) {
        LoadState::Loaded => configs.get(handle).cloned().unwrap_or_default(),
        LoadState::Failed(error) => {
            warn!("Viewer config unavailable, using defaults: {error}");
            ViewerConfig::default()
        }
        _ => return,
    }
    .sanitised();

    info!(
        "Viewer config resolved: model {}, {} camera, {} controls",
        config.model_path,
        config.camera_type.as_str(),
        config.control_mode.as_str()
    );

    control_manager.activate(config.control_mode);
    select_live_camera(config.camera_type, &mut active, &mut cameras);
    commands.insert_resource(config);
    loading_progress.config_resolved = true;
}
