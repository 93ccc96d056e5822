use bevy::prelude::*;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::viewer_camera::ViewerCamera;
use crate::engine::loading::progress::LoadingProgress;

/// Prefiltered cubemaps lighting the model. Both cameras share these handles,
/// so the images stay loaded for as long as this resource lives.
#[derive(Resource, Debug, Clone)]
pub struct EnvironmentMaps {
    pub diffuse: Handle<Image>,
    pub specular: Handle<Image>,
    pub intensity: f32,
}

impl EnvironmentMaps {
    pub fn light(&self) -> EnvironmentMapLight {
        EnvironmentMapLight {
            diffuse_map: self.diffuse.clone(),
            specular_map: self.specular.clone(),
            intensity: self.intensity,
            ..default()
        }
    }
}

pub fn load_environment_maps(
    loading_progress: Res<LoadingProgress>,
    config: Option<Res<ViewerConfig>>,
    maps: Option<Res<EnvironmentMaps>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
) {
    if maps.is_some() || !loading_progress.config_resolved {
        return;
    }
    let Some(config) = config else {
        return;
    };

    info!(
        "Loading environment map {} / {}",
        config.environment_diffuse_path, config.environment_specular_path
    );
    commands.insert_resource(EnvironmentMaps {
        diffuse: asset_server.load(config.environment_diffuse_path.clone()),
        specular: asset_server.load(config.environment_specular_path.clone()),
        intensity: config.environment_intensity,
    });
}

/// Give every viewer camera the environment light, whichever one is live.
pub fn attach_environment_lights(
    maps: Option<Res<EnvironmentMaps>>,
    cameras: Query<Entity, (With<ViewerCamera>, Without<EnvironmentMapLight>)>,
    mut commands: Commands,
) {
    let Some(maps) = maps else {
        return;
    };
    for camera in &cameras {
        commands.entity(camera).insert(maps.light());
    }
}

/// Drop the environment lights and the handles keeping the cubemaps alive.
pub fn release_environment_on_exit(
    mut exit_events: EventReader<AppExit>,
    cameras: Query<Entity, With<EnvironmentMapLight>>,
    mut commands: Commands,
) {
    if exit_events.read().last().is_none() {
        return;
    }
    for camera in &cameras {
        commands.entity(camera).remove::<EnvironmentMapLight>();
    }
    commands.remove_resource::<EnvironmentMaps>();
    info!("Environment map released");
}
