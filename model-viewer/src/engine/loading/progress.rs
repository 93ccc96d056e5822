use bevy::prelude::*;

/// Milestones of the loading pipeline, in order.
#[derive(Resource, Debug, Default)]
pub struct LoadingProgress {
    pub config_resolved: bool,
    pub model_spawned: bool,
    pub scene_ready: bool,
    pub model_failed: bool,
}
