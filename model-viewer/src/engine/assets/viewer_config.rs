use bevy::prelude::*;
use constants::camera::FIT_MARGIN;
use constants::interaction::{CLICK_GRACE_MS, PIVOT_MAX_DISTANCE, PIVOT_MIN_DISTANCE};
use constants::path::{
    DEFAULT_ENVIRONMENT_DIFFUSE_PATH, DEFAULT_ENVIRONMENT_SPECULAR_PATH, DEFAULT_MODEL_PATH,
};
use constants::render_settings::ENVIRONMENT_INTENSITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::camera::viewer_camera::CameraKind;
use crate::tools::control_manager::ControlMode;

/// Runtime viewer settings loaded from `viewer_config.json`.
/// Every field is optional in the file and falls back to the shared constants.
#[derive(Resource, Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub model_path: String,
    pub environment_diffuse_path: String,
    pub environment_specular_path: String,
    pub environment_intensity: f32,
    pub camera_type: CameraKind,
    pub control_mode: ControlMode,
    pub fit_margin: f32,
    pub min_zoom_distance: f32,
    pub max_zoom_distance: f32,
    pub click_grace_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            environment_diffuse_path: DEFAULT_ENVIRONMENT_DIFFUSE_PATH.to_string(),
            environment_specular_path: DEFAULT_ENVIRONMENT_SPECULAR_PATH.to_string(),
            environment_intensity: ENVIRONMENT_INTENSITY,
            camera_type: CameraKind::Perspective,
            control_mode: ControlMode::Orbit,
            fit_margin: FIT_MARGIN,
            min_zoom_distance: PIVOT_MIN_DISTANCE,
            max_zoom_distance: PIVOT_MAX_DISTANCE,
            click_grace_ms: CLICK_GRACE_MS,
        }
    }
}

impl ViewerConfig {
    pub fn click_grace(&self) -> Duration {
        Duration::from_millis(self.click_grace_ms)
    }

    /// Swap inverted zoom limits and keep the margin positive so a hand-edited
    /// file cannot break framing or clamping.
    pub fn sanitised(mut self) -> Self {
        if self.min_zoom_distance > self.max_zoom_distance {
            std::mem::swap(&mut self.min_zoom_distance, &mut self.max_zoom_distance);
        }
        self.min_zoom_distance = self.min_zoom_distance.max(0.0);
        if !(self.fit_margin > 0.0) {
            warn!("Ignoring non-positive fit margin {}", self.fit_margin);
            self.fit_margin = FIT_MARGIN;
        }
        self
    }
}
