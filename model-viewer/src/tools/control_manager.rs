use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ViewerError;

/// Pointer control schemes; exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Orbit,
    Pivot,
}

impl ControlMode {
    /// Identifier used by the frontend selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orbit => "orbit",
            Self::Pivot => "pivot",
        }
    }
}

impl FromStr for ControlMode {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "orbit" => Ok(Self::Orbit),
            "pivot" => Ok(Self::Pivot),
            _ => Err(ViewerError::UnknownControlMode(s.to_string())),
        }
    }
}

/// Resource tracking the active control mode.
#[derive(Resource, Debug, Default)]
pub struct ControlManager {
    active: ControlMode,
}

impl ControlManager {
    pub fn new(active: ControlMode) -> Self {
        Self { active }
    }

    /// Activate `mode`. Returns whether anything changed.
    pub fn activate(&mut self, mode: ControlMode) -> bool {
        if self.active == mode {
            return false;
        }
        self.active = mode;
        info!("Control manager activated: {}", mode.as_str());
        true
    }

    pub fn active(&self) -> ControlMode {
        self.active
    }

    pub fn is_active(&self, mode: ControlMode) -> bool {
        self.active == mode
    }
}

/// Run condition: `mode` is the active control mode.
pub fn control_mode_is(mode: ControlMode) -> impl FnMut(Res<ControlManager>) -> bool + Clone {
    move |control_manager: Res<ControlManager>| control_manager.is_active(mode)
}

/// Where a command came from, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Rpc,
    Keyboard,
}

/// Fired when the control mode should change via RPC or keyboard.
#[derive(Event, Debug, Clone, Copy)]
pub struct ControlModeEvent {
    pub mode: ControlMode,
    pub source: InputSource,
}

/// Fired after the active mode actually changed, so each controller can
/// drop its in-progress state.
#[derive(Event, Debug, Clone, Copy)]
pub struct ControlModeChanged {
    pub mode: ControlMode,
}

pub fn handle_control_mode_events(
    mut events: EventReader<ControlModeEvent>,
    mut control_manager: ResMut<ControlManager>,
    mut changed: EventWriter<ControlModeChanged>,
    mut rpc_interface: ResMut<crate::rpc::web_rpc::WebRpcInterface>,
) {
    for event in events.read() {
        if !control_manager.activate(event.mode) {
            continue;
        }

        info!(
            "{} controls activated via {:?}",
            event.mode.as_str(),
            event.source
        );
        changed.write(ControlModeChanged { mode: event.mode });
        rpc_interface.send_notification(
            "control_mode_changed",
            serde_json::json!({ "mode": event.mode.as_str() }),
        );
    }
}

/// Keyboard shortcuts for modes, camera type and views (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_control_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    active_camera: Res<crate::engine::camera::viewer_camera::ActiveCamera>,
    mut mode_events: EventWriter<ControlModeEvent>,
    mut camera_events: EventWriter<crate::engine::camera::viewer_camera::CameraTypeRequest>,
    mut frame_events: EventWriter<crate::engine::camera::viewer_camera::FrameSceneRequest>,
) {
    use crate::engine::camera::framing::ViewPreset;
    use crate::engine::camera::viewer_camera::{CameraTypeRequest, FrameSceneRequest};

    if keyboard.just_pressed(KeyCode::KeyO) {
        mode_events.write(ControlModeEvent {
            mode: ControlMode::Orbit,
            source: InputSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyP) {
        mode_events.write(ControlModeEvent {
            mode: ControlMode::Pivot,
            source: InputSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyC) {
        camera_events.write(CameraTypeRequest {
            kind: active_camera.kind.toggled(),
            source: InputSource::Keyboard,
        });
    }

    let view_keys = [
        (KeyCode::Digit1, ViewPreset::Front),
        (KeyCode::Digit2, ViewPreset::Back),
        (KeyCode::Digit3, ViewPreset::Left),
        (KeyCode::Digit4, ViewPreset::Right),
        (KeyCode::Digit5, ViewPreset::Top),
        (KeyCode::Digit6, ViewPreset::Bottom),
        (KeyCode::Digit0, ViewPreset::Diagonal),
    ];
    for (key, view) in view_keys {
        if keyboard.just_pressed(key) {
            frame_events.write(FrameSceneRequest { view });
        }
    }
}

/// Placeholder system for WASM builds where the host page drives everything over RPC.
#[cfg(target_arch = "wasm32")]
pub fn handle_control_keyboard_shortcuts() {}
