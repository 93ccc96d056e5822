use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Per-frame ordering of viewer systems in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// RPC, keyboard, mode, camera and view requests.
    Commands,
    PointerInput,
    /// Tweens and convergences writing the camera transform.
    CameraMotion,
    /// Motion state and the interaction gate.
    Gate,
    /// Markers and other visual feedback.
    Feedback,
}

#[derive(Component)]
pub struct FpsText;
