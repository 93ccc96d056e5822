use bevy::prelude::*;
use bevy::window::PresentMode;
#[cfg(target_arch = "wasm32")]
use constants::path::CANVAS_SELECTOR;

use crate::error::ViewerError;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Model Viewer".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

/// Fail fast when the host page lacks the canvas the renderer mounts into.
#[cfg(target_arch = "wasm32")]
pub fn ensure_mount_point() -> Result<(), ViewerError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(ViewerError::WindowUnavailable)?;

    match document.query_selector(CANVAS_SELECTOR) {
        Ok(Some(_)) => Ok(()),
        _ => Err(ViewerError::MountPointMissing(CANVAS_SELECTOR.to_string())),
    }
}

/// Native builds open their own window.
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_mount_point() -> Result<(), ViewerError> {
    Ok(())
}
