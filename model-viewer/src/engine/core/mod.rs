//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, per-frame system
//! ordering and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the loading pipeline, camera systems, pointer
/// controllers and the RPC bridge wired into their frame phases.
pub mod app_setup;

/// Application states and the system sets ordering a frame.
pub mod app_state;

/// Platform-specific window configuration and mount point checks.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
