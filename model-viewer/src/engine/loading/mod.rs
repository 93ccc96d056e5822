//! Loading pipeline from viewer config to a framed, running scene.
//!
//! The config is settled first (falling back to defaults), then the glTF
//! model and environment map load in parallel. The app enters `Running`
//! once the model instance has non-empty bounds and has been framed.

/// Viewer config asset loading and its initial camera and control selection.
pub mod config_loader;

/// Environment cubemaps shared by both cameras and released on exit.
pub mod environment;

/// glTF scene spawning, readiness tracking and the initial framing.
pub mod model_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
