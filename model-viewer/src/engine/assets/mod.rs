//! Scene-level data derived from or loaded alongside the model.

/// World-space scene bounds accumulated from mesh AABBs.
pub mod bounds;

/// Runtime configuration asset with constant-backed defaults.
pub mod viewer_config;
