//! Shared tunables for the model viewer.

/// Camera placement, projection, and framing defaults.
pub mod camera;

/// Pointer interaction rates, tolerances, and distance limits.
pub mod interaction;

/// Asset and mount point locations.
pub mod path;

/// Visual helper sizes and fade timings.
pub mod render_settings;
