//! Camera ownership, framing and animation.
//!
//! Two cameras (perspective and orthographic) exist for the whole run and
//! exactly one is live. Framing places the live camera around the scene
//! bounds; convergences and tweens animate it afterwards.

/// Timed eased camera moves requested from outside the camera's owner.
pub mod camera_control;

/// Scene framing for preset views and both projection kinds.
pub mod framing;

/// Orbit center and per-frame convergence towards clicked targets.
pub mod orbit;

/// Camera entities, the live camera resource and camera type switching.
pub mod viewer_camera;
