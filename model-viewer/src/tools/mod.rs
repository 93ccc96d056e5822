//! Pointer-driven camera and object controls.
//!
//! Two control schemes share the pointer, and exactly one is active at a time:
//!
//! - **Orbit** (`O` key or `set_control_mode` RPC with `"orbit"`): drag to
//!   orbit, right drag to pan, wheel to dolly. Clicking retargets the orbit
//!   center on the surface under the cursor, double clicking also pulls the
//!   camera in. Input is suspended while the camera is animating.
//! - **Pivot** (`P` key or `"pivot"`): drag rotates the grabbed object about
//!   the pressed surface point, the wheel zooms towards that point.
//!
//! ## Control Mode Flow
//!
//! ```text
//! Keyboard/RPC Input
//!   └─> ControlModeEvent
//!       └─> handle_control_mode_events()
//!           ├─> ControlManager::activate()
//!           ├─> ControlModeChanged (controllers drop in-progress state)
//!           └─> control_mode_changed notification
//! ```

/// Active control mode, mode events and keyboard shortcuts.
pub mod control_manager;

/// Listening/suspended toggle for orbit input while the camera animates.
pub mod interaction_gate;

/// Orbit controls with debounced click and double click retargeting.
pub mod orbit_click;

/// Grab-and-rotate about a surface pivot, with wheel zoom to the pivot.
pub mod pivot_drag;

/// Cursor to ray conversion and helper-aware mesh ray casts.
pub mod pointer;
