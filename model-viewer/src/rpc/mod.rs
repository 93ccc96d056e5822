//! JSON-RPC 2.0 bridge between the viewer and its host page.
//!
//! The web build runs inside an iframe; the host page drives the selector
//! controls (view, camera type, control mode) over `postMessage` and listens
//! for state changes. Native builds keep the same systems but never receive
//! or post anything.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Viewer (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Dispatch to events/resources
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! Requests without an ID are executed but never answered. Everything queued
//! during a frame is posted in `Last`, notifications before responses.
//!
//! ## Methods
//!
//! ```typescript
//! iframe.contentWindow.postMessage(JSON.stringify({
//!   jsonrpc: "2.0",
//!   method: "update_camera",
//!   params: { position: [10, 5, 10], up: [0, 1, 0], duration: 800, look_at: [0, 0, 0] },
//!   id: 1
//! }), "*");
//! ```
//!
//! - `set_view {view}`: frame the scene from `front`, `back`, `left`,
//!   `right`, `top`, `bottom` (anything else frames the diagonal view)
//! - `set_camera_type {camera_type}`: `perspective` or `orthographic`
//! - `set_control_mode {mode}`: `orbit` or `pivot`
//! - `update_camera {position, up, duration?, look_at?}`: eased move of the
//!   registered camera, answers `{success}`; false until the model is framed
//! - `get_camera_state`, `get_scene_bounds`, `get_fps`
//!
//! ## Notifications
//!
//! - `model_loaded {model_path, bounds}`
//! - `view_changed {view, camera_type, center}`
//! - `camera_type_changed {camera_type}`
//! - `control_mode_changed {mode}`
//! - `interaction_state_changed {state}`: `listening` or `suspended`
//! - `fps_update {fps}`: every half second
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32700`: Parse error
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// JSON-RPC 2.0 request handling, notification queueing and the WASM message listener.
pub mod web_rpc;
