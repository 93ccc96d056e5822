use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use constants::camera::DEFAULT_CAMERA_MOVE_MS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::camera::camera_control::{CameraControl, CameraMove};
use crate::engine::camera::framing::ViewPreset;
use crate::engine::camera::orbit::OrbitState;
use crate::engine::camera::viewer_camera::{
    ActiveCamera, CameraKind, CameraTypeRequest, FrameSceneRequest, ViewerCamera,
};
use crate::engine::scene::helpers::SceneHelper;
use crate::engine::scene::model::scene_bounds;
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::tools::control_manager::{
    ControlManager, ControlMode, ControlModeEvent, InputSource, handle_control_mode_events,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing traffic towards the host page. Everything queued in a frame is
/// posted at the end of that frame, notifications before responses.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Methods of the notifications queued this frame, oldest first.
    pub fn pending_notifications(&self) -> impl Iterator<Item = &str> {
        self.outgoing_notifications
            .iter()
            .map(|notification| notification.method.as_str())
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage bridge for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(crate::engine::core::app_state::ViewerSet::Commands)
                    // Requests written here are applied by the mode, camera and framing systems this frame.
                    .before(handle_control_mode_events),
            )
            .add_systems(Last, send_outgoing_messages);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

/// Keeps the `message` listener attached for as long as it lives and detaches
/// it when dropped.
#[cfg(target_arch = "wasm32")]
struct MessageSubscription {
    closure: Closure<dyn FnMut(MessageEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for MessageSubscription {
    fn drop(&mut self) {
        if let Some(window) = window() {
            let _ = window
                .remove_event_listener_with_callback("message", self.closure.as_ref().unchecked_ref());
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(world: &mut World) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, RPC bridge disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    world.insert_non_send_resource(MessageSubscription { closure });
    world.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw JSON-RPC text received from the host page.
#[derive(Event)]
pub(crate) struct IncomingRpcMessage {
    pub(crate) content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Everything RPC methods read or command.
#[derive(SystemParam)]
struct RpcContext<'w, 's> {
    diagnostics: Res<'w, DiagnosticsStore>,
    active: Res<'w, ActiveCamera>,
    orbit: Res<'w, OrbitState>,
    control_manager: Res<'w, ControlManager>,
    camera_control: ResMut<'w, CameraControl>,
    cameras: Query<'w, 's, (&'static Transform, &'static Projection), With<ViewerCamera>>,
    meshes: Query<
        'w,
        's,
        (&'static Aabb, &'static GlobalTransform),
        (With<Mesh3d>, Without<SceneHelper>),
    >,
    frame_requests: EventWriter<'w, FrameSceneRequest>,
    camera_requests: EventWriter<'w, CameraTypeRequest>,
    mode_events: EventWriter<'w, ControlModeEvent>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut context: RpcContext,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.queue_response(create_error_response(
                    serde_json::Value::Null,
                    -32700,
                    "Parse error",
                    None,
                ));
            }
        }
    }
}

/// Run one request. Requests without an id are executed but not answered.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "set_view" => handle_set_view(&request.params, context),
        "set_camera_type" => handle_set_camera_type(&request.params, context),
        "set_control_mode" => handle_set_control_mode(&request.params, context),
        "update_camera" => handle_update_camera(&request.params, context),
        "get_camera_state" => handle_get_camera_state(context),
        "get_scene_bounds" => handle_get_scene_bounds(context),
        "get_fps" => handle_get_fps(&context.diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_set_view(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SetViewParams {
        view: String,
    }

    let view_params = serde_json::from_value::<SetViewParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'view' parameter"))?;

    let view = ViewPreset::from_name(&view_params.view);
    context.frame_requests.write(FrameSceneRequest { view });

    Ok(serde_json::json!({
        "success": true,
        "view": view.as_str()
    }))
}

fn handle_set_camera_type(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SetCameraTypeParams {
        camera_type: String,
    }

    let camera_params = serde_json::from_value::<SetCameraTypeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'camera_type' parameter"))?;
    let kind = camera_params
        .camera_type
        .parse::<CameraKind>()
        .map_err(|error| RpcError::invalid_params(&error.to_string()))?;

    context.camera_requests.write(CameraTypeRequest {
        kind,
        source: InputSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "camera_type": kind.as_str()
    }))
}

fn handle_set_control_mode(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SetControlModeParams {
        mode: String,
    }

    let mode_params = serde_json::from_value::<SetControlModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;
    let mode = mode_params
        .mode
        .parse::<ControlMode>()
        .map_err(|error| RpcError::invalid_params(&error.to_string()))?;

    context.mode_events.write(ControlModeEvent {
        mode,
        source: InputSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "mode": mode.as_str()
    }))
}

/// Ask the registered camera to glide to a new pose. `success` is false while
/// no camera is registered (before the model has been framed).
fn handle_update_camera(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct UpdateCameraParams {
        position: [f32; 3],
        up: [f32; 3],
        duration: Option<u64>,
        look_at: Option<[f32; 3]>,
    }

    let camera_params = serde_json::from_value::<UpdateCameraParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'position' and 'up' parameters"))?;

    let request = CameraMove {
        position: Vec3::from_array(camera_params.position),
        up: Vec3::from_array(camera_params.up),
        duration: Duration::from_millis(camera_params.duration.unwrap_or(DEFAULT_CAMERA_MOVE_MS)),
        look_at: camera_params.look_at.map(Vec3::from_array),
    };
    if !request.position.is_finite() || !request.up.is_finite() || request.up == Vec3::ZERO {
        return Err(RpcError::invalid_params("Camera vectors must be finite and 'up' non-zero"));
    }

    Ok(serde_json::json!({
        "success": context.camera_control.update_camera(request)
    }))
}

fn handle_get_camera_state(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let (transform, projection) = context
        .cameras
        .get(context.active.entity())
        .map_err(|_| RpcError::internal_error("Live camera not found"))?;

    let projection_state = match projection {
        Projection::Perspective(perspective) => serde_json::json!({
            "fov": perspective.fov,
            "near": perspective.near,
            "far": perspective.far,
        }),
        Projection::Orthographic(orthographic) => serde_json::json!({
            "scale": orthographic.scale,
            "near": orthographic.near,
            "far": orthographic.far,
        }),
        _ => serde_json::Value::Null,
    };

    Ok(serde_json::json!({
        "camera_type": context.active.kind.as_str(),
        "control_mode": context.control_manager.active().as_str(),
        "position": transform.translation.to_array(),
        "forward": transform.forward().as_vec3().to_array(),
        "up": transform.up().as_vec3().to_array(),
        "orbit_center": context.orbit.center.to_array(),
        "projection": projection_state,
    }))
}

fn handle_get_scene_bounds(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let bounds = scene_bounds(context.meshes.iter());
    if bounds.is_empty() {
        return Ok(serde_json::Value::Null);
    }

    Ok(serde_json::json!({
        "min": bounds.min.to_array(),
        "max": bounds.max.to_array(),
        "center": bounds.center().to_array(),
        "size": bounds.size().to_array(),
    }))
}

fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = smoothed_fps(diagnostics).unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
