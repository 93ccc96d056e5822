use bevy::math::Vec3;

/// Both cameras start here, looking at the origin, until the scene is framed.
pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(50.0, 10.0, -50.0);

/// Vertical field of view of the perspective camera.
pub const PERSPECTIVE_FOV_DEGREES: f32 = 50.0;
pub const PERSPECTIVE_NEAR: f32 = 0.01;
pub const PERSPECTIVE_FAR: f32 = 1000.0;

/// Visible height of the orthographic camera before the first framing.
pub const ORTHOGRAPHIC_INITIAL_HEIGHT: f32 = 50.0;
pub const ORTHOGRAPHIC_NEAR: f32 = 0.1;
pub const ORTHOGRAPHIC_FAR: f32 = 1000.0;

/// Padding applied around the scene bounds when framing.
pub const FIT_MARGIN: f32 = 2.0;

/// Duration used for camera moves requested without an explicit one (ms).
pub const DEFAULT_CAMERA_MOVE_MS: u64 = 1000;
