/// Fraction of the remaining distance covered per frame by every convergence.
pub const EASING_SPEED: f32 = 0.1;

/// Orbit center snaps onto its target below this distance.
pub const ORBIT_TARGET_EPSILON: f32 = 0.001;

/// Camera position snaps onto its lerp target below this distance.
pub const CAMERA_TARGET_EPSILON: f32 = 0.01;

/// How far in front of a double-clicked point the camera comes to rest.
pub const ZOOM_TO_OFFSET: f32 = 10.0;

/// Window in which a second click turns into a double click (ms).
pub const CLICK_GRACE_MS: u64 = 200;

/// Cursor travel between press and release beyond which a click becomes a drag (px).
pub const CLICK_DRAG_TOLERANCE_PX: f32 = 4.0;

/// Radians of object rotation per pixel of pointer travel while pivot dragging.
pub const PIVOT_ROTATION_SPEED: f32 = 0.01;

/// World units of camera travel per pixel of wheel delta around a pivot.
pub const PIVOT_ZOOM_FACTOR: f32 = 0.1;
pub const PIVOT_MIN_DISTANCE: f32 = 5.0;
pub const PIVOT_MAX_DISTANCE: f32 = 100.0;

/// Dolly scale applied per wheel notch by the orbit controls.
pub const ORBIT_ZOOM_SCALE: f32 = 0.95;

/// Closest the orbit controls may dolly towards the orbit center.
pub const ORBIT_MIN_RADIUS: f32 = 0.01;

/// Keeps the polar angle off the poles so the view never flips.
pub const ORBIT_POLAR_EPSILON: f32 = 1.0e-4;

/// Pixel equivalent of one line-based wheel notch.
pub const WHEEL_LINE_PIXELS: f32 = 100.0;

/// Pixel delta treated as one dolly notch by the orbit controls.
pub const WHEEL_NOTCH_PIXELS: f32 = 100.0;

/// Smallest orthographic scale the wheel can zoom in to.
pub const ORTHOGRAPHIC_MIN_SCALE: f32 = 0.01;
