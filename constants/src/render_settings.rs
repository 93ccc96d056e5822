pub const ORBIT_MARKER_RADIUS: f32 = 0.5;
pub const PIVOT_MARKER_RADIUS: f32 = 0.3;
pub const PIVOT_AXES_LENGTH: f32 = 2.0;

/// Seconds the orbit marker stays fully opaque before fading.
pub const MARKER_FADE_DELAY_SECS: f32 = 0.5;

/// Opacity lost per second once the orbit marker starts fading.
pub const MARKER_FADE_RATE: f32 = 1.0;

pub const ENVIRONMENT_INTENSITY: f32 = 900.0;

pub const FPS_NOTIFICATION_INTERVAL_SECS: f32 = 0.5;
