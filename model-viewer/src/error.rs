use thiserror::Error;

/// Failures surfaced by the viewer outside the per-frame systems.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("mount point `{0}` was not found in the document")]
    MountPointMissing(String),

    #[error("browser window or document is not available")]
    WindowUnavailable,

    #[error("unknown camera type `{0}`, expected `perspective` or `orthographic`")]
    UnknownCameraType(String),

    #[error("unknown control mode `{0}`, expected `orbit` or `pivot`")]
    UnknownControlMode(String),
}
