/// Canvas the web build renders into. Startup fails without it.
pub const CANVAS_SELECTOR: &str = "#bevy";

pub const VIEWER_CONFIG_PATH: &str = "viewer_config.json";

pub const DEFAULT_MODEL_PATH: &str = "models/turtle.glb";

/// Prefiltered cubemaps baked from `brown_photostudio_01_1k.hdr`.
pub const DEFAULT_ENVIRONMENT_DIFFUSE_PATH: &str =
    "environment_maps/brown_photostudio_01_diffuse_rgb9e5_zstd.ktx2";
pub const DEFAULT_ENVIRONMENT_SPECULAR_PATH: &str =
    "environment_maps/brown_photostudio_01_specular_rgb9e5_zstd.ktx2";
