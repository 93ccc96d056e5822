use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use serde::{Deserialize, Serialize};

use crate::engine::assets::bounds::SceneBounds;

/// Smallest extent framed, so a degenerate (flat or point-sized) scene still
/// yields a finite camera distance and a valid orthographic area.
const MIN_FRAMED_EXTENT: f32 = 1.0e-3;

/// Named camera placements around the scene bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreset {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
    /// Fallback for the whole-scene framing and any unrecognised view name.
    #[default]
    Diagonal,
}

impl ViewPreset {
    pub const NAMED: [ViewPreset; 6] = [
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
    ];

    /// Resolve a selector value. Unknown names fall back to the diagonal view.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "front" => Self::Front,
            "back" => Self::Back,
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Diagonal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Diagonal => "diagonal",
        }
    }

    /// Unit offset from the scene center towards the camera.
    pub fn direction(&self) -> Vec3 {
        match self {
            Self::Front => Vec3::NEG_Z,
            Self::Back => Vec3::Z,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
            Self::Top => Vec3::Y,
            Self::Bottom => Vec3::NEG_Y,
            Self::Diagonal => Vec3::ONE.normalize(),
        }
    }

    /// Up vector for `looking_at`; vertical views cannot use world Y.
    pub fn up(&self) -> Vec3 {
        match self {
            Self::Top => Vec3::NEG_Z,
            Self::Bottom => Vec3::Z,
            _ => Vec3::Y,
        }
    }

    /// The face of the bounds visible from this view, as (width, height).
    pub fn orthographic_extent(&self, size: Vec3) -> Vec2 {
        match self {
            Self::Left | Self::Right => Vec2::new(size.z, size.y),
            Self::Top | Self::Bottom => Vec2::new(size.x, size.z),
            _ => Vec2::new(size.x, size.y),
        }
    }
}

/// Distance at which a perspective camera with vertical `fov` fits `max_dimension`.
pub fn perspective_distance(max_dimension: f32, fov: f32, fit_margin: f32) -> f32 {
    let half = max_dimension.max(MIN_FRAMED_EXTENT) * 0.5;
    half / (fov * 0.5).tan() * fit_margin
}

pub fn frame_perspective(
    bounds: &SceneBounds,
    fov: f32,
    view: ViewPreset,
    fit_margin: f32,
) -> Transform {
    let center = bounds.center();
    let distance = perspective_distance(bounds.max_dimension(), fov, fit_margin);
    Transform::from_translation(center + view.direction() * distance).looking_at(center, view.up())
}

/// Placement and visible area for an orthographic camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicFraming {
    pub transform: Transform,
    pub extent: Vec2,
    pub far: f32,
}

pub fn frame_orthographic(
    bounds: &SceneBounds,
    view: ViewPreset,
    fit_margin: f32,
) -> OrthographicFraming {
    let center = bounds.center();
    let max_dimension = bounds.max_dimension().max(MIN_FRAMED_EXTENT);
    let extent = (view.orthographic_extent(bounds.size()) * fit_margin).max(Vec2::splat(MIN_FRAMED_EXTENT));
    let distance = max_dimension * fit_margin;

    OrthographicFraming {
        transform: Transform::from_translation(center + view.direction() * distance)
            .looking_at(center, view.up()),
        extent,
        far: distance + max_dimension,
    }
}

/// Frame `bounds` with whichever projection the camera uses, updating the
/// projection in place. Returns the new camera transform, or `None` when
/// there is nothing to frame.
pub fn frame_camera(
    projection: &mut Projection,
    bounds: &SceneBounds,
    view: ViewPreset,
    fit_margin: f32,
) -> Option<Transform> {
    if bounds.is_empty() {
        return None;
    }

    match projection {
        Projection::Perspective(perspective) => Some(frame_perspective(
            bounds,
            perspective.fov,
            view,
            fit_margin,
        )),
        Projection::Orthographic(orthographic) => {
            let framing = frame_orthographic(bounds, view, fit_margin);
            // AutoMin keeps both extents visible whatever the viewport aspect.
            orthographic.scaling_mode = ScalingMode::AutoMin {
                min_width: framing.extent.x,
                min_height: framing.extent.y,
            };
            orthographic.scale = 1.0;
            orthographic.far = orthographic.far.max(framing.far);
            Some(framing.transform)
        }
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
