//! Scene graph anchors and visual helpers.
//!
//! The loaded model lives under a single root so pointer tools can find
//! top-level objects; helpers are tagged so ray casts and bounds skip them.

/// Orbit and pivot markers with their fade behaviour.
pub mod helpers;

/// Viewer scene root, loaded model marker and bounds accumulation.
pub mod model;
