//! Renderer-facing state for hometwin-rs.
//!
//! This crate owns everything the host's render backend reads each frame:
//! - [`geometry`]: indexed surface geometry with positions, normals, bounds,
//!   and tracked lifetime (buffers release on drop, counted per scene)
//! - [`material`]: per-mesh display state and the semantic color table
//! - [`camera`]: the orbit / first-person camera rig with bounds auto-framing
//!
//! The actual GPU device, window, and draw loop belong to the host; the scene
//! exposes contiguous buffers (`bytemuck`-castable) and material state, and
//! the host uploads and draws them however it likes.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod geometry;
pub mod material;

pub use camera::CameraRig;
pub use geometry::{marker_sphere, ResourceTracker, SurfaceGeometry};
pub use material::{
    marker_color, SurfaceKind, SurfaceMaterial, SELECTION_COLOR, SELECTION_OPACITY, WARNING_COLOR,
};

use glam::Mat4;

/// One renderable batch handed to the host's render backend.
///
/// Borrowed from the owning system for the duration of a frame; holding one
/// across a scene mutation is prevented by the borrow.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub geometry: &'a SurfaceGeometry,
    pub material: &'a SurfaceMaterial,
    pub transform: Mat4,
}
