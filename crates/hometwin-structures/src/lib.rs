//! Scene structure systems for hometwin-rs.
//!
//! Three systems own all renderer resources of the scene, one per concern:
//! - [`LayeredModel`] — the solid floor/wall/ceiling meshes, one set per story
//! - [`RoomOverlaySystem`] — flat pickable highlight meshes, one per room
//! - [`SensorMarkerSystem`] — diffed 3D glyphs, one per placed sensor
//!
//! Ownership never transfers between them; each disposes what it built.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod layered_model;
pub mod room_overlay;
pub mod sensor_markers;

pub use layered_model::{LayerMesh, LayeredModel};
pub use room_overlay::{RoomOverlay, RoomOverlaySystem, OVERLAY_LIFT, PULSE_PERIOD};
pub use sensor_markers::{SensorMarker, SensorMarkerSystem, SyncStats, MARKER_RADIUS};
