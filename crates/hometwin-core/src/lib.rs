//! Core abstractions for hometwin-rs.
//!
//! This crate provides the data side of the digital-twin scene:
//! - The backend payload model (mesh, home config, sensor events) in [`payload`] and [`sensor`]
//! - Coordinate conversion between backend and render conventions in [`frame`]
//! - Room boundary normalization and ear-clipping triangulation in [`triangulate`]
//! - The derived room directory and alert-set computation in [`room`]
//! - The host-facing visibility configuration in [`visibility`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Visibility config legitimately has many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod frame;
pub mod payload;
pub mod pick;
pub mod room;
pub mod sensor;
pub mod triangulate;
pub mod visibility;

pub use error::{Result, TwinError};
pub use payload::{
    LayerView, MeshData, MeshLayer, MeshMetadata, MeshPayload, MeshSurface, RoomMeta, WorldOffset,
};
pub use pick::PickResult;
pub use room::{RoomDirectory, RoomEntry, RoomSummary, UNKNOWN_ROOM_ID};
pub use sensor::{
    HomeConfig, RoomConfig, SecurityStatusEvent, Sensor, SensorCategory, SensorConfig, SensorUpdate,
};
pub use visibility::{CameraMode, VisibilityConfig};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
