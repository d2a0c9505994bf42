//! hometwin-rs: a live 3D digital-twin scene for a physical home.
//!
//! The scene turns backend-supplied geometry and sensor streams into a
//! renderable, pickable 3D model: a layered floor/wall/ceiling mesh, one
//! translucent highlight overlay per room, and one marker per placed sensor.
//! The host owns the window and the draw loop; the scene owns everything in
//! between and is driven entirely through explicit entry points.
//!
//! # Quick Start
//!
//! ```no_run
//! use hometwin::{MeshPayload, Scene, SensorUpdate, Vec2};
//!
//! # fn load(_: &str) -> String { String::new() }
//! let mut scene = Scene::new();
//!
//! // Host fetched a mesh payload and a sensor event from its backend:
//! let payload = MeshPayload::from_json(&load("mesh.json")).unwrap();
//! scene.apply_mesh_update(&payload);
//!
//! let update = SensorUpdate::from_json(&load("event.json")).unwrap();
//! scene.apply_sensor_update(&update);
//!
//! // Per display frame:
//! scene.advance(0.016);
//! for item in scene.draw_items() {
//!     // upload item.geometry buffers, draw with item.material/item.transform
//! }
//!
//! // Pointer down:
//! if let Some(hit) = scene.pick_at(Vec2::new(320.0, 240.0), 640.0, 480.0) {
//!     println!("room {}", hit.room_id);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`hometwin_core`] — payload model, coordinate frame, triangulation,
//!   sensor/room state
//! - [`hometwin_render`] — camera rig, geometry/material building, resource
//!   tracking
//! - [`hometwin_structures`] — the layered model, room overlays, and sensor
//!   markers
//! - this crate — the [`Scene`] runtime and room picking

mod picking;
mod scene;

pub use scene::{Scene, SceneEvent, ScenePhase};

// Re-export core types
pub use hometwin_core::{
    error::{Result, TwinError},
    payload::{MeshData, MeshLayer, MeshMetadata, MeshPayload, MeshSurface, RoomMeta, WorldOffset},
    pick::PickResult,
    room::{RoomDirectory, RoomSummary, UNKNOWN_ROOM_ID},
    sensor::{HomeConfig, SecurityStatusEvent, Sensor, SensorCategory, SensorUpdate},
    visibility::{CameraMode, VisibilityConfig},
    Mat4, Vec2, Vec3, Vec4,
};

// Re-export render types
pub use hometwin_render::{CameraRig, DrawItem, ResourceTracker, SurfaceGeometry, SurfaceKind, SurfaceMaterial};

// Re-export structure systems
pub use hometwin_structures::{LayeredModel, RoomOverlaySystem, SensorMarkerSystem};
