//! The mesh payload consumed from the backend.
//!
//! Shape (JSON):
//!
//! ```json
//! {
//!   "mesh_id": "…",
//!   "created_at": "…",
//!   "data": {
//!     "floor":   {"vertices": [[x,y,z], …], "faces": [[a,b,c], …]},
//!     "walls":   {…},
//!     "ceiling": {…},
//!     "layers":  [{"floor": {…}, "walls": {…}, "ceiling": {…}, "z_offset": 2.8}, …],
//!     "metadata": {
//!       "rooms": {"room_a": {"polygon": [[x,y], …], "name": "…"}, …},
//!       "world_offset": {"x": 0.0, "y": 0.0, "z": 0.0}
//!     }
//!   }
//! }
//! ```
//!
//! Single-layer payloads put the surfaces directly on `data`; multi-story
//! payloads use the `layers` list with a vertical offset per level. Both are
//! presented uniformly through [`MeshData::layer_views`].

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::Deserialize;

use crate::error::Result;

/// A complete mesh payload as delivered by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct MeshPayload {
    /// Unique id of this generated mesh.
    pub mesh_id: String,

    /// Identifier of the home the mesh belongs to.
    #[serde(default)]
    pub home_id: Option<String>,

    /// Backend format tag (`mesh_json_v2`, `stacked_mesh_v1`). Informational;
    /// decoding is structural.
    #[serde(default)]
    pub mesh_format: Option<String>,

    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,

    /// The geometry and metadata.
    pub data: MeshData,
}

impl MeshPayload {
    /// Decodes a payload from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One indexed triangle surface (floor, walls, or ceiling of one level).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeshSurface {
    /// Vertex positions, backend convention (Z-up).
    pub vertices: Vec<[f32; 3]>,
    /// Triangle index triples into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl MeshSurface {
    /// Returns the vertices as glam vectors.
    pub fn vertex_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| Vec3::from_array(*v))
    }

    /// True if the surface carries no renderable triangles.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }
}

/// One level of a multi-story payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeshLayer {
    #[serde(default)]
    pub floor: Option<MeshSurface>,
    #[serde(default)]
    pub walls: Option<MeshSurface>,
    #[serde(default)]
    pub ceiling: Option<MeshSurface>,
    /// Vertical offset of this level in backend units (meters).
    #[serde(default)]
    pub z_offset: f32,
}

/// The geometry body of a mesh payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeshData {
    #[serde(default)]
    pub floor: Option<MeshSurface>,
    #[serde(default)]
    pub walls: Option<MeshSurface>,
    #[serde(default)]
    pub ceiling: Option<MeshSurface>,
    /// Multi-story levels. When present and non-empty, the direct surfaces
    /// above are ignored.
    #[serde(default)]
    pub layers: Option<Vec<MeshLayer>>,
    #[serde(default)]
    pub metadata: MeshMetadata,
}

/// A borrowed view of one level's surfaces, uniform across payload variants.
#[derive(Debug, Clone, Copy)]
pub struct LayerView<'a> {
    pub floor: Option<&'a MeshSurface>,
    pub walls: Option<&'a MeshSurface>,
    pub ceiling: Option<&'a MeshSurface>,
    pub z_offset: f32,
}

impl LayerView<'_> {
    /// Number of surfaces declared on this level.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        usize::from(self.floor.is_some())
            + usize::from(self.walls.is_some())
            + usize::from(self.ceiling.is_some())
    }
}

impl MeshData {
    /// Returns the ordered list of levels.
    ///
    /// A single-layer payload (no `layers`) is presented as one level at zero
    /// offset, so callers never branch on the payload variant.
    #[must_use]
    pub fn layer_views(&self) -> Vec<LayerView<'_>> {
        match &self.layers {
            Some(layers) if !layers.is_empty() => layers
                .iter()
                .map(|l| LayerView {
                    floor: l.floor.as_ref(),
                    walls: l.walls.as_ref(),
                    ceiling: l.ceiling.as_ref(),
                    z_offset: l.z_offset,
                })
                .collect(),
            _ => vec![LayerView {
                floor: self.floor.as_ref(),
                walls: self.walls.as_ref(),
                ceiling: self.ceiling.as_ref(),
                z_offset: 0.0,
            }],
        }
    }

    /// Total number of declared surfaces across all levels.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.layer_views().iter().map(LayerView::surface_count).sum()
    }
}

/// Mesh metadata: room boundaries and the world origin offset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeshMetadata {
    #[serde(default)]
    pub rooms: HashMap<String, RoomMeta>,
    #[serde(default)]
    pub world_offset: WorldOffset,
}

/// One room's boundary as authored in the mesh metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomMeta {
    /// Boundary ring in plan coordinates. May carry a duplicated closing
    /// point or consecutive duplicates; see [`crate::triangulate`].
    pub polygon: Vec<[f32; 2]>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub height: Option<f32>,
}

impl RoomMeta {
    /// Returns the polygon as glam points.
    pub fn polygon_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.polygon.iter().map(|p| Vec2::from_array(*p))
    }
}

/// Translation aligning backend absolute coordinates with the mesh origin.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WorldOffset {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl WorldOffset {
    /// The offset as a backend-convention vector.
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_LAYER: &str = r#"{
        "mesh_id": "m1",
        "mesh_format": "mesh_json_v2",
        "data": {
            "floor": {"vertices": [[0,0,0],[4,0,0],[4,3,0],[0,3,0]], "faces": [[0,1,2],[0,2,3]]},
            "walls": {"vertices": [[0,0,0],[4,0,0],[4,0,2.8],[0,0,2.8]], "faces": [[0,1,2],[0,2,3]]},
            "metadata": {
                "rooms": {"room_a": {"polygon": [[0,0],[4,0],[4,3],[0,3]], "name": "Bedroom"}},
                "world_offset": {"x": 2.0, "y": 1.5, "z": 0.0}
            }
        }
    }"#;

    const STACKED: &str = r#"{
        "mesh_id": "m2",
        "mesh_format": "stacked_mesh_v1",
        "data": {
            "layers": [
                {"floor": {"vertices": [[0,0,0]], "faces": []}, "z_offset": 0.0},
                {"floor": {"vertices": [[0,0,0]], "faces": []}, "ceiling": {"vertices": [], "faces": []}, "z_offset": 2.8}
            ],
            "metadata": {"rooms": {}, "world_offset": {"x": 0, "y": 0, "z": 0}}
        }
    }"#;

    #[test]
    fn test_decode_single_layer() {
        let payload = MeshPayload::from_json(SINGLE_LAYER).unwrap();
        assert_eq!(payload.mesh_id, "m1");

        let levels = payload.data.layer_views();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].z_offset, 0.0);
        assert_eq!(levels[0].surface_count(), 2); // floor + walls, no ceiling

        let room = &payload.data.metadata.rooms["room_a"];
        assert_eq!(room.name.as_deref(), Some("Bedroom"));
        assert_eq!(room.polygon.len(), 4);
        assert_eq!(payload.data.metadata.world_offset.to_vec3(), Vec3::new(2.0, 1.5, 0.0));
    }

    #[test]
    fn test_decode_stacked() {
        let payload = MeshPayload::from_json(STACKED).unwrap();
        let levels = payload.data.layer_views();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].z_offset, 0.0);
        assert_eq!(levels[1].z_offset, 2.8);
        assert_eq!(payload.data.surface_count(), 3);
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let payload =
            MeshPayload::from_json(r#"{"mesh_id": "m3", "data": {}}"#).unwrap();
        assert!(payload.data.metadata.rooms.is_empty());
        assert_eq!(payload.data.metadata.world_offset.to_vec3(), Vec3::ZERO);
        // No surfaces declared: one implicit empty level.
        let levels = payload.data.layer_views();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].surface_count(), 0);
    }

    #[test]
    fn test_degenerate_surface_detection() {
        let s = MeshSurface { vertices: vec![[0.0, 0.0, 0.0]], faces: vec![] };
        assert!(s.is_degenerate());
        assert!(MeshSurface::default().is_degenerate());
    }
}
