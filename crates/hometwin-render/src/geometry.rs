//! Surface geometry building and resource lifetime tracking.
//!
//! A [`SurfaceGeometry`] flattens a vertex/face surface into contiguous
//! position, normal, and index buffers ready for upload, derives
//! area-weighted vertex normals from the topology, and computes an
//! axis-aligned bounding box. Degenerate input (no vertices or no faces)
//! yields an empty geometry that disposes like any other.
//!
//! Every geometry and material is counted against a [`ResourceTracker`]
//! shared by the owning scene; the count drops with the value, so leak
//! checks reduce to an equality assertion on the live counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::Vec3;

/// Live counters for renderer-owned resources.
///
/// After a rebuild, the live geometry count must equal exactly the surfaces
/// declared by the new payload; after scene teardown, both counters must be
/// zero.
#[derive(Debug, Default)]
pub struct ResourceTracker {
    geometries: AtomicUsize,
    materials: AtomicUsize,
}

impl ResourceTracker {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of geometries currently alive.
    pub fn live_geometries(&self) -> usize {
        self.geometries.load(Ordering::Relaxed)
    }

    /// Number of materials currently alive.
    pub fn live_materials(&self) -> usize {
        self.materials.load(Ordering::Relaxed)
    }

    pub(crate) fn acquire_geometry(&self) {
        self.geometries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn release_geometry(&self) {
        self.geometries.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn acquire_material(&self) {
        self.materials.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn release_material(&self) {
        self.materials.fetch_sub(1, Ordering::Relaxed);
    }
}

/// An indexed triangle surface in render coordinates.
#[derive(Debug)]
pub struct SurfaceGeometry {
    positions: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
    bounds: Option<(Vec3, Vec3)>,
    tracker: Arc<ResourceTracker>,
}

impl SurfaceGeometry {
    /// Builds a geometry from vertices and triangle index triples.
    ///
    /// Faces referencing out-of-range vertices are skipped. Empty input
    /// produces an empty geometry rather than an error.
    #[must_use]
    pub fn build(vertices: &[Vec3], faces: &[[u32; 3]], tracker: &Arc<ResourceTracker>) -> Self {
        let vertex_count = vertices.len();

        let mut positions = Vec::with_capacity(vertex_count * 3);
        for v in vertices {
            positions.extend_from_slice(&[v.x, v.y, v.z]);
        }

        let mut indices = Vec::with_capacity(faces.len() * 3);
        let mut accumulated = vec![Vec3::ZERO; vertex_count];
        for face in faces {
            let [a, b, c] = *face;
            if a as usize >= vertex_count || b as usize >= vertex_count || c as usize >= vertex_count
            {
                log::warn!("skipping face with out-of-range index {face:?}");
                continue;
            }
            indices.extend_from_slice(face);

            // Unnormalized cross product: length is twice the triangle area,
            // so summing it per vertex area-weights the normal.
            let e1 = vertices[b as usize] - vertices[a as usize];
            let e2 = vertices[c as usize] - vertices[a as usize];
            let weighted = e1.cross(e2);
            accumulated[a as usize] += weighted;
            accumulated[b as usize] += weighted;
            accumulated[c as usize] += weighted;
        }

        let mut normals = Vec::with_capacity(vertex_count * 3);
        for n in &accumulated {
            let n = n.normalize_or_zero();
            normals.extend_from_slice(&[n.x, n.y, n.z]);
        }

        let bounds = if vertices.is_empty() || indices.is_empty() {
            None
        } else {
            let mut min = Vec3::splat(f32::MAX);
            let mut max = Vec3::splat(f32::MIN);
            for v in vertices {
                min = min.min(*v);
                max = max.max(*v);
            }
            Some((min, max))
        };

        tracker.acquire_geometry();
        Self { positions, normals, indices, bounds, tracker: Arc::clone(tracker) }
    }

    /// An empty geometry (no vertices, no triangles).
    #[must_use]
    pub fn empty(tracker: &Arc<ResourceTracker>) -> Self {
        Self::build(&[], &[], tracker)
    }

    /// True if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Flattened xyz position buffer.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flattened xyz normal buffer, parallel to `positions`.
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Triangle index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Position buffer as raw bytes for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normal buffer as raw bytes for upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Index buffer as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned bounding box, `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.bounds
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex position of triangle corner `(triangle, corner)`.
    ///
    /// Used by the picking ray walk; corners out of range return `None`.
    pub fn triangle_vertex(&self, triangle: usize, corner: usize) -> Option<Vec3> {
        let idx = *self.indices.get(triangle * 3 + corner)? as usize;
        let base = idx * 3;
        let slice = self.positions.get(base..base + 3)?;
        Some(Vec3::new(slice[0], slice[1], slice[2]))
    }
}

impl Drop for SurfaceGeometry {
    fn drop(&mut self) {
        self.tracker.release_geometry();
    }
}

/// Builds the shared marker glyph: a small UV sphere.
#[must_use]
pub fn marker_sphere(radius: f32, tracker: &Arc<ResourceTracker>) -> SurfaceGeometry {
    const RINGS: u32 = 6;
    const SEGMENTS: u32 = 12;

    let mut vertices = Vec::new();
    for ring in 0..=RINGS {
        let phi = std::f32::consts::PI * ring as f32 / RINGS as f32;
        for segment in 0..=SEGMENTS {
            let theta = std::f32::consts::TAU * segment as f32 / SEGMENTS as f32;
            vertices.push(Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }

    let mut faces = Vec::new();
    let stride = SEGMENTS + 1;
    for ring in 0..RINGS {
        for segment in 0..SEGMENTS {
            let a = ring * stride + segment;
            let b = a + stride;
            faces.push([a, b, a + 1]);
            faces.push([a + 1, b, b + 1]);
        }
    }

    SurfaceGeometry::build(&vertices, &faces, tracker)
}
