//! The layered floor/wall/ceiling model.
//!
//! One [`LayerMesh`] per surface declared in the payload, tagged with its
//! surface kind and story index for bulk visibility updates. Rebuilding
//! disposes every previous mesh before the new ones are created, so a mesh
//! swap can never accumulate renderer resources.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use hometwin_core::frame;
use hometwin_core::payload::{LayerView, MeshData, MeshSurface};
use hometwin_core::visibility::VisibilityConfig;
use hometwin_render::geometry::{ResourceTracker, SurfaceGeometry};
use hometwin_render::material::{SurfaceKind, SurfaceMaterial};
use hometwin_render::DrawItem;

/// One built surface of one story.
#[derive(Debug)]
pub struct LayerMesh {
    pub kind: SurfaceKind,
    /// Story index in payload order.
    pub level: usize,
    pub geometry: SurfaceGeometry,
    pub material: SurfaceMaterial,
    /// Vertical placement of the story, in render units.
    pub y_offset: f32,
}

impl LayerMesh {
    /// Model transform: the story's vertical placement.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.y_offset, 0.0))
    }
}

/// Owner of all solid layer meshes for the active mesh payload.
#[derive(Debug)]
pub struct LayeredModel {
    meshes: Vec<LayerMesh>,
    tracker: Arc<ResourceTracker>,
}

impl LayeredModel {
    #[must_use]
    pub fn new(tracker: Arc<ResourceTracker>) -> Self {
        Self { meshes: Vec::new(), tracker }
    }

    /// Replaces the layer meshes with ones built from `data`.
    ///
    /// Surfaces missing from a level are skipped; surfaces that are declared
    /// but degenerate still build (as empty geometry) so the live mesh count
    /// always mirrors the payload.
    pub fn rebuild(&mut self, data: &MeshData, visibility: &VisibilityConfig) {
        // Dispose previous meshes before building replacements.
        self.meshes.clear();

        for (level, layer) in data.layer_views().iter().enumerate() {
            for kind in SurfaceKind::ALL {
                if let Some(surface) = surface_of(layer, kind) {
                    let mesh =
                        build_surface(surface, kind, level, layer.z_offset, visibility, &self.tracker);
                    self.meshes.push(mesh);
                }
            }
        }

        log::info!(
            "layered model rebuilt: {} meshes across {} level(s)",
            self.meshes.len(),
            data.layer_views().len()
        );
    }

    /// Applies a visibility config to every mesh in place. No rebuild.
    pub fn apply_visibility(&mut self, visibility: &VisibilityConfig) {
        for mesh in &mut self.meshes {
            apply_surface_visibility(&mut mesh.material, mesh.kind, visibility);
        }
    }

    /// The built meshes.
    #[must_use]
    pub fn meshes(&self) -> &[LayerMesh] {
        &self.meshes
    }

    /// Number of live layer meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True when no mesh payload is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Disposes every layer mesh.
    pub fn clear(&mut self) {
        self.meshes.clear();
    }

    /// Union bounding box of all built meshes, including story offsets.
    ///
    /// `None` when nothing with spatial extent is loaded, which callers use
    /// to skip camera framing.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut any = false;

        for mesh in &self.meshes {
            if let Some((mesh_min, mesh_max)) = mesh.geometry.bounds() {
                let lift = Vec3::new(0.0, mesh.y_offset, 0.0);
                min = min.min(mesh_min + lift);
                max = max.max(mesh_max + lift);
                any = true;
            }
        }

        any.then_some((min, max))
    }

    /// Draw batches for the host renderer.
    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem<'_>> {
        self.meshes.iter().map(|mesh| DrawItem {
            geometry: &mesh.geometry,
            material: &mesh.material,
            transform: mesh.transform(),
        })
    }
}

fn build_surface(
    surface: &MeshSurface,
    kind: SurfaceKind,
    level: usize,
    z_offset: f32,
    visibility: &VisibilityConfig,
    tracker: &Arc<ResourceTracker>,
) -> LayerMesh {
    // Whole-scene axis remap only; the backend already centered vertices.
    let vertices: Vec<Vec3> = surface.vertex_points().map(frame::remap_axes).collect();
    let geometry = SurfaceGeometry::build(&vertices, &surface.faces, tracker);

    let mut material = SurfaceMaterial::new(kind.color(), tracker);
    material.double_sided = true;
    apply_surface_visibility(&mut material, kind, visibility);

    LayerMesh { kind, level, geometry, material, y_offset: z_offset }
}

fn surface_of<'a>(layer: &LayerView<'a>, kind: SurfaceKind) -> Option<&'a MeshSurface> {
    match kind {
        SurfaceKind::Floor => layer.floor,
        SurfaceKind::Walls => layer.walls,
        SurfaceKind::Ceiling => layer.ceiling,
    }
}

fn apply_surface_visibility(
    material: &mut SurfaceMaterial,
    kind: SurfaceKind,
    visibility: &VisibilityConfig,
) {
    material.visible = kind.visible_in(visibility);
    material.set_opacity(kind.opacity_in(visibility));
    material.wireframe = visibility.wireframe;
}
