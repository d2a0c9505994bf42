//! Per-mesh display state and the semantic color table.

use std::sync::Arc;

use glam::Vec3;
use hometwin_core::sensor::SensorCategory;
use hometwin_core::visibility::VisibilityConfig;

use crate::geometry::ResourceTracker;

/// Pulse/alert color shared by alerting overlays and alerting markers.
pub const WARNING_COLOR: Vec3 = Vec3::new(0.96, 0.26, 0.21);

/// Steady highlight color for the selected room overlay.
pub const SELECTION_COLOR: Vec3 = Vec3::new(0.25, 0.77, 1.0);

/// Steady highlight opacity for the selected room overlay.
pub const SELECTION_OPACITY: f32 = 0.28;

/// The three surface roles of a layer, each with a fixed semantic color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Floor,
    Walls,
    Ceiling,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 3] = [SurfaceKind::Floor, SurfaceKind::Walls, SurfaceKind::Ceiling];

    /// Fixed base color for this surface role.
    #[must_use]
    pub fn color(self) -> Vec3 {
        match self {
            SurfaceKind::Floor => Vec3::new(0.55, 0.52, 0.48),
            SurfaceKind::Walls => Vec3::new(0.82, 0.80, 0.76),
            SurfaceKind::Ceiling => Vec3::new(0.92, 0.92, 0.94),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Floor => "floor",
            SurfaceKind::Walls => "walls",
            SurfaceKind::Ceiling => "ceiling",
        }
    }

    /// Visibility flag for this kind in the given config.
    #[must_use]
    pub fn visible_in(self, visibility: &VisibilityConfig) -> bool {
        match self {
            SurfaceKind::Floor => visibility.floor,
            SurfaceKind::Walls => visibility.walls,
            SurfaceKind::Ceiling => visibility.ceiling,
        }
    }

    /// Opacity for this kind in the given config (already clamped).
    #[must_use]
    pub fn opacity_in(self, visibility: &VisibilityConfig) -> f32 {
        match self {
            SurfaceKind::Floor => visibility.floor_opacity,
            SurfaceKind::Walls => visibility.wall_opacity,
            SurfaceKind::Ceiling => visibility.ceiling_opacity,
        }
    }
}

/// Marker color for a sensor category.
#[must_use]
pub fn marker_color(category: SensorCategory) -> Vec3 {
    match category {
        SensorCategory::Motion => Vec3::new(0.30, 0.69, 0.31),
        SensorCategory::Door => Vec3::new(0.13, 0.59, 0.95),
        SensorCategory::Smoke => Vec3::new(1.0, 0.60, 0.0),
        SensorCategory::Temperature => Vec3::new(0.61, 0.15, 0.69),
        SensorCategory::Other => Vec3::new(0.62, 0.62, 0.62),
    }
}

/// Display state of one mesh. Mutated in place on visibility/animation
/// updates; rebuilt only when the owning geometry is rebuilt.
#[derive(Debug)]
pub struct SurfaceMaterial {
    pub color: Vec3,
    pub opacity: f32,
    /// Blending switch; forced on whenever opacity drops below one.
    pub transparent: bool,
    pub wireframe: bool,
    pub visible: bool,
    pub double_sided: bool,
    tracker: Arc<ResourceTracker>,
}

impl SurfaceMaterial {
    /// Creates an opaque, visible, single-sided material.
    #[must_use]
    pub fn new(color: Vec3, tracker: &Arc<ResourceTracker>) -> Self {
        tracker.acquire_material();
        Self {
            color,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            visible: true,
            double_sided: false,
            tracker: Arc::clone(tracker),
        }
    }

    /// Sets the opacity, switching blending on below one.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.transparent = opacity < 1.0;
    }
}

impl Drop for SurfaceMaterial {
    fn drop(&mut self) {
        self.tracker.release_material();
    }
}
