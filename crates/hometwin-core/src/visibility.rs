//! Host-facing visibility configuration.
//!
//! Two-way bound with the hosting UI: the host pushes changes and the scene
//! applies them in place, without rebuilding geometry.

use serde::{Deserialize, Serialize};

/// Lower bound for surface opacities. Surfaces dim but never vanish through
/// opacity alone; the per-kind visibility flags are the way to hide them.
/// Overlay opacity is not clamped and may reach zero.
pub const MIN_SURFACE_OPACITY: f32 = 0.1;

/// Camera navigation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Target-relative rotate/zoom/pan.
    #[default]
    Orbit,
    /// Look + move from inside the model.
    FirstPerson,
}

/// Visibility, opacity, and navigation switches for the whole scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawVisibilityConfig")]
pub struct VisibilityConfig {
    pub floor: bool,
    pub walls: bool,
    pub ceiling: bool,
    pub sensors: bool,
    pub wireframe: bool,
    pub floor_opacity: f32,
    pub wall_opacity: f32,
    pub ceiling_opacity: f32,
    pub camera_mode: CameraMode,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            floor: true,
            walls: true,
            ceiling: false,
            sensors: true,
            wireframe: false,
            floor_opacity: 1.0,
            wall_opacity: 0.8,
            ceiling_opacity: 0.3,
            camera_mode: CameraMode::Orbit,
        }
    }
}

impl VisibilityConfig {
    /// Clamps the surface opacities into `[MIN_SURFACE_OPACITY, 1.0]`.
    pub fn sanitize(&mut self) {
        self.floor_opacity = clamp_surface_opacity(self.floor_opacity);
        self.wall_opacity = clamp_surface_opacity(self.wall_opacity);
        self.ceiling_opacity = clamp_surface_opacity(self.ceiling_opacity);
    }

    /// Returns a sanitized copy.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}

/// Clamps one surface opacity into its legal range.
#[must_use]
pub fn clamp_surface_opacity(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(MIN_SURFACE_OPACITY, 1.0)
    } else {
        1.0
    }
}

/// Wire form of [`VisibilityConfig`]; clamping happens in the `From` impl so
/// a config straight off the wire is already sane.
#[derive(Deserialize)]
#[serde(default)]
struct RawVisibilityConfig {
    floor: bool,
    walls: bool,
    ceiling: bool,
    sensors: bool,
    wireframe: bool,
    floor_opacity: f32,
    wall_opacity: f32,
    ceiling_opacity: f32,
    camera_mode: CameraMode,
}

impl Default for RawVisibilityConfig {
    fn default() -> Self {
        let v = VisibilityConfig::default();
        Self {
            floor: v.floor,
            walls: v.walls,
            ceiling: v.ceiling,
            sensors: v.sensors,
            wireframe: v.wireframe,
            floor_opacity: v.floor_opacity,
            wall_opacity: v.wall_opacity,
            ceiling_opacity: v.ceiling_opacity,
            camera_mode: v.camera_mode,
        }
    }
}

impl From<RawVisibilityConfig> for VisibilityConfig {
    fn from(raw: RawVisibilityConfig) -> Self {
        Self {
            floor: raw.floor,
            walls: raw.walls,
            ceiling: raw.ceiling,
            sensors: raw.sensors,
            wireframe: raw.wireframe,
            floor_opacity: raw.floor_opacity,
            wall_opacity: raw.wall_opacity,
            ceiling_opacity: raw.ceiling_opacity,
            camera_mode: raw.camera_mode,
        }
        .sanitized()
    }
}
