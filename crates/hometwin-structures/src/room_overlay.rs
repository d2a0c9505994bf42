//! Per-room highlight overlays.
//!
//! Every room with a usable polygon gets a flat mesh floating just above the
//! floor plane. Overlays stay resident for the lifetime of the active mesh —
//! only their material opacity animates — so pick targets never churn on
//! sensor traffic. An overlay is invisible (opacity zero) unless its room is
//! alerting or selected, but remains pickable either way.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use hometwin_core::frame;
use hometwin_core::payload::RoomMeta;
use hometwin_core::triangulate;
use hometwin_render::geometry::{ResourceTracker, SurfaceGeometry};
use hometwin_render::material::{SurfaceMaterial, SELECTION_COLOR, SELECTION_OPACITY, WARNING_COLOR};
use hometwin_render::DrawItem;

/// Height of overlays above the floor plane (z-fighting avoidance).
pub const OVERLAY_LIFT: f32 = frame::SURFACE_LIFT;

/// Alert pulse period in seconds.
pub const PULSE_PERIOD: f32 = 0.9;

/// Alert pulse opacity range.
const PULSE_MIN_OPACITY: f32 = 0.18;
const PULSE_MAX_OPACITY: f32 = 0.63;

/// One room's overlay mesh.
#[derive(Debug)]
pub struct RoomOverlay {
    pub room_id: String,
    pub geometry: SurfaceGeometry,
    pub material: SurfaceMaterial,
}

/// Owner of the overlay meshes for the active mesh payload.
#[derive(Debug)]
pub struct RoomOverlaySystem {
    overlays: HashMap<String, RoomOverlay>,
    tracker: Arc<ResourceTracker>,
}

impl RoomOverlaySystem {
    #[must_use]
    pub fn new(tracker: Arc<ResourceTracker>) -> Self {
        Self { overlays: HashMap::new(), tracker }
    }

    /// Replaces all overlays from the mesh metadata rooms.
    ///
    /// Rooms whose ring normalizes below three points or fails triangulation
    /// are skipped; the rest of the scene still builds.
    pub fn rebuild(&mut self, rooms: &HashMap<String, RoomMeta>, world_offset: Vec3) {
        self.overlays.clear();

        for (room_id, meta) in rooms {
            let translated: Vec<Vec2> =
                meta.polygon_points().map(|p| frame::plan_offset(p, world_offset)).collect();
            let ring = triangulate::normalize_ring(&translated);
            if ring.len() < 3 {
                log::warn!("room '{room_id}' polygon degenerates to {} points, overlay skipped", ring.len());
                continue;
            }

            let triangles = triangulate::ear_clip(&ring);
            if triangles.is_empty() {
                log::warn!("room '{room_id}' polygon failed triangulation, overlay skipped");
                continue;
            }

            let vertices: Vec<Vec3> =
                ring.iter().map(|p| Vec3::new(p.x, OVERLAY_LIFT, p.y)).collect();
            let geometry = SurfaceGeometry::build(&vertices, &triangles, &self.tracker);

            let mut material = SurfaceMaterial::new(SELECTION_COLOR, &self.tracker);
            material.double_sided = true;
            material.set_opacity(0.0);

            self.overlays.insert(
                room_id.clone(),
                RoomOverlay { room_id: room_id.clone(), geometry, material },
            );
        }

        log::info!("room overlays rebuilt: {} of {} room(s)", self.overlays.len(), rooms.len());
    }

    /// Drives the per-frame highlight animation.
    ///
    /// Alert membership wins over selection; everything else is driven to
    /// zero opacity but stays pickable.
    pub fn update_animation(
        &mut self,
        time_seconds: f64,
        alert_rooms: &HashSet<String>,
        selected_room: Option<&str>,
    ) {
        let opacity = pulse_opacity(time_seconds);
        for overlay in self.overlays.values_mut() {
            if alert_rooms.contains(&overlay.room_id) {
                overlay.material.color = WARNING_COLOR;
                overlay.material.set_opacity(opacity);
            } else if selected_room == Some(overlay.room_id.as_str()) {
                overlay.material.color = SELECTION_COLOR;
                overlay.material.set_opacity(SELECTION_OPACITY);
            } else {
                overlay.material.set_opacity(0.0);
            }
        }
    }

    /// Pickable targets: every overlay, visible or not.
    pub fn pick_targets(&self) -> impl Iterator<Item = (&str, &SurfaceGeometry)> {
        self.overlays.values().map(|o| (o.room_id.as_str(), &o.geometry))
    }

    /// Looks up one overlay by room id.
    #[must_use]
    pub fn get(&self, room_id: &str) -> Option<&RoomOverlay> {
        self.overlays.get(room_id)
    }

    /// Number of live overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    /// True when no overlays exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Disposes every overlay.
    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    /// Draw batches for the host renderer.
    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem<'_>> {
        self.overlays.values().map(|overlay| DrawItem {
            geometry: &overlay.geometry,
            material: &overlay.material,
            transform: Mat4::IDENTITY,
        })
    }
}

/// Sinusoidal alert opacity at `time` seconds.
fn pulse_opacity(time_seconds: f64) -> f32 {
    let mid = (PULSE_MIN_OPACITY + PULSE_MAX_OPACITY) * 0.5;
    let amplitude = (PULSE_MAX_OPACITY - PULSE_MIN_OPACITY) * 0.5;
    let phase = (time_seconds as f32) * std::f32::consts::TAU / PULSE_PERIOD;
    mid + amplitude * phase.sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_room(name: &str) -> RoomMeta {
        RoomMeta {
            polygon: vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]],
            name: Some(name.to_string()),
            height: None,
        }
    }

    fn rooms(entries: Vec<(&str, RoomMeta)>) -> HashMap<String, RoomMeta> {
        entries.into_iter().map(|(id, meta)| (id.to_string(), meta)).collect()
    }

    #[test]
    fn test_rebuild_one_overlay_per_valid_room() {
        let tracker = ResourceTracker::new();
        let mut system = RoomOverlaySystem::new(Arc::clone(&tracker));

        let mut map = rooms(vec![("room_a", quad_room("Bedroom"))]);
        map.insert(
            "bad_room".to_string(),
            RoomMeta { polygon: vec![[1.0, 1.0], [1.0, 1.0]], name: None, height: None },
        );

        system.rebuild(&map, Vec3::ZERO);
        assert_eq!(system.len(), 1);
        assert!(system.get("room_a").is_some());
        assert!(system.get("bad_room").is_none());
    }

    #[test]
    fn test_overlay_geometry_is_lifted_and_offset() {
        let tracker = ResourceTracker::new();
        let mut system = RoomOverlaySystem::new(Arc::clone(&tracker));
        let offset = Vec3::new(2.0, 1.5, 0.0);

        system.rebuild(&rooms(vec![("room_a", quad_room("Bedroom"))]), offset);

        let overlay = system.get("room_a").unwrap();
        let (min, max) = overlay.geometry.bounds().unwrap();
        assert_eq!(min.y, OVERLAY_LIFT);
        assert_eq!(max.y, OVERLAY_LIFT);
        // Polygon x range [0,4] shifted by offset.x = 2.
        assert_eq!(min.x, -2.0);
        assert_eq!(max.x, 2.0);
        // Polygon y range [0,3] shifted by offset.y = 1.5, onto render z.
        assert_eq!(min.z, -1.5);
        assert_eq!(max.z, 1.5);
    }

    #[test]
    fn test_idle_overlays_are_invisible_but_pickable() {
        let tracker = ResourceTracker::new();
        let mut system = RoomOverlaySystem::new(Arc::clone(&tracker));
        system.rebuild(&rooms(vec![("room_a", quad_room("Bedroom"))]), Vec3::ZERO);

        system.update_animation(1.0, &HashSet::new(), None);
        let overlay = system.get("room_a").unwrap();
        assert_eq!(overlay.material.opacity, 0.0);
        assert_eq!(system.pick_targets().count(), 1);
    }

    #[test]
    fn test_alert_pulse_stays_in_range() {
        let tracker = ResourceTracker::new();
        let mut system = RoomOverlaySystem::new(Arc::clone(&tracker));
        system.rebuild(&rooms(vec![("room_a", quad_room("Bedroom"))]), Vec3::ZERO);

        let alerts: HashSet<String> = [String::from("room_a")].into();
        let mut seen_low = false;
        let mut seen_high = false;
        for step in 0..90 {
            let t = f64::from(step) * 0.01;
            system.update_animation(t, &alerts, None);
            let opacity = system.get("room_a").unwrap().material.opacity;
            assert!((PULSE_MIN_OPACITY - 1e-4..=PULSE_MAX_OPACITY + 1e-4).contains(&opacity));
            assert_eq!(system.get("room_a").unwrap().material.color, WARNING_COLOR);
            seen_low |= opacity < 0.25;
            seen_high |= opacity > 0.55;
        }
        // One full period covers both extremes.
        assert!(seen_low && seen_high);
    }

    #[test]
    fn test_alert_wins_over_selection() {
        let tracker = ResourceTracker::new();
        let mut system = RoomOverlaySystem::new(Arc::clone(&tracker));
        system.rebuild(&rooms(vec![("room_a", quad_room("Bedroom"))]), Vec3::ZERO);

        let alerts: HashSet<String> = [String::from("room_a")].into();
        system.update_animation(0.0, &alerts, Some("room_a"));
        assert_eq!(system.get("room_a").unwrap().material.color, WARNING_COLOR);
    }

    #[test]
    fn test_selection_highlight_is_steady() {
        let tracker = ResourceTracker::new();
        let mut system = RoomOverlaySystem::new(Arc::clone(&tracker));
        system.rebuild(&rooms(vec![("room_a", quad_room("Bedroom"))]), Vec3::ZERO);

        system.update_animation(0.1, &HashSet::new(), Some("room_a"));
        let first = system.get("room_a").unwrap().material.opacity;
        system.update_animation(0.5, &HashSet::new(), Some("room_a"));
        let second = system.get("room_a").unwrap().material.opacity;

        assert_eq!(first, SELECTION_OPACITY);
        assert_eq!(first, second);
        assert_eq!(system.get("room_a").unwrap().material.color, SELECTION_COLOR);
    }

    #[test]
    fn test_rebuild_disposes_previous_overlays() {
        let tracker = ResourceTracker::new();
        let mut system = RoomOverlaySystem::new(Arc::clone(&tracker));

        system.rebuild(
            &rooms(vec![("room_a", quad_room("A")), ("room_b", quad_room("B"))]),
            Vec3::ZERO,
        );
        assert_eq!(tracker.live_geometries(), 2);

        system.rebuild(&rooms(vec![("room_c", quad_room("C"))]), Vec3::ZERO);
        assert_eq!(system.len(), 1);
        assert_eq!(tracker.live_geometries(), 1);
        assert_eq!(tracker.live_materials(), 1);
    }
}
