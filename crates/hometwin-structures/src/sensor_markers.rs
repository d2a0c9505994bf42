//! Diffed 3D sensor markers.
//!
//! Markers reconcile against the live sensor table instead of rebuilding:
//! each sync creates, repositions, recolors, or removes markers keyed by
//! sensor id, so a high-frequency sensor stream causes no flicker and no
//! geometry churn. All markers share one base sphere; each carries its own
//! material so it can be recolored independently.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use hometwin_core::frame;
use hometwin_core::sensor::Sensor;
use hometwin_render::geometry::{marker_sphere, ResourceTracker, SurfaceGeometry};
use hometwin_render::material::{marker_color, SurfaceMaterial, WARNING_COLOR};
use hometwin_render::DrawItem;

/// Radius of the marker glyph.
pub const MARKER_RADIUS: f32 = 0.15;

/// One sensor's marker.
#[derive(Debug)]
pub struct SensorMarker {
    pub sensor_id: String,
    /// Render-space position (world offset and lift applied).
    pub position: Vec3,
    pub material: SurfaceMaterial,
}

impl SensorMarker {
    /// Model transform placing the shared glyph at this sensor.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}

/// Counts of one reconciliation pass, mostly for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Owner of all sensor markers.
#[derive(Debug)]
pub struct SensorMarkerSystem {
    markers: HashMap<String, SensorMarker>,
    base_geometry: SurfaceGeometry,
    tracker: Arc<ResourceTracker>,
}

impl SensorMarkerSystem {
    #[must_use]
    pub fn new(tracker: Arc<ResourceTracker>) -> Self {
        let base_geometry = marker_sphere(MARKER_RADIUS, &tracker);
        Self { markers: HashMap::new(), base_geometry, tracker }
    }

    /// Reconciles markers against the sensor table.
    ///
    /// A marker exists after this call if and only if its sensor has a
    /// usable location and `visible` is true — set equality, enforced by a
    /// set-difference removal pass. Syncing twice with the same input is a
    /// no-op the second time.
    pub fn sync(
        &mut self,
        sensors: &HashMap<String, Sensor>,
        visible: bool,
        world_offset: Vec3,
    ) -> SyncStats {
        let mut stats = SyncStats::default();

        if !visible {
            stats.removed = self.markers.len();
            self.markers.clear();
            if stats.removed > 0 {
                log::debug!("sensor markers hidden: {} removed", stats.removed);
            }
            return stats;
        }

        for sensor in sensors.values() {
            let Some(location) = sensor.location else {
                continue;
            };
            let position = frame::to_render_lifted(location, world_offset, frame::SURFACE_LIFT);
            let color = if sensor.is_alert {
                WARNING_COLOR
            } else {
                marker_color(sensor.category())
            };

            if let Some(marker) = self.markers.get_mut(&sensor.id) {
                marker.position = position;
                marker.material.color = color;
                stats.updated += 1;
            } else {
                let material = SurfaceMaterial::new(color, &self.tracker);
                self.markers.insert(
                    sensor.id.clone(),
                    SensorMarker { sensor_id: sensor.id.clone(), position, material },
                );
                stats.created += 1;
            }
        }

        // Set-difference cleanup: markers whose sensor vanished or lost its
        // location. Dropping the marker disposes its material.
        self.markers.retain(|id, _| {
            let keep = sensors.get(id).is_some_and(|s| s.location.is_some());
            if !keep {
                stats.removed += 1;
            }
            keep
        });

        if stats.created + stats.removed > 0 {
            log::debug!(
                "sensor markers synced: +{} ~{} -{}",
                stats.created,
                stats.updated,
                stats.removed
            );
        }
        stats
    }

    /// The shared glyph geometry.
    #[must_use]
    pub fn base_geometry(&self) -> &SurfaceGeometry {
        &self.base_geometry
    }

    /// Looks up one marker by sensor id.
    #[must_use]
    pub fn get(&self, sensor_id: &str) -> Option<&SensorMarker> {
        self.markers.get(sensor_id)
    }

    /// Number of live markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when no markers exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Disposes every marker. The shared glyph lives until the system drops.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Draw batches for the host renderer: the shared glyph at each marker.
    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem<'_>> {
        self.markers.values().map(|marker| DrawItem {
            geometry: &self.base_geometry,
            material: &marker.material,
            transform: marker.transform(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hometwin_core::sensor::SensorCategory;

    fn sensor(id: &str, kind: &str, location: Option<Vec3>, is_alert: bool) -> Sensor {
        Sensor {
            id: id.to_string(),
            kind: kind.to_string(),
            status: "idle".to_string(),
            is_alert,
            location,
            room_id: Some("room_a".to_string()),
            room_name: None,
        }
    }

    fn table(sensors: Vec<Sensor>) -> HashMap<String, Sensor> {
        sensors.into_iter().map(|s| (s.id.clone(), s)).collect()
    }

    #[test]
    fn test_marker_count_matches_eligible_sensors() {
        let tracker = ResourceTracker::new();
        let mut system = SensorMarkerSystem::new(Arc::clone(&tracker));

        let sensors = table(vec![
            sensor("s1", "PIR", Some(Vec3::new(1.5, 0.2, 0.0)), false),
            sensor("s2", "Smoke", Some(Vec3::new(0.0, 2.5, 0.0)), false),
            sensor("s3", "Hub", None, false), // no location: no marker
        ]);

        let stats = system.sync(&sensors, true, Vec3::ZERO);
        assert_eq!(stats.created, 2);
        assert_eq!(system.len(), 2);
        assert!(system.get("s3").is_none());

        // Zero sensors: zero markers.
        let stats = system.sync(&HashMap::new(), true, Vec3::ZERO);
        assert_eq!(stats.removed, 2);
        assert!(system.is_empty());
    }

    #[test]
    fn test_sync_is_idempotent() {
        let tracker = ResourceTracker::new();
        let mut system = SensorMarkerSystem::new(Arc::clone(&tracker));
        let sensors = table(vec![
            sensor("s1", "PIR", Some(Vec3::new(1.0, 1.0, 0.0)), false),
            sensor("s2", "DoorContact", Some(Vec3::new(3.0, 0.5, 0.0)), true),
        ]);

        system.sync(&sensors, true, Vec3::ZERO);
        let second = system.sync(&sensors, true, Vec3::ZERO);

        assert_eq!(second.created, 0);
        assert_eq!(second.removed, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(system.len(), 2);
    }

    #[test]
    fn test_visibility_gate_clears_markers() {
        let tracker = ResourceTracker::new();
        let mut system = SensorMarkerSystem::new(Arc::clone(&tracker));
        let sensors = table(vec![sensor("s1", "PIR", Some(Vec3::ONE), false)]);

        system.sync(&sensors, true, Vec3::ZERO);
        assert_eq!(system.len(), 1);

        system.sync(&sensors, false, Vec3::ZERO);
        assert!(system.is_empty());
        // Only the shared base geometry remains alive.
        assert_eq!(tracker.live_materials(), 0);

        system.sync(&sensors, true, Vec3::ZERO);
        assert_eq!(system.len(), 1);
    }

    #[test]
    fn test_positions_apply_offset_and_lift() {
        let tracker = ResourceTracker::new();
        let mut system = SensorMarkerSystem::new(Arc::clone(&tracker));
        let offset = Vec3::new(2.0, 1.5, 0.0);
        let sensors = table(vec![sensor("s1", "PIR", Some(Vec3::new(2.0, 1.5, 0.0)), false)]);

        system.sync(&sensors, true, offset);
        let marker = system.get("s1").unwrap();
        assert_eq!(marker.position, Vec3::new(0.0, frame::SURFACE_LIFT, 0.0));
    }

    #[test]
    fn test_alert_color_overrides_category() {
        let tracker = ResourceTracker::new();
        let mut system = SensorMarkerSystem::new(Arc::clone(&tracker));
        let mut sensors = table(vec![sensor("s1", "Temperature", Some(Vec3::ONE), false)]);

        system.sync(&sensors, true, Vec3::ZERO);
        assert_eq!(
            system.get("s1").unwrap().material.color,
            marker_color(SensorCategory::Temperature)
        );

        if let Some(s) = sensors.get_mut("s1") {
            s.is_alert = true;
        }
        system.sync(&sensors, true, Vec3::ZERO);
        assert_eq!(system.get("s1").unwrap().material.color, WARNING_COLOR);
    }

    #[test]
    fn test_removed_sensor_disposes_material() {
        let tracker = ResourceTracker::new();
        let mut system = SensorMarkerSystem::new(Arc::clone(&tracker));
        let mut sensors = table(vec![
            sensor("s1", "PIR", Some(Vec3::ONE), false),
            sensor("s2", "Smoke", Some(Vec3::ONE), false),
        ]);

        system.sync(&sensors, true, Vec3::ZERO);
        assert_eq!(tracker.live_materials(), 2);

        sensors.remove("s2");
        let stats = system.sync(&sensors, true, Vec3::ZERO);
        assert_eq!(stats.removed, 1);
        assert_eq!(tracker.live_materials(), 1);
    }

    #[test]
    fn test_location_loss_removes_marker() {
        let tracker = ResourceTracker::new();
        let mut system = SensorMarkerSystem::new(Arc::clone(&tracker));
        let mut sensors = table(vec![sensor("s1", "PIR", Some(Vec3::ONE), false)]);
        system.sync(&sensors, true, Vec3::ZERO);

        if let Some(s) = sensors.get_mut("s1") {
            s.location = None;
        }
        system.sync(&sensors, true, Vec3::ZERO);
        assert!(system.is_empty());
    }
}
