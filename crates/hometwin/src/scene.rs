//! The scene runtime: wires data updates to the structure systems.
//!
//! The host owns the window, the GPU device, and the actual draw loop; the
//! scene owns everything between the backend's data and the draw call. All
//! mutation enters through the explicit `apply_*` entry points or the
//! per-frame [`Scene::advance`]; there are no hidden subscriptions.
//!
//! Update rules (who rebuilds what):
//! - mesh update   → layers + overlays rebuilt, markers re-synced, camera reframed
//! - sensor update → sensor table patched, markers diffed, alert set recomputed
//! - visibility    → materials and camera mode mutated in place, no rebuild
//!
//! Teardown is `Drop`: every geometry and material the scene created is
//! released when the scene goes away, verified against the resource tracker.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use glam::{Vec2, Vec3};

use hometwin_core::payload::MeshPayload;
use hometwin_core::pick::PickResult;
use hometwin_core::room::{self, RoomDirectory, RoomSummary};
use hometwin_core::sensor::{HomeConfig, SecurityStatusEvent, Sensor, SensorUpdate};
use hometwin_core::visibility::VisibilityConfig;
use hometwin_render::geometry::ResourceTracker;
use hometwin_render::{CameraRig, DrawItem};
use hometwin_structures::{LayeredModel, RoomOverlaySystem, SensorMarkerSystem};

use crate::picking;

/// Scene lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// Initialized, no mesh loaded yet.
    Ready,
    /// A mesh payload is active.
    MeshLoaded,
}

/// Event raised toward the hosting UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// A room overlay was picked.
    RoomSelected(String),
}

/// The live digital-twin scene.
pub struct Scene {
    tracker: Arc<ResourceTracker>,
    layers: LayeredModel,
    overlays: RoomOverlaySystem,
    markers: SensorMarkerSystem,
    camera: CameraRig,
    visibility: VisibilityConfig,

    sensors: HashMap<String, Sensor>,
    rooms: RoomDirectory,
    alert_rooms: HashSet<String>,
    selected_room: Option<String>,
    world_offset: Vec3,
    security_status: Option<String>,
    active_mesh: Option<String>,

    last_tick: Option<f64>,
    events: VecDeque<SceneEvent>,
}

impl Scene {
    /// Creates an empty scene with default visibility.
    #[must_use]
    pub fn new() -> Self {
        Self::with_visibility(VisibilityConfig::default())
    }

    /// Creates an empty scene with the given visibility configuration.
    #[must_use]
    pub fn with_visibility(visibility: VisibilityConfig) -> Self {
        let tracker = ResourceTracker::new();
        Self {
            layers: LayeredModel::new(Arc::clone(&tracker)),
            overlays: RoomOverlaySystem::new(Arc::clone(&tracker)),
            markers: SensorMarkerSystem::new(Arc::clone(&tracker)),
            camera: CameraRig::default(),
            visibility: visibility.sanitized(),
            sensors: HashMap::new(),
            rooms: RoomDirectory::new(),
            alert_rooms: HashSet::new(),
            selected_room: None,
            world_offset: Vec3::ZERO,
            security_status: None,
            active_mesh: None,
            last_tick: None,
            events: VecDeque::new(),
            tracker,
        }
    }

    // === Data entry points (called by the host when its state changes) ===

    /// Seeds the sensor table and room directory from a home-config snapshot.
    pub fn apply_home_config(&mut self, config: &HomeConfig) {
        for room in &config.rooms {
            self.rooms.insert_configured(&room.id, &room.name);
        }
        for sensor in config.sensors() {
            self.rooms.note_sensor_room(&sensor);
            self.sensors.insert(sensor.id.clone(), sensor);
        }
        if let Some(status) = &config.security_status {
            self.security_status = Some(status.clone());
        }

        self.recompute_alerts();
        self.sync_markers();
        log::info!(
            "home config applied: {} room(s), {} sensor(s)",
            config.rooms.len(),
            self.sensors.len()
        );
    }

    /// Activates a mesh payload: disposes everything derived from the
    /// previous mesh, rebuilds layers and overlays, re-syncs markers against
    /// the new world offset, and reframes the camera.
    pub fn apply_mesh_update(&mut self, payload: &MeshPayload) {
        self.world_offset = payload.data.metadata.world_offset.to_vec3();

        self.layers.rebuild(&payload.data, &self.visibility);
        self.overlays.rebuild(&payload.data.metadata.rooms, self.world_offset);
        self.rooms.merge_mesh_rooms(&payload.data.metadata.rooms);
        self.sync_markers();

        if let Some((min, max)) = self.layers.bounds() {
            self.camera.fit_to_bounds(min, max);
        }

        self.active_mesh = Some(payload.mesh_id.clone());
        log::info!(
            "mesh '{}' activated: {} layer mesh(es), {} overlay(s)",
            payload.mesh_id,
            self.layers.len(),
            self.overlays.len()
        );
    }

    /// Applies a partial sensor patch. Unknown sensor ids are inserted.
    /// Markers are diffed and the alert set recomputed; the camera is never
    /// touched.
    pub fn apply_sensor_update(&mut self, update: &SensorUpdate) {
        match self.sensors.get_mut(&update.sensor_id) {
            Some(sensor) => sensor.apply_update(update),
            None => {
                self.sensors.insert(update.sensor_id.clone(), Sensor::from_update(update));
            }
        }
        if let Some(sensor) = self.sensors.get(&update.sensor_id) {
            self.rooms.note_sensor_room(sensor);
        }

        self.recompute_alerts();
        self.sync_markers();
    }

    /// Stores the backend's overall security status. Informational; the
    /// geometry pipeline does not consume it.
    pub fn apply_security_status(&mut self, event: &SecurityStatusEvent) {
        self.security_status = Some(event.status.clone());
    }

    /// Applies a visibility configuration in place: material opacity and
    /// flags, marker gating, wireframe, camera mode. No geometry rebuild.
    pub fn apply_visibility_update(&mut self, visibility: VisibilityConfig) {
        self.visibility = visibility.sanitized();
        self.layers.apply_visibility(&self.visibility);
        self.sync_markers();
        self.camera.set_mode(self.visibility.camera_mode);
    }

    /// Programmatically selects a room (same highlight path as a pick).
    pub fn select_room(&mut self, room_id: Option<&str>) {
        self.selected_room = room_id.map(str::to_string);
    }

    // === Per-frame ===

    /// Advances one frame at the given monotonic time (seconds).
    ///
    /// Ticks the active camera controller and drives the overlay highlight
    /// animation from the alert set as of the latest sensor update.
    pub fn advance(&mut self, now_seconds: f64) {
        let dt = match self.last_tick {
            Some(last) => (now_seconds - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_tick = Some(now_seconds);

        self.camera.advance(dt);
        self.overlays.update_animation(now_seconds, &self.alert_rooms, self.selected_room.as_deref());
    }

    /// Resolves a pointer-down at surface-local pixel coordinates to a room.
    ///
    /// Casts against overlay meshes only — picking is room-grained. The
    /// nearest hit selects the room and raises [`SceneEvent::RoomSelected`];
    /// a miss does nothing.
    pub fn pick_at(&mut self, pos: Vec2, surface_width: f32, surface_height: f32) -> Option<PickResult> {
        let (origin, dir) = picking::screen_ray(pos, surface_width, surface_height, &self.camera)?;

        let mut best: Option<PickResult> = None;
        for (room_id, geometry) in self.overlays.pick_targets() {
            for triangle in 0..geometry.triangle_count() {
                let (Some(v0), Some(v1), Some(v2)) = (
                    geometry.triangle_vertex(triangle, 0),
                    geometry.triangle_vertex(triangle, 1),
                    geometry.triangle_vertex(triangle, 2),
                ) else {
                    continue;
                };
                if let Some(t) = picking::ray_intersect_triangle(origin, dir, v0, v1, v2) {
                    if best.as_ref().is_none_or(|b| t < b.distance) {
                        best = Some(PickResult::new(room_id, origin + dir * t, t));
                    }
                }
            }
        }

        if let Some(result) = &best {
            self.selected_room = Some(result.room_id.clone());
            self.events.push_back(SceneEvent::RoomSelected(result.room_id.clone()));
        }
        best
    }

    /// Drains pending events for the hosting UI.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain(..).collect()
    }

    /// Draw batches for this frame, in draw order: solid layers, then
    /// markers, then translucent overlays.
    pub fn draw_items(&self) -> Vec<DrawItem<'_>> {
        self.layers
            .draw_items()
            .chain(self.markers.draw_items())
            .chain(self.overlays.draw_items())
            .collect()
    }

    // === Accessors ===

    /// The current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ScenePhase {
        if self.active_mesh.is_some() {
            ScenePhase::MeshLoaded
        } else {
            ScenePhase::Ready
        }
    }

    /// Id of the active mesh payload, if any.
    #[must_use]
    pub fn active_mesh(&self) -> Option<&str> {
        self.active_mesh.as_deref()
    }

    /// The camera rig (mutable, for host input forwarding).
    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    /// The camera rig.
    #[must_use]
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// The active visibility configuration.
    #[must_use]
    pub fn visibility(&self) -> &VisibilityConfig {
        &self.visibility
    }

    /// The live sensor table.
    #[must_use]
    pub fn sensors(&self) -> &HashMap<String, Sensor> {
        &self.sensors
    }

    /// Per-room aggregation (membership, alert counts) for list views.
    #[must_use]
    pub fn room_summaries(&self) -> Vec<RoomSummary> {
        self.rooms.summaries(self.sensors.values())
    }

    /// Room ids currently alerting.
    #[must_use]
    pub fn alert_rooms(&self) -> &HashSet<String> {
        &self.alert_rooms
    }

    /// The selected room id, if any.
    #[must_use]
    pub fn selected_room(&self) -> Option<&str> {
        self.selected_room.as_deref()
    }

    /// Last security status pushed by the backend.
    #[must_use]
    pub fn security_status(&self) -> Option<&str> {
        self.security_status.as_deref()
    }

    /// The layered model (layer meshes of the active payload).
    #[must_use]
    pub fn layers(&self) -> &LayeredModel {
        &self.layers
    }

    /// The overlay system.
    #[must_use]
    pub fn overlays(&self) -> &RoomOverlaySystem {
        &self.overlays
    }

    /// The marker system.
    #[must_use]
    pub fn markers(&self) -> &SensorMarkerSystem {
        &self.markers
    }

    /// The resource tracker shared by everything this scene owns.
    #[must_use]
    pub fn resources(&self) -> &Arc<ResourceTracker> {
        &self.tracker
    }

    // === Internals ===

    fn recompute_alerts(&mut self) {
        self.alert_rooms = room::alert_rooms(self.sensors.values());
    }

    fn sync_markers(&mut self) {
        self.markers.sync(&self.sensors, self.visibility.sensors, self.world_offset);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        // Release in reverse order of acquisition: markers, overlays, layers.
        // The field drops that follow find everything already empty.
        self.markers.clear();
        self.overlays.clear();
        self.layers.clear();
    }
}
