//! The derived room directory.
//!
//! Rooms come from three places: the home configuration, the mesh metadata,
//! and sensors that reference a room nobody declared (bucketed under
//! [`UNKNOWN_ROOM_ID`]). The directory unions them by id, with configured
//! and mesh-authored rooms taking precedence over synthesized placeholders.

use std::collections::{HashMap, HashSet};

use crate::payload::RoomMeta;
use crate::sensor::Sensor;

/// Bucket id for sensors whose room is unknown.
pub const UNKNOWN_ROOM_ID: &str = "unknown";

/// One resolved room.
#[derive(Debug, Clone)]
pub struct RoomEntry {
    pub id: String,
    pub name: String,
    /// True when this entry only exists because a sensor referenced it.
    pub synthesized: bool,
}

/// Per-room aggregation over the live sensor table.
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub id: String,
    pub name: String,
    pub sensor_ids: Vec<String>,
    pub alert_count: usize,
}

/// Id-keyed union of configured, mesh-authored, and synthesized rooms.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, RoomEntry>,
}

impl RoomDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a configured room. Overrides any placeholder with the same id.
    pub fn insert_configured(&mut self, id: &str, name: &str) {
        self.rooms.insert(
            id.to_string(),
            RoomEntry { id: id.to_string(), name: name.to_string(), synthesized: false },
        );
    }

    /// Registers the rooms authored in mesh metadata.
    ///
    /// Mesh rooms override placeholders; a mesh room without a name keeps an
    /// already-known name, falling back to the id.
    pub fn merge_mesh_rooms(&mut self, rooms: &HashMap<String, RoomMeta>) {
        for (id, meta) in rooms {
            let name = meta
                .name
                .clone()
                .or_else(|| self.rooms.get(id).map(|r| r.name.clone()))
                .unwrap_or_else(|| id.clone());
            self.rooms
                .insert(id.clone(), RoomEntry { id: id.clone(), name, synthesized: false });
        }
    }

    /// Notes the room referenced by a sensor, synthesizing a placeholder for
    /// ids nothing else declared. Never overrides a real room.
    pub fn note_sensor_room(&mut self, sensor: &Sensor) {
        let id = sensor.room_id.as_deref().unwrap_or(UNKNOWN_ROOM_ID);
        if let Some(existing) = self.rooms.get_mut(id) {
            if existing.synthesized {
                if let Some(name) = &sensor.room_name {
                    existing.name.clone_from(name);
                }
            }
            return;
        }
        let name = sensor.room_name.clone().unwrap_or_else(|| id.to_string());
        self.rooms
            .insert(id.to_string(), RoomEntry { id: id.to_string(), name, synthesized: true });
    }

    /// Looks up a room by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RoomEntry> {
        self.rooms.get(id)
    }

    /// Number of known rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// True if no rooms are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Iterates over all rooms.
    pub fn iter(&self) -> impl Iterator<Item = &RoomEntry> {
        self.rooms.values()
    }

    /// Aggregates the sensor table per room (membership + alert counts).
    #[must_use]
    pub fn summaries<'a>(&self, sensors: impl Iterator<Item = &'a Sensor>) -> Vec<RoomSummary> {
        let mut summaries: HashMap<&str, RoomSummary> = self
            .rooms
            .values()
            .map(|room| {
                (
                    room.id.as_str(),
                    RoomSummary {
                        id: room.id.clone(),
                        name: room.name.clone(),
                        sensor_ids: Vec::new(),
                        alert_count: 0,
                    },
                )
            })
            .collect();

        for sensor in sensors {
            let room_id = sensor.room_id.as_deref().unwrap_or(UNKNOWN_ROOM_ID);
            if let Some(summary) = summaries.get_mut(room_id) {
                summary.sensor_ids.push(sensor.id.clone());
                if sensor.is_alert {
                    summary.alert_count += 1;
                }
            }
        }

        let mut out: Vec<RoomSummary> = summaries.into_values().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }
}

/// Computes the set of room ids with at least one alerting member sensor.
///
/// Recomputed on every sensor update; drives the overlay pulse animation.
#[must_use]
pub fn alert_rooms<'a>(sensors: impl Iterator<Item = &'a Sensor>) -> HashSet<String> {
    sensors
        .filter(|s| s.is_alert)
        .map(|s| s.room_id.clone().unwrap_or_else(|| UNKNOWN_ROOM_ID.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(id: &str, room_id: Option<&str>, is_alert: bool) -> Sensor {
        Sensor {
            id: id.to_string(),
            kind: "PIR".to_string(),
            status: "idle".to_string(),
            is_alert,
            location: None,
            room_id: room_id.map(str::to_string),
            room_name: None,
        }
    }

    #[test]
    fn test_alert_set() {
        let sensors = vec![
            sensor("s1", Some("r1"), true),
            sensor("s2", Some("r2"), false),
        ];
        let alerts = alert_rooms(sensors.iter());
        assert_eq!(alerts.len(), 1);
        assert!(alerts.contains("r1"));
    }

    #[test]
    fn test_orphan_sensor_goes_to_unknown_bucket() {
        let mut directory = RoomDirectory::new();
        let orphan = sensor("s1", None, true);
        directory.note_sensor_room(&orphan);

        assert!(directory.get(UNKNOWN_ROOM_ID).is_some());
        let alerts = alert_rooms([orphan].iter());
        assert!(alerts.contains(UNKNOWN_ROOM_ID));
    }

    #[test]
    fn test_configured_room_wins_over_placeholder() {
        let mut directory = RoomDirectory::new();
        directory.note_sensor_room(&sensor("s1", Some("r1"), false));
        assert!(directory.get("r1").unwrap().synthesized);

        directory.insert_configured("r1", "Bedroom");
        let entry = directory.get("r1").unwrap();
        assert!(!entry.synthesized);
        assert_eq!(entry.name, "Bedroom");

        // A later sensor mention must not demote the configured entry.
        directory.note_sensor_room(&sensor("s2", Some("r1"), false));
        assert!(!directory.get("r1").unwrap().synthesized);
    }

    #[test]
    fn test_summaries_aggregate_alerts() {
        let mut directory = RoomDirectory::new();
        directory.insert_configured("r1", "Bedroom");
        directory.insert_configured("r2", "Living Room");

        let sensors = vec![
            sensor("s1", Some("r1"), true),
            sensor("s2", Some("r1"), false),
            sensor("s3", Some("r2"), false),
        ];
        let summaries = directory.summaries(sensors.iter());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "r1");
        assert_eq!(summaries[0].sensor_ids.len(), 2);
        assert_eq!(summaries[0].alert_count, 1);
        assert_eq!(summaries[1].alert_count, 0);
    }
}
