//! Sensor state and the backend event formats that mutate it.
//!
//! A [`Sensor`] is identified by its id; every other field may change on
//! update. Updates arrive as partial patches ([`SensorUpdate`]) merged onto
//! the existing record, with unspecified fields retained. Sensors without a
//! usable location are kept in state but never produce a 3D marker.

use glam::Vec3;
use serde::Deserialize;

use crate::error::Result;

/// Live state of one sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    /// Unique sensor id.
    pub id: String,
    /// Sensor type string, e.g. `PIR`, `DoorContact`, `Smoke`, `Temperature`.
    pub kind: String,
    /// Free-form display status, e.g. `open` or `24.5°C`.
    pub status: String,
    /// Whether the current status is an alert condition.
    pub is_alert: bool,
    /// Position in backend coordinates, if the sensor is placed.
    pub location: Option<Vec3>,
    /// Id of the room this sensor belongs to, if known.
    pub room_id: Option<String>,
    /// Display name of that room, if known.
    pub room_name: Option<String>,
}

impl Sensor {
    /// Builds a sensor from its home-config entry.
    #[must_use]
    pub fn from_config(config: &SensorConfig, room_id: &str, room_name: &str) -> Self {
        Self {
            id: config.id.clone(),
            kind: config.kind.clone(),
            status: config.status.clone().unwrap_or_else(|| "unknown".to_string()),
            is_alert: config.is_alert,
            location: parse_location(&config.location),
            room_id: Some(room_id.to_string()),
            room_name: Some(room_name.to_string()),
        }
    }

    /// Builds a sensor from the first update event that mentions it.
    #[must_use]
    pub fn from_update(update: &SensorUpdate) -> Self {
        let mut sensor = Self {
            id: update.sensor_id.clone(),
            kind: String::new(),
            status: "unknown".to_string(),
            is_alert: false,
            location: None,
            room_id: None,
            room_name: None,
        };
        sensor.apply_update(update);
        sensor
    }

    /// Merges a partial update onto this record. Fields absent from the
    /// patch keep their current value.
    pub fn apply_update(&mut self, update: &SensorUpdate) {
        if let Some(kind) = &update.kind {
            self.kind.clone_from(kind);
        }
        if let Some(status) = &update.new_status {
            self.status.clone_from(status);
        }
        self.is_alert = update.is_alert;
        if let Some(location) = &update.location {
            self.location = parse_location(location);
        }
        if let Some(room_id) = &update.room_id {
            self.room_id = Some(room_id.clone());
        }
        if let Some(room_name) = &update.room_name {
            self.room_name = Some(room_name.clone());
        }
    }

    /// The category used for marker coloring.
    #[must_use]
    pub fn category(&self) -> SensorCategory {
        SensorCategory::classify(&self.kind)
    }
}

/// Interprets a backend location list. Two components are a plan position at
/// ground height; fewer than two is "not placed".
#[must_use]
pub fn parse_location(raw: &[f32]) -> Option<Vec3> {
    match raw {
        [x, y] => Some(Vec3::new(*x, *y, 0.0)),
        [x, y, z, ..] => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}

/// Marker color category, matched against the sensor type string.
///
/// The keyword list is ordered; the first match wins, anything else falls
/// into [`SensorCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorCategory {
    Motion,
    Door,
    Smoke,
    Temperature,
    Other,
}

impl SensorCategory {
    const KEYWORDS: [(&'static [&'static str], SensorCategory); 4] = [
        (&["motion", "pir"], SensorCategory::Motion),
        (&["door", "contact"], SensorCategory::Door),
        (&["smoke"], SensorCategory::Smoke),
        (&["temp"], SensorCategory::Temperature),
    ];

    /// Classifies a sensor type string.
    #[must_use]
    pub fn classify(kind: &str) -> Self {
        let lowered = kind.to_ascii_lowercase();
        for (keywords, category) in Self::KEYWORDS {
            if keywords.iter().any(|k| lowered.contains(k)) {
                return category;
            }
        }
        SensorCategory::Other
    }
}

/// Partial sensor patch pushed over the event channel.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorUpdate {
    pub sensor_id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub new_status: Option<String>,
    pub is_alert: bool,
    #[serde(default)]
    pub location: Option<Vec<f32>>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub room_name: Option<String>,
}

impl SensorUpdate {
    /// Decodes an update from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Overall security level pushed by the backend. Informational only; the
/// geometry pipeline never consumes it.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityStatusEvent {
    pub status: String,
}

/// Home configuration snapshot: the room/sensor inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct HomeConfig {
    pub home_id: String,
    #[serde(default)]
    pub security_status: Option<String>,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

impl HomeConfig {
    /// Decodes a snapshot from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Flattens the snapshot into sensor records.
    #[must_use]
    pub fn sensors(&self) -> Vec<Sensor> {
        self.rooms
            .iter()
            .flat_map(|room| {
                room.sensors
                    .iter()
                    .map(|s| Sensor::from_config(s, &room.id, &room.name))
            })
            .collect()
    }
}

/// One configured room.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

/// One configured sensor.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Vec<f32>,
    #[serde(default)]
    pub is_alert: bool,
}
