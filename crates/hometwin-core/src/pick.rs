//! Picking result type.

use glam::Vec3;

/// Result of a successful room pick.
#[derive(Debug, Clone)]
pub struct PickResult {
    /// Id of the room whose overlay was hit.
    pub room_id: String,

    /// World position of the hit point.
    pub world_position: Vec3,

    /// Ray parameter at the hit (distance along the pick ray).
    pub distance: f32,
}

impl PickResult {
    /// Creates a new pick result.
    pub fn new(room_id: impl Into<String>, world_position: Vec3, distance: f32) -> Self {
        Self { room_id: room_id.into(), world_position, distance }
    }
}
