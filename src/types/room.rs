//! Room metadata
//!
//! Rooms are reference data for the engine: they are seeded at startup and
//! treated as immutable while bookings are evaluated against them. Room CRUD
//! lives in an external collaborator.

use serde::{Deserialize, Serialize};

use super::RoomId;

/// A bookable meeting room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            floor: None,
            amenities: Vec::new(),
        }
    }
}
