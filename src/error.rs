//! Error taxonomy for the booking engine
//!
//! Validation, conflict and permission failures are surfaced to the caller
//! and never retried; conflicts carry the already-reserved window so the
//! caller can show what it collided with.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{BookingId, RoomId, RuleId, TimeSlot};

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("room {room_id} is already booked {existing} on {date}")]
    Conflict {
        room_id: RoomId,
        date: NaiveDate,
        /// The window of the booking that already holds the slot.
        existing: TimeSlot,
    },

    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error("recurring rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A mutation and its audit entry commit together or not at all, so a
    /// failed audit append aborts the enclosing operation.
    #[error("audit append failed: {0}")]
    Audit(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        EngineError::Forbidden(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        EngineError::InvalidState(msg.into())
    }

    /// Whether materialization records this error as a skipped occurrence
    /// rather than a failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Conflict { .. })
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Audit(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Audit(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_conflict_message_names_the_window() {
        let err = EngineError::Conflict {
            room_id: 3,
            date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            existing: TimeSlot::new(
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            ),
        };
        let msg = err.to_string();
        assert!(msg.contains("room 3"));
        assert!(msg.contains("10:00-11:00"));
        assert!(msg.contains("2030-05-01"));
    }
}
