//! Data types for the booking engine
//!
//! This module contains all the core data structures used throughout the
//! application.

mod audit;
mod booking;
mod room;
mod rule;

pub use audit::{AuditAction, AuditLogEntry, EntityKind};
pub use booking::{Booking, BookingStatus, TimeSlot};
pub use room::Room;
pub use rule::{Frequency, RecurringRule};

/// Identifier of a booking.
pub type BookingId = u64;
/// Identifier of a room.
pub type RoomId = u64;
/// Identifier of a user (users themselves live in the external auth service).
pub type UserId = u64;
/// Identifier of a recurring rule.
pub type RuleId = u64;
