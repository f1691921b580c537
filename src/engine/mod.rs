//! The booking engine
//!
//! `BookingEngine` owns the booking store, the room registry and the
//! per-(room, date) conflict index, and writes every mutation to the audit
//! trail. The recurring side (`RecurringRuleEngine`) layers rule storage and
//! idempotent materialization on top of it.

mod analytics;
mod conflict;
mod lifecycle;
mod recurrence;
mod recurring;

pub use analytics::{AnalyticsSummary, RoomUtilization};
pub use conflict::ConflictIndex;
pub use lifecycle::CreateBooking;
pub use recurrence::{occurrences, occurrences_between, Occurrences};
pub use recurring::{
    CreateRule, MaterializeOutcome, OccurrenceError, ProcessOutcome, RecurringRuleEngine,
};

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use dashmap::DashMap;

use crate::audit::AuditTrail;
use crate::types::{Booking, BookingId, Room, RoomId};

/// Booking lifecycle engine: state store, conflict admission, audit.
pub struct BookingEngine {
    rooms: DashMap<RoomId, Room>,
    bookings: DashMap<BookingId, Booking>,
    index: ConflictIndex,
    audit: Arc<AuditTrail>,
    next_booking_id: AtomicU64,
}

impl BookingEngine {
    pub fn new(audit: Arc<AuditTrail>) -> Self {
        Self {
            rooms: DashMap::new(),
            bookings: DashMap::new(),
            index: ConflictIndex::new(),
            audit,
            next_booking_id: AtomicU64::new(1),
        }
    }

    /// Register a room. Rooms are reference data seeded at startup; the
    /// engine never mutates them afterwards.
    pub fn add_room(&self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    pub fn room(&self, room_id: RoomId) -> Option<Room> {
        self.rooms.get(&room_id).map(|r| r.clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The shared audit trail (also written to by the recurring engine).
    pub fn audit(&self) -> &Arc<AuditTrail> {
        &self.audit
    }
}
