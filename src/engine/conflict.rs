//! Per-(room, date) interval index
//!
//! The index holds the time slots of every active (PENDING or APPROVED)
//! booking, bucketed by room and calendar day. Admission is check-then-insert
//! performed while holding the bucket's map entry, so no two conflicting
//! reservations can both be admitted; buckets for different rooms or days are
//! independent and proceed in parallel. Empty buckets are removed so the map
//! only tracks the active room/date set.

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::types::{BookingId, RoomId, TimeSlot};

type SlotKey = (RoomId, NaiveDate);

/// One admitted reservation inside a bucket.
#[derive(Debug, Clone, Copy)]
struct Hold {
    booking_id: BookingId,
    slot: TimeSlot,
}

/// Interval index answering "does this slot overlap an active booking?".
pub struct ConflictIndex {
    buckets: DashMap<SlotKey, Vec<Hold>>,
}

impl ConflictIndex {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Non-binding probe. Returns the window of the first overlapping hold.
    pub fn would_conflict(&self, room: RoomId, date: NaiveDate, slot: TimeSlot) -> Option<TimeSlot> {
        self.buckets.get(&(room, date)).and_then(|holds| {
            holds
                .iter()
                .find(|h| h.slot.overlaps(&slot))
                .map(|h| h.slot)
        })
    }

    /// Atomically admit `slot` for `booking_id`, or return the window it
    /// collides with. The overlap check and the insert happen under the same
    /// bucket entry, so concurrent reserves on one (room, date) serialize.
    pub fn reserve(
        &self,
        room: RoomId,
        date: NaiveDate,
        slot: TimeSlot,
        booking_id: BookingId,
    ) -> Result<(), TimeSlot> {
        let mut holds = self.buckets.entry((room, date)).or_default();
        if let Some(hit) = holds.iter().find(|h| h.slot.overlaps(&slot)) {
            return Err(hit.slot);
        }
        holds.push(Hold { booking_id, slot });
        Ok(())
    }

    /// Release the hold of `booking_id` (cancel, reject, or rollback).
    /// Returns whether a hold was actually removed.
    pub fn release(&self, room: RoomId, date: NaiveDate, booking_id: BookingId) -> bool {
        let key = (room, date);
        let removed = match self.buckets.get_mut(&key) {
            Some(mut holds) => {
                let before = holds.len();
                holds.retain(|h| h.booking_id != booking_id);
                holds.len() != before
            }
            None => false,
        };
        // Drop the bucket once idle; re-check emptiness under the entry in
        // case another reserve slipped in between.
        self.buckets.remove_if(&key, |_, holds| holds.is_empty());
        removed
    }

    /// Number of non-empty (room, date) buckets currently tracked.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for ConflictIndex {
    fn default() -> Self {
        Self::new()
    }
}
