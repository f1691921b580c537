//! Booking lifecycle operations
//!
//! All mutations follow the same discipline: validate, take the narrowest
//! exclusive scope (the (room, date) bucket for admission, the booking row
//! for decisions), append the audit entry, and only then commit the state
//! change. An audit failure aborts the mutation.

use std::sync::atomic::Ordering;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::types::{
    AuditAction, Booking, BookingId, BookingStatus, EntityKind, RoomId, RuleId, TimeSlot, UserId,
};
use crate::utils::{current_timestamp, today};

use super::BookingEngine;

/// Parameters for admitting a new booking.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub meeting_title: String,
    pub description: Option<String>,
    pub attendees_count: Option<u32>,
    /// Set when a recurring rule materializes this booking.
    pub recurring_rule_id: Option<RuleId>,
}

impl BookingEngine {
    /// Admit a new booking in PENDING state.
    ///
    /// The overlap check and the insertion are atomic per (room, date):
    /// of two concurrent creates for conflicting slots exactly one wins.
    /// PENDING bookings already exclude conflicting PENDING requests, so
    /// approval never needs to re-check.
    pub fn create(&self, req: CreateBooking) -> EngineResult<Booking> {
        if !req.slot.is_valid() {
            return Err(EngineError::validation("end time must be after start time"));
        }
        if req.meeting_title.trim().is_empty() {
            return Err(EngineError::validation("meeting title is required"));
        }
        if req.date < today() {
            return Err(EngineError::validation("booking date must not be in the past"));
        }

        let capacity = self
            .rooms
            .get(&req.room_id)
            .map(|r| r.capacity)
            .ok_or(EngineError::RoomNotFound(req.room_id))?;
        if let Some(attendees) = req.attendees_count {
            if attendees > capacity {
                return Err(EngineError::validation(format!(
                    "attendee count {} exceeds room capacity {}",
                    attendees, capacity
                )));
            }
        }

        let id = self.next_booking_id.fetch_add(1, Ordering::SeqCst);

        self.index
            .reserve(req.room_id, req.date, req.slot, id)
            .map_err(|existing| EngineError::Conflict {
                room_id: req.room_id,
                date: req.date,
                existing,
            })?;

        // Commit the audit entry before the booking becomes visible; on
        // failure the reservation is rolled back.
        if let Err(e) = self
            .audit
            .append(req.user_id, AuditAction::Create, EntityKind::Booking, id)
        {
            self.index.release(req.room_id, req.date, id);
            return Err(e);
        }

        let booking = Booking {
            id,
            room_id: req.room_id,
            user_id: req.user_id,
            meeting_title: req.meeting_title,
            description: req.description,
            booking_date: req.date,
            slot: req.slot,
            attendees_count: req.attendees_count,
            status: BookingStatus::Pending,
            recurring_rule_id: req.recurring_rule_id,
            approved_by: None,
            approved_at: None,
            created_at: current_timestamp(),
        };
        self.bookings.insert(id, booking.clone());

        info!(
            booking_id = id,
            room_id = req.room_id,
            user_id = req.user_id,
            date = %req.date,
            slot = %req.slot,
            "booking created with status PENDING"
        );
        Ok(booking)
    }

    /// Approve or reject a PENDING booking.
    ///
    /// Holds the booking row for the whole compare-and-set, so concurrent
    /// double decisions resolve to exactly one winner; the loser observes a
    /// non-PENDING status and fails with `InvalidState`.
    pub fn decide(
        &self,
        booking_id: BookingId,
        approver_id: UserId,
        approve: bool,
    ) -> EngineResult<Booking> {
        let mut entry = self
            .bookings
            .get_mut(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;

        if entry.status != BookingStatus::Pending {
            return Err(EngineError::invalid_state(format!(
                "only PENDING bookings can be decided, booking {} is {}",
                booking_id, entry.status
            )));
        }

        let (next, action) = BookingStatus::decided(approve);
        self.audit
            .append(approver_id, action, EntityKind::Booking, booking_id)?;

        entry.status = next;
        entry.approved_by = Some(approver_id);
        entry.approved_at = Some(current_timestamp());

        if next == BookingStatus::Rejected {
            self.index
                .release(entry.room_id, entry.booking_date, booking_id);
        }

        info!(booking_id, approver_id, status = %next, "booking decided");
        Ok(entry.clone())
    }

    /// Cancel a PENDING or APPROVED booking. Owner-only; the slot is freed
    /// for future admissions immediately.
    pub fn cancel(&self, booking_id: BookingId, requester_id: UserId) -> EngineResult<()> {
        let mut entry = self
            .bookings
            .get_mut(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;

        if entry.user_id != requester_id {
            return Err(EngineError::forbidden(
                "only the booking owner can cancel it",
            ));
        }
        if !entry.status.is_active() {
            return Err(EngineError::invalid_state(format!(
                "booking {} is {} and cannot be cancelled",
                booking_id, entry.status
            )));
        }

        self.audit.append(
            requester_id,
            AuditAction::Delete,
            EntityKind::Booking,
            booking_id,
        )?;

        entry.status = BookingStatus::Cancelled;
        self.index
            .release(entry.room_id, entry.booking_date, booking_id);

        info!(booking_id, requester_id, "booking cancelled");
        Ok(())
    }

    pub fn get(&self, booking_id: BookingId) -> Option<Booking> {
        self.bookings.get(&booking_id).map(|b| b.clone())
    }

    /// Bookings owned by `user_id`, ordered by date then start time.
    pub fn list_for_user(&self, user_id: UserId) -> Vec<Booking> {
        let mut out: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.clone())
            .collect();
        sort_bookings(&mut out);
        out
    }

    /// All PENDING bookings, ordered by date then start time.
    pub fn list_pending(&self) -> Vec<Booking> {
        let mut out: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Pending)
            .map(|b| b.clone())
            .collect();
        sort_bookings(&mut out);
        out
    }

    /// All bookings regardless of status.
    pub fn list_all(&self) -> Vec<Booking> {
        let mut out: Vec<Booking> = self.bookings.iter().map(|b| b.clone()).collect();
        sort_bookings(&mut out);
        out
    }

    /// Bookings materialized from one rule (weak back-reference lookup).
    pub fn list_for_rule(&self, rule_id: RuleId) -> Vec<Booking> {
        let mut out: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.recurring_rule_id == Some(rule_id))
            .map(|b| b.clone())
            .collect();
        sort_bookings(&mut out);
        out
    }
}

fn sort_bookings(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        (a.booking_date, a.slot.start, a.id).cmp(&(b.booking_date, b.slot.start, b.id))
    });
}
