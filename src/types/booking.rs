//! Booking types: time slots, the status machine and the booking record

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::audit::AuditAction;
use super::{BookingId, RoomId, RuleId, UserId};

/// Half-open time interval `[start, end)` on a single day.
///
/// Touching slots (one ends exactly when the other starts) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "startTime")]
    pub start: NaiveTime,
    #[serde(rename = "endTime")]
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// A slot is well-formed iff it is non-empty.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Overlap test for half-open intervals: `[a,b)` and `[c,d)` overlap
    /// iff `a < d && c < b`.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Lifecycle state of a booking.
///
/// PENDING is the initial state. APPROVED/REJECTED are admin decisions and
/// REJECTED is terminal; PENDING or APPROVED can be CANCELLED by the owner,
/// which is also terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// Active bookings hold their time slot in the conflict index.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }

    /// Resolve an admin decision on a PENDING booking into the next state
    /// and the audit action that must be recorded with it.
    pub fn decided(approve: bool) -> (Self, AuditAction) {
        if approve {
            (BookingStatus::Approved, AuditAction::Approve)
        } else {
            (BookingStatus::Rejected, AuditAction::Reject)
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "PENDING"),
            BookingStatus::Approved => write!(f, "APPROVED"),
            BookingStatus::Rejected => write!(f, "REJECTED"),
            BookingStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A single reservation of a room for a time slot on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub meeting_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub booking_date: NaiveDate,
    #[serde(flatten)]
    pub slot: TimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees_count: Option<u32>,
    pub status: BookingStatus,
    /// Back-reference to the rule that materialized this booking, if any.
    /// Weak by design: deleting the rule never touches the booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_rule_id: Option<RuleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<UserId>,
    /// Unix timestamp of the approve/reject decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<i64>,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_touching_slots_do_not_overlap() {
        let a = TimeSlot::new(t(10, 0), t(11, 0));
        let b = TimeSlot::new(t(11, 0), t(12, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_identical_slots_overlap() {
        let a = TimeSlot::new(t(10, 0), t(11, 0));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_partial_and_contained_overlap() {
        let a = TimeSlot::new(t(10, 0), t(12, 0));
        let b = TimeSlot::new(t(11, 0), t(13, 0));
        let c = TimeSlot::new(t(10, 30), t(11, 30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_empty_slot_is_invalid() {
        assert!(!TimeSlot::new(t(10, 0), t(10, 0)).is_valid());
        assert!(!TimeSlot::new(t(11, 0), t(10, 0)).is_valid());
        assert!(TimeSlot::new(t(10, 0), t(10, 1)).is_valid());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BookingStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let parsed: BookingStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, BookingStatus::Cancelled);
    }

    #[test]
    fn test_decided_maps_to_state_and_audit_action() {
        assert_eq!(
            BookingStatus::decided(true),
            (BookingStatus::Approved, AuditAction::Approve)
        );
        assert_eq!(
            BookingStatus::decided(false),
            (BookingStatus::Rejected, AuditAction::Reject)
        );
    }

    #[test]
    fn test_booking_serializes_flat_slot() {
        let booking = Booking {
            id: 1,
            room_id: 2,
            user_id: 3,
            meeting_title: "Standup".to_string(),
            description: None,
            booking_date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
            slot: TimeSlot::new(t(9, 0), t(9, 30)),
            attendees_count: Some(5),
            status: BookingStatus::Pending,
            recurring_rule_id: None,
            approved_by: None,
            approved_at: None,
            created_at: 0,
        };
        let json = serde_json::to_string(&booking).unwrap();
        assert!(json.contains("\"startTime\":\"09:00:00\""));
        assert!(json.contains("\"endTime\":\"09:30:00\""));
        assert!(json.contains("\"status\":\"PENDING\""));
        assert!(!json.contains("description"));
    }
}
