//! Recurring reservation rules

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::TimeSlot;
use super::{RoomId, RuleId, UserId};

/// How often a rule produces an occurrence inside its date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    /// Every calendar day in range.
    Daily,
    /// Days whose weekday is in the rule's weekday set (1=Mon..7=Sun).
    Weekly,
    /// The start date's day-of-month, clamped to shorter months.
    Monthly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "DAILY"),
            Frequency::Weekly => write!(f, "WEEKLY"),
            Frequency::Monthly => write!(f, "MONTHLY"),
        }
    }
}

/// Template for bookings materialized on a schedule.
///
/// The rule owns only a weak, id-based relationship to the bookings it
/// spawned; deleting a rule never retracts already-created bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    pub id: RuleId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub meeting_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inclusive date range `[start_date, end_date]`.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub slot: TimeSlot,
    pub frequency: Frequency,
    /// Weekdays for WEEKLY rules, encoded 1=Monday..7=Sunday.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_week: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees_count: Option<u32>,
    /// Number of bookings successfully materialized from this rule.
    #[serde(default)]
    pub bookings_created: u64,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_serialization() {
        assert_eq!(serde_json::to_string(&Frequency::Daily).unwrap(), "\"DAILY\"");
        let parsed: Frequency = serde_json::from_str("\"WEEKLY\"").unwrap();
        assert_eq!(parsed, Frequency::Weekly);
    }

    #[test]
    fn test_rule_roundtrip_with_weekdays() {
        let json = r#"{
            "id": 1, "userId": 7, "roomId": 2,
            "meetingTitle": "Weekly sync",
            "startDate": "2030-01-01", "endDate": "2030-03-01",
            "startTime": "10:00:00", "endTime": "11:00:00",
            "frequency": "WEEKLY",
            "daysOfWeek": [1, 3],
            "createdAt": 0
        }"#;
        let rule: RecurringRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.days_of_week, vec![1, 3]);
        assert_eq!(rule.bookings_created, 0);
    }
}
