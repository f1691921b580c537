//! Audit trail record types
//!
//! Audit entries are immutable records of every mutating action in the
//! engine. They are appended once and never updated or deleted.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Kind of mutating action recorded in the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    /// Covers both explicit deletes and owner cancellations.
    Delete,
    Approve,
    Reject,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
            AuditAction::Approve => write!(f, "APPROVE"),
            AuditAction::Reject => write!(f, "REJECT"),
        }
    }
}

/// Kind of entity an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Booking,
    RecurringRule,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Booking => write!(f, "BOOKING"),
            EntityKind::RecurringRule => write!(f, "RECURRING_RULE"),
        }
    }
}

/// One line of the append-only audit trail.
///
/// `id` is a monotonic sequence number; together with `timestamp` it gives
/// concurrent appends a total order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: u64,
    /// Unix timestamp of the append.
    pub timestamp: i64,
    /// User who performed the action.
    pub actor: UserId,
    pub action: AuditAction,
    pub entity_type: EntityKind,
    pub entity_id: u64,
}

impl AuditLogEntry {
    /// Serialize to a JSON line (for the JSONL sink).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_line_roundtrip() {
        let entry = AuditLogEntry {
            id: 42,
            timestamp: 1704067200,
            actor: 7,
            action: AuditAction::Approve,
            entity_type: EntityKind::Booking,
            entity_id: 13,
        };

        let line = entry.to_json_line().unwrap();
        assert!(line.contains("\"action\":\"APPROVE\""));
        assert!(line.contains("\"entityType\":\"BOOKING\""));

        let parsed = AuditLogEntry::from_json_line(&line).unwrap();
        assert_eq!(parsed.id, 42);
        assert_eq!(parsed.action, AuditAction::Approve);
        assert_eq!(parsed.entity_id, 13);
    }
}
