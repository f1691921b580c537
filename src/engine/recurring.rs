//! Recurring rule engine
//!
//! Owns the rule store and turns occurrence dates into real bookings through
//! the lifecycle engine. Materialization is idempotent: each (rule, date)
//! pair is keyed once, so re-running a pass creates nothing new. A conflict
//! on one date is recorded as skipped and never aborts the rest; repeated
//! hard failures halt the pass early to avoid retry storms against a
//! misconfigured rule.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::types::{
    AuditAction, BookingId, EntityKind, Frequency, RecurringRule, RoomId, RuleId, TimeSlot, UserId,
};
use crate::utils::{current_timestamp, today};

use super::lifecycle::CreateBooking;
use super::recurrence::occurrences_between;
use super::BookingEngine;

/// Parameters for creating a recurring rule.
#[derive(Debug, Clone)]
pub struct CreateRule {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub meeting_title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slot: TimeSlot,
    pub frequency: Frequency,
    pub days_of_week: Vec<u8>,
    pub attendees_count: Option<u32>,
}

/// One occurrence that failed for a reason other than a slot conflict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceError {
    pub date: NaiveDate,
    pub reason: String,
}

/// Partial-success report of one materialization pass over one rule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializeOutcome {
    pub rule_id: RuleId,
    pub created: usize,
    /// Occurrences that collided with an existing booking.
    pub skipped: usize,
    pub errors: Vec<OccurrenceError>,
    /// True when the pass stopped early after too many consecutive errors.
    pub halted: bool,
}

/// Aggregate report of a scheduler tick or a process-now request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutcome {
    pub rules_processed: usize,
    pub created: usize,
    pub skipped: usize,
    pub outcomes: Vec<MaterializeOutcome>,
}

/// Orchestrates rule storage and idempotent materialization.
pub struct RecurringRuleEngine {
    engine: Arc<BookingEngine>,
    rules: DashMap<RuleId, RecurringRule>,
    /// Idempotency keys: (rule, date) pairs already turned into bookings.
    materialized: DashMap<(RuleId, NaiveDate), BookingId>,
    /// Rules with a materialization pass currently running.
    in_flight: DashMap<RuleId, ()>,
    next_rule_id: AtomicU64,
    /// How far ahead of today a pass materializes, in days.
    horizon_days: i64,
    /// Consecutive non-conflict errors tolerated before halting a pass.
    max_consecutive_errors: usize,
}

impl RecurringRuleEngine {
    pub fn new(engine: Arc<BookingEngine>, horizon_days: i64, max_consecutive_errors: usize) -> Self {
        Self {
            engine,
            rules: DashMap::new(),
            materialized: DashMap::new(),
            in_flight: DashMap::new(),
            next_rule_id: AtomicU64::new(1),
            horizon_days,
            max_consecutive_errors,
        }
    }

    /// Create a rule. The rule itself books nothing; occurrences are
    /// materialized by the scheduler or a process-now request.
    pub fn create_rule(&self, req: CreateRule) -> EngineResult<RecurringRule> {
        if !req.slot.is_valid() {
            return Err(EngineError::validation("end time must be after start time"));
        }
        if req.meeting_title.trim().is_empty() {
            return Err(EngineError::validation("meeting title is required"));
        }
        if req.end_date < req.start_date {
            return Err(EngineError::validation(
                "end date must not be before start date",
            ));
        }
        let mut days_of_week = req.days_of_week;
        match req.frequency {
            Frequency::Weekly => {
                if days_of_week.is_empty() {
                    return Err(EngineError::validation(
                        "days of week are required for WEEKLY frequency",
                    ));
                }
                if days_of_week.iter().any(|d| !(1..=7).contains(d)) {
                    return Err(EngineError::validation(
                        "days of week must be between 1 (Monday) and 7 (Sunday)",
                    ));
                }
                days_of_week.sort_unstable();
                days_of_week.dedup();
            }
            _ => days_of_week.clear(),
        }
        if self.engine.room(req.room_id).is_none() {
            return Err(EngineError::RoomNotFound(req.room_id));
        }

        let id = self.next_rule_id.fetch_add(1, Ordering::SeqCst);
        self.engine.audit().append(
            req.user_id,
            AuditAction::Create,
            EntityKind::RecurringRule,
            id,
        )?;

        let rule = RecurringRule {
            id,
            user_id: req.user_id,
            room_id: req.room_id,
            meeting_title: req.meeting_title,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            slot: req.slot,
            frequency: req.frequency,
            days_of_week,
            attendees_count: req.attendees_count,
            bookings_created: 0,
            created_at: current_timestamp(),
        };
        self.rules.insert(id, rule.clone());

        info!(rule_id = id, user_id = rule.user_id, frequency = %rule.frequency, "recurring rule created");
        Ok(rule)
    }

    /// Delete a rule. Owner-only. Bookings already materialized from it are
    /// left untouched; only future materialization stops.
    pub fn delete_rule(&self, rule_id: RuleId, owner_id: UserId) -> EngineResult<()> {
        {
            let rule = self
                .rules
                .get(&rule_id)
                .ok_or(EngineError::RuleNotFound(rule_id))?;
            if rule.user_id != owner_id {
                return Err(EngineError::forbidden(
                    "only the rule owner can delete it",
                ));
            }
        }

        self.engine.audit().append(
            owner_id,
            AuditAction::Delete,
            EntityKind::RecurringRule,
            rule_id,
        )?;

        self.rules.remove(&rule_id);
        self.materialized.retain(|(rid, _), _| *rid != rule_id);

        info!(rule_id, owner_id, "recurring rule deleted");
        Ok(())
    }

    pub fn get(&self, rule_id: RuleId) -> Option<RecurringRule> {
        self.rules.get(&rule_id).map(|r| r.clone())
    }

    /// Rules owned by `user_id`, ordered by id.
    pub fn list_for_user(&self, user_id: UserId) -> Vec<RecurringRule> {
        let mut out: Vec<RecurringRule> = self
            .rules
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.clone())
            .collect();
        out.sort_by_key(|r| r.id);
        out
    }

    /// Materialize one rule over `[max(start, today), min(end, today + horizon)]`.
    ///
    /// Safe to re-run: dates already keyed are not processed again. Fails
    /// with `InvalidState` when a pass for the same rule is already running
    /// (overlapping scheduler tick and manual trigger).
    pub fn materialize(&self, rule_id: RuleId) -> EngineResult<MaterializeOutcome> {
        let rule = self
            .rules
            .get(&rule_id)
            .map(|r| r.clone())
            .ok_or(EngineError::RuleNotFound(rule_id))?;

        let _guard = match self.in_flight.entry(rule_id) {
            Entry::Occupied(_) => {
                return Err(EngineError::invalid_state(format!(
                    "materialization already in progress for rule {}",
                    rule_id
                )));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(());
                InFlightGuard {
                    set: &self.in_flight,
                    rule_id,
                }
            }
        };

        let from = today();
        let to = from + Duration::days(self.horizon_days);

        let mut outcome = MaterializeOutcome {
            rule_id,
            created: 0,
            skipped: 0,
            errors: Vec::new(),
            halted: false,
        };
        let mut consecutive_errors = 0usize;

        for date in occurrences_between(&rule, from, to) {
            if self.materialized.contains_key(&(rule_id, date)) {
                continue;
            }

            let request = CreateBooking {
                room_id: rule.room_id,
                user_id: rule.user_id,
                date,
                slot: rule.slot,
                meeting_title: rule.meeting_title.clone(),
                description: rule.description.clone(),
                attendees_count: rule.attendees_count,
                recurring_rule_id: Some(rule_id),
            };

            match self.engine.create(request) {
                Ok(booking) => {
                    self.materialized.insert((rule_id, date), booking.id);
                    outcome.created += 1;
                    consecutive_errors = 0;
                }
                Err(e) if e.is_conflict() => {
                    warn!(rule_id, date = %date, "occurrence conflicts with an existing booking, skipping");
                    outcome.skipped += 1;
                }
                Err(e) => {
                    outcome.errors.push(OccurrenceError {
                        date,
                        reason: e.to_string(),
                    });
                    consecutive_errors += 1;
                    if consecutive_errors >= self.max_consecutive_errors {
                        warn!(
                            rule_id,
                            errors = consecutive_errors,
                            "halting materialization after repeated errors"
                        );
                        outcome.halted = true;
                        break;
                    }
                }
            }
        }

        if outcome.created > 0 {
            if let Some(mut rule) = self.rules.get_mut(&rule_id) {
                rule.bookings_created += outcome.created as u64;
            }
        }

        info!(
            rule_id,
            created = outcome.created,
            skipped = outcome.skipped,
            errors = outcome.errors.len(),
            "materialization pass complete"
        );
        Ok(outcome)
    }

    /// Materialize every rule whose range intersects the current horizon.
    /// Used by the daily scheduler tick and by process-now; both are safe to
    /// run repeatedly.
    pub fn process_due(&self) -> ProcessOutcome {
        let from = today();
        let to = from + Duration::days(self.horizon_days);

        let due: Vec<RuleId> = self
            .rules
            .iter()
            .filter(|r| r.start_date <= to && r.end_date >= from)
            .map(|r| r.id)
            .collect();

        let mut report = ProcessOutcome {
            rules_processed: 0,
            created: 0,
            skipped: 0,
            outcomes: Vec::new(),
        };

        for rule_id in due {
            match self.materialize(rule_id) {
                Ok(outcome) => {
                    report.rules_processed += 1;
                    report.created += outcome.created;
                    report.skipped += outcome.skipped;
                    report.outcomes.push(outcome);
                }
                // Deleted mid-pass or already being materialized: skip, the
                // next tick will pick it up.
                Err(e) => warn!(rule_id, error = %e, "skipping rule in this pass"),
            }
        }

        report
    }
}

/// Removes the in-flight marker when a pass ends, including on early return.
struct InFlightGuard<'a> {
    set: &'a DashMap<RuleId, ()>,
    rule_id: RuleId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.rule_id);
    }
}
