//! Integration tests for the booking engine
//!
//! Covers the full request-approve-cancel lifecycle, concurrent admission,
//! recurring materialization, and the durable audit trail.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{Duration, NaiveTime};
use tempfile::TempDir;

use roombook::audit::AuditTrail;
use roombook::engine::{BookingEngine, CreateBooking, CreateRule, RecurringRuleEngine};
use roombook::error::EngineError;
use roombook::types::{AuditAction, BookingStatus, EntityKind, Frequency, Room, TimeSlot};
use roombook::utils::today;

fn slot(sh: u32, eh: u32) -> TimeSlot {
    TimeSlot::new(
        NaiveTime::from_hms_opt(sh, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(eh, 0, 0).unwrap(),
    )
}

fn setup_engine(audit: Arc<AuditTrail>) -> Arc<BookingEngine> {
    let engine = Arc::new(BookingEngine::new(audit));
    engine.add_room(Room::new(1, "Conference Room A", 12));
    engine.add_room(Room::new(2, "Huddle Room", 4));
    engine
}

fn request(room_id: u64, user_id: u64, sh: u32, eh: u32) -> CreateBooking {
    CreateBooking {
        room_id,
        user_id,
        date: today() + Duration::days(14),
        slot: slot(sh, eh),
        meeting_title: "Sprint review".to_string(),
        description: Some("Quarterly planning follow-up".to_string()),
        attendees_count: Some(4),
        recurring_rule_id: None,
    }
}

#[test]
fn test_full_booking_lifecycle() {
    let engine = setup_engine(Arc::new(AuditTrail::new()));

    // Submit, approve, then the owner cancels.
    let booking = engine.create(request(1, 7, 10, 11)).unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);

    let approved = engine.decide(booking.id, 99, true).unwrap();
    assert_eq!(approved.status, BookingStatus::Approved);
    assert_eq!(approved.approved_by, Some(99));

    engine.cancel(booking.id, 7).unwrap();
    assert_eq!(
        engine.get(booking.id).unwrap().status,
        BookingStatus::Cancelled
    );

    // The slot is free again after cancellation.
    let rebooked = engine.create(request(1, 8, 10, 11)).unwrap();
    assert_eq!(rebooked.status, BookingStatus::Pending);
}

#[test]
fn test_concurrent_creates_have_one_winner() {
    let engine = setup_engine(Arc::new(AuditTrail::new()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            thread::spawn(move || engine.create(request(1, 100 + i, 9, 10)))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(EngineError::Conflict { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(engine.list_all().len(), 1);
}

#[test]
fn test_concurrent_decisions_resolve_once() {
    let engine = setup_engine(Arc::new(AuditTrail::new()));
    let booking = engine.create(request(1, 7, 10, 11)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            let id = booking.id;
            thread::spawn(move || engine.decide(id, 200 + i, i % 2 == 0))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    let status = engine.get(booking.id).unwrap().status;
    assert!(status == BookingStatus::Approved || status == BookingStatus::Rejected);
}

#[test]
fn test_every_mutation_is_audited_once() {
    let audit = Arc::new(AuditTrail::new());
    let engine = setup_engine(audit.clone());

    let a = engine.create(request(1, 7, 10, 11)).unwrap();
    let b = engine.create(request(2, 7, 10, 11)).unwrap();
    engine.decide(a.id, 99, true).unwrap();
    engine.decide(b.id, 99, false).unwrap();
    engine.cancel(a.id, 7).unwrap();

    // Two creates, two decisions, one cancellation.
    assert_eq!(audit.len(), 5);

    let trail = audit.for_entity(EntityKind::Booking, a.id);
    let actions: Vec<_> = trail.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Create, AuditAction::Approve, AuditAction::Delete]
    );

    // Failed mutations leave no trace.
    let mut oversized = request(2, 8, 10, 11);
    oversized.attendees_count = Some(6);
    assert!(engine.create(oversized).is_err());
    assert_eq!(audit.len(), 5);
}

#[test]
fn test_failed_audit_append_aborts_create() {
    let dir = TempDir::new().unwrap();
    let audit = Arc::new(AuditTrail::with_data_dir(dir.path()).unwrap());
    let engine = setup_engine(audit);

    // Pull the sink out from under the trail.
    std::fs::remove_dir_all(dir.path()).unwrap();

    let err = engine.create(request(1, 7, 10, 11)).unwrap_err();
    assert!(matches!(err, EngineError::Audit(_)));
    assert!(engine.list_all().is_empty());

    // The failed create released its reservation: once the sink is back,
    // the identical slot admits exactly one booking.
    std::fs::create_dir_all(dir.path()).unwrap();
    assert!(engine.create(request(1, 7, 10, 11)).is_ok());
    assert!(engine.create(request(1, 8, 10, 11)).is_err());
}

#[test]
fn test_audit_trail_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let audit = Arc::new(AuditTrail::with_data_dir(dir.path()).unwrap());
        let engine = setup_engine(audit);
        let booking = engine.create(request(1, 7, 10, 11)).unwrap();
        engine.decide(booking.id, 99, true).unwrap();
    }

    let reopened = AuditTrail::with_data_dir(dir.path()).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.recent(1)[0].action, AuditAction::Approve);
}

#[test]
fn test_recurring_rule_end_to_end() {
    let engine = setup_engine(Arc::new(AuditTrail::new()));
    let recurring = RecurringRuleEngine::new(engine.clone(), 30, 5);

    let start = today();
    let rule = recurring
        .create_rule(CreateRule {
            user_id: 7,
            room_id: 1,
            meeting_title: "Daily standup".to_string(),
            description: None,
            start_date: start,
            end_date: start + Duration::days(6),
            slot: slot(9, 10),
            frequency: Frequency::Daily,
            days_of_week: vec![],
            attendees_count: Some(5),
        })
        .unwrap();

    let first = recurring.materialize(rule.id).unwrap();
    assert_eq!(first.created, 7);

    // Re-running is a no-op; the keys persist.
    let second = recurring.materialize(rule.id).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 0);

    let bookings = engine.list_for_rule(rule.id);
    assert_eq!(bookings.len(), 7);
    assert!(bookings.iter().all(|b| b.status == BookingStatus::Pending));
    assert!(bookings
        .iter()
        .all(|b| b.recurring_rule_id == Some(rule.id)));
}

#[test]
fn test_concurrent_materialization_of_one_rule_is_rejected() {
    // The file-backed trail fsyncs every created booking, which keeps a
    // 300-occurrence pass in flight long enough for the other thread to
    // observe it.
    let dir = TempDir::new().unwrap();
    let audit = Arc::new(AuditTrail::with_data_dir(dir.path()).unwrap());
    let engine = setup_engine(audit);
    let recurring = Arc::new(RecurringRuleEngine::new(engine.clone(), 365, 5));

    let start = today();
    let rule = recurring
        .create_rule(CreateRule {
            user_id: 7,
            room_id: 1,
            meeting_title: "Daily standup".to_string(),
            description: None,
            start_date: start,
            end_date: start + Duration::days(299),
            slot: slot(9, 10),
            frequency: Frequency::Daily,
            days_of_week: vec![],
            attendees_count: None,
        })
        .unwrap();

    // Both threads retry until they get a completed pass, recording
    // whether they were turned away while the other held the rule.
    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let recurring = recurring.clone();
            let barrier = barrier.clone();
            let rule_id = rule.id;
            thread::spawn(move || {
                barrier.wait();
                let mut rejected = false;
                loop {
                    match recurring.materialize(rule_id) {
                        Ok(outcome) => return (outcome.created, rejected),
                        Err(EngineError::InvalidState(_)) => rejected = true,
                        Err(other) => panic!("unexpected error: {:?}", other),
                    }
                }
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // One pass did all the work, the other was rejected and then found
    // nothing left to do.
    assert_eq!(results.iter().map(|(created, _)| created).sum::<usize>(), 300);
    assert!(results.iter().any(|(created, _)| *created == 300));
    assert!(results.iter().any(|(_, rejected)| *rejected));
    assert_eq!(engine.list_for_rule(rule.id).len(), 300);
    assert_eq!(recurring.get(rule.id).unwrap().bookings_created, 300);
}

#[test]
fn test_materialization_skips_occupied_days() {
    let engine = setup_engine(Arc::new(AuditTrail::new()));
    let recurring = RecurringRuleEngine::new(engine.clone(), 30, 5);

    // Block one of the days ahead of time.
    let mut blocker = request(1, 99, 9, 10);
    blocker.date = today() + Duration::days(2);
    engine.create(blocker).unwrap();

    let start = today();
    let rule = recurring
        .create_rule(CreateRule {
            user_id: 7,
            room_id: 1,
            meeting_title: "Daily standup".to_string(),
            description: None,
            start_date: start,
            end_date: start + Duration::days(4),
            slot: slot(9, 10),
            frequency: Frequency::Daily,
            days_of_week: vec![],
            attendees_count: None,
        })
        .unwrap();

    let outcome = recurring.materialize(rule.id).unwrap();
    assert_eq!(outcome.created, 4);
    assert_eq!(outcome.skipped, 1);
    assert!(outcome.errors.is_empty());
    assert!(!outcome.halted);
}
