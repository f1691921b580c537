//! Room Booking Engine
//!
//! A meeting-room reservation service with an approval workflow, recurring
//! rules, and a durable audit trail.
//!
//! # Features
//!
//! - **Conflict-free admission**: two active bookings never overlap in the
//!   same room on the same date
//! - **Approval lifecycle**: PENDING requests are approved or rejected by an
//!   admin; owners can cancel active bookings
//! - **Recurring rules**: DAILY, WEEKLY, and MONTHLY rules materialized
//!   idempotently over a rolling horizon
//! - **Audit trail**: every mutation appends exactly one durable entry
//! - **Analytics**: summary counters and per-room utilization rollups
//!
//! # Modules
//!
//! - `types`: Core data structures (Booking, Room, RecurringRule, audit types)
//! - `error`: Engine error taxonomy
//! - `audit`: Append-only audit trail with JSONL persistence
//! - `engine`: Booking lifecycle, conflict index, recurrence, analytics
//! - `api`: Axum REST surface with the `{success, message, data}` envelope
//! - `scheduler`: Background materialization loop
//! - `config`: Environment-based configuration and room seeding
//! - `utils`: Time helpers

pub mod api;
pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use audit::AuditTrail;
pub use config::Config;
pub use engine::{BookingEngine, CreateBooking, CreateRule, RecurringRuleEngine};
pub use error::{EngineError, EngineResult};
pub use types::{Booking, BookingStatus, Frequency, RecurringRule, Room, TimeSlot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
