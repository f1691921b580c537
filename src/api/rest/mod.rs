//! REST endpoint handlers
//!
//! - `POST /bookings`, booking queries, approval and cancellation
//! - `POST /recurring-bookings`, rule queries, deletion, process-now
//! - `GET /reports/analytics/*` read-only rollups
//! - `GET /audit/*` trail queries

pub mod audit;
pub mod bookings;
pub mod recurring;
pub mod reports;
