//! Utility functions

pub mod time;

pub use time::{current_timestamp, today};
