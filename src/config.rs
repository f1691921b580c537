//! Server configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};
use crate::types::Room;

/// Default bind address for the HTTP server.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";
/// Default materialization look-ahead, in days.
const DEFAULT_HORIZON_DAYS: i64 = 7;
/// Default cap on consecutive non-conflict errors per pass.
const DEFAULT_MAX_CONSECUTIVE_ERRORS: usize = 5;
/// Default scheduler period: one materialization pass per day.
const DEFAULT_MATERIALIZE_INTERVAL_SECS: u64 = 86_400;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Directory for the audit file; `None` keeps the trail memory-only.
    pub data_dir: Option<PathBuf>,
    /// Optional JSON file with the room inventory to seed at startup.
    pub rooms_file: Option<PathBuf>,
    /// How far ahead of today rules are materialized, in days.
    pub horizon_days: i64,
    /// Consecutive errors tolerated before a materialization pass halts.
    pub max_consecutive_errors: usize,
    /// Seconds between scheduler ticks.
    pub materialize_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.to_string(),
            data_dir: None,
            rooms_file: None,
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
            materialize_interval_secs: DEFAULT_MATERIALIZE_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Build the configuration from `ROOMBOOK_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> EngineResult<Self> {
        let mut config = Self::default();

        if let Ok(addr) = env::var("ROOMBOOK_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(dir) = env::var("ROOMBOOK_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(file) = env::var("ROOMBOOK_ROOMS_FILE") {
            config.rooms_file = Some(PathBuf::from(file));
        }
        if let Ok(days) = env::var("ROOMBOOK_HORIZON_DAYS") {
            config.horizon_days = days.parse().map_err(|_| {
                EngineError::validation("ROOMBOOK_HORIZON_DAYS must be a number of days")
            })?;
            if config.horizon_days < 0 {
                return Err(EngineError::validation(
                    "ROOMBOOK_HORIZON_DAYS must not be negative",
                ));
            }
        }
        if let Ok(cap) = env::var("ROOMBOOK_MAX_CONSECUTIVE_ERRORS") {
            config.max_consecutive_errors = cap.parse().map_err(|_| {
                EngineError::validation("ROOMBOOK_MAX_CONSECUTIVE_ERRORS must be a number")
            })?;
        }
        if let Ok(secs) = env::var("ROOMBOOK_MATERIALIZE_INTERVAL_SECS") {
            config.materialize_interval_secs = secs.parse().map_err(|_| {
                EngineError::validation("ROOMBOOK_MATERIALIZE_INTERVAL_SECS must be seconds")
            })?;
        }

        Ok(config)
    }
}

/// Load the room inventory from a JSON array file.
pub fn load_rooms(path: &std::path::Path) -> EngineResult<Vec<Room>> {
    let raw = std::fs::read_to_string(path)?;
    let rooms: Vec<Room> = serde_json::from_str(&raw)?;
    Ok(rooms)
}
