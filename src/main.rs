//! Room Booking Server - Binary Entry Point

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use roombook::api::http::create_router;
use roombook::api::AppState;
use roombook::audit::AuditTrail;
use roombook::config::{load_rooms, Config};
use roombook::engine::{BookingEngine, RecurringRuleEngine};
use roombook::scheduler::run_materializer;
use roombook::types::Room;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let audit = match &config.data_dir {
        Some(dir) => Arc::new(AuditTrail::with_data_dir(dir)?),
        None => Arc::new(AuditTrail::new()),
    };

    let engine = Arc::new(BookingEngine::new(audit));
    for room in seed_rooms(&config)? {
        engine.add_room(room);
    }
    info!(rooms = engine.room_count(), "room inventory loaded");

    let recurring = Arc::new(RecurringRuleEngine::new(
        engine.clone(),
        config.horizon_days,
        config.max_consecutive_errors,
    ));

    tokio::spawn(run_materializer(
        recurring.clone(),
        Duration::from_secs(config.materialize_interval_secs),
    ));

    let state = Arc::new(AppState { engine, recurring });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rooms from the configured inventory file, or a small built-in set so the
/// server is usable out of the box.
fn seed_rooms(config: &Config) -> Result<Vec<Room>, Box<dyn std::error::Error>> {
    if let Some(path) = &config.rooms_file {
        return Ok(load_rooms(path)?);
    }
    Ok(vec![
        Room::new(1, "Conference Room A", 12),
        Room::new(2, "Conference Room B", 8),
        Room::new(3, "Huddle Room", 4),
    ])
}
