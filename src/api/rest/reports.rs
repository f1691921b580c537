//! Analytics report endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::{ApiResponse, AppState};

/// GET /reports/analytics/summary
pub async fn analytics_summary(State(state): State<Arc<AppState>>) -> Response {
    let summary = state.engine.analytics_summary();
    Json(ApiResponse::ok("Analytics summary generated", summary)).into_response()
}

/// GET /reports/analytics/room-utilization
pub async fn room_utilization(State(state): State<Arc<AppState>>) -> Response {
    let stats = state.engine.room_utilization();
    Json(ApiResponse::ok("Room utilization generated", stats)).into_response()
}
