//! Audit trail endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::{ApiResponse, AppState};
use crate::types::EntityKind;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /audit/recent?limit=
pub async fn recent_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let entries = state.engine.audit().recent(limit);
    Json(ApiResponse::ok("Audit logs fetched", entries)).into_response()
}

/// GET /audit/entity/:entityType/:entityId
pub async fn entity_logs(
    State(state): State<Arc<AppState>>,
    Path((entity_type, entity_id)): Path<(String, u64)>,
) -> Response {
    let kind = match entity_type.to_ascii_uppercase().as_str() {
        "BOOKING" => EntityKind::Booking,
        "RECURRING_RULE" => EntityKind::RecurringRule,
        other => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(format!(
                    "unknown entity type: {}",
                    other
                ))),
            )
                .into_response();
        }
    };

    let entries = state.engine.audit().for_entity(kind, entity_id);
    Json(ApiResponse::ok("Audit logs fetched", entries)).into_response()
}
