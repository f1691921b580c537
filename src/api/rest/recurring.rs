//! Recurring rule endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::api::{error_response, ApiResponse, AppState};
use crate::engine::CreateRule;
use crate::types::{Frequency, RoomId, RuleId, TimeSlot, UserId};

use super::bookings::UserQuery;

/// Body of `POST /recurring-bookings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringBookingRequest {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub meeting_title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub frequency: Frequency,
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    #[serde(default)]
    pub attendees_count: Option<u32>,
}

impl From<RecurringBookingRequest> for CreateRule {
    fn from(req: RecurringBookingRequest) -> Self {
        CreateRule {
            user_id: req.user_id,
            room_id: req.room_id,
            meeting_title: req.meeting_title,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            slot: TimeSlot::new(req.start_time, req.end_time),
            frequency: req.frequency,
            days_of_week: req.days_of_week,
            attendees_count: req.attendees_count,
        }
    }
}

/// POST /recurring-bookings - create a rule
pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecurringBookingRequest>,
) -> Response {
    match state.recurring.create_rule(req.into()) {
        Ok(rule) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok("Recurring booking rule created", rule)),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /recurring-bookings/my-rules?userId=
pub async fn my_rules(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Response {
    let rules = state.recurring.list_for_user(query.user_id);
    Json(ApiResponse::ok("Recurring rules fetched", rules)).into_response()
}

/// GET /recurring-bookings/:id
pub async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(rule_id): Path<RuleId>,
) -> Response {
    match state.recurring.get(rule_id) {
        Some(rule) => Json(ApiResponse::ok("Recurring rule fetched", rule)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(format!(
                "recurring rule not found: {}",
                rule_id
            ))),
        )
            .into_response(),
    }
}

/// DELETE /recurring-bookings/:id?userId= - owner deletion
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(rule_id): Path<RuleId>,
    Query(query): Query<UserQuery>,
) -> Response {
    match state.recurring.delete_rule(rule_id, query.user_id) {
        Ok(()) => Json(ApiResponse::ok_empty(
            "Recurring rule deleted; existing bookings are kept",
        ))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /recurring-bookings/process-now - materialize all due rules
pub async fn process_now(State(state): State<Arc<AppState>>) -> Response {
    let report = state.recurring.process_due();
    Json(ApiResponse::ok("Materialization pass complete", report)).into_response()
}
