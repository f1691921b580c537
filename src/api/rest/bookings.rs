//! Booking endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::api::{error_response, ApiResponse, AppState};
use crate::engine::CreateBooking;
use crate::types::{BookingId, RoomId, TimeSlot, UserId};

/// Body of `POST /bookings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub meeting_title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub attendees_count: Option<u32>,
}

impl From<BookingRequest> for CreateBooking {
    fn from(req: BookingRequest) -> Self {
        CreateBooking {
            room_id: req.room_id,
            user_id: req.user_id,
            date: req.booking_date,
            slot: TimeSlot::new(req.start_time, req.end_time),
            meeting_title: req.meeting_title,
            description: req.description,
            attendees_count: req.attendees_count,
            recurring_rule_id: None,
        }
    }
}

/// Body of `POST /bookings/approve`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub booking_id: BookingId,
    pub admin_id: UserId,
    pub approve: bool,
}

/// `?userId=` query used by owner-scoped endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: UserId,
}

/// POST /bookings - submit a booking request
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingRequest>,
) -> Response {
    match state.engine.create(req.into()) {
        Ok(booking) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(
                "Booking request submitted. Waiting for admin approval.",
                booking,
            )),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /bookings/approve - admin decision on a PENDING booking
pub async fn approve_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApprovalRequest>,
) -> Response {
    match state.engine.decide(req.booking_id, req.admin_id, req.approve) {
        Ok(booking) => {
            let message = if req.approve {
                "Booking approved successfully"
            } else {
                "Booking rejected"
            };
            Json(ApiResponse::ok(message, booking)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// DELETE /bookings/:id?userId= - owner cancellation
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<BookingId>,
    Query(query): Query<UserQuery>,
) -> Response {
    match state.engine.cancel(booking_id, query.user_id) {
        Ok(()) => Json(ApiResponse::ok_empty("Booking cancelled successfully")).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /bookings/my-bookings?userId=
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Response {
    let bookings = state.engine.list_for_user(query.user_id);
    Json(ApiResponse::ok("Bookings fetched successfully", bookings)).into_response()
}

/// GET /bookings/pending
pub async fn pending_bookings(State(state): State<Arc<AppState>>) -> Response {
    let bookings = state.engine.list_pending();
    Json(ApiResponse::ok("Pending bookings fetched", bookings)).into_response()
}

/// GET /bookings/all
pub async fn all_bookings(State(state): State<Arc<AppState>>) -> Response {
    let bookings = state.engine.list_all();
    Json(ApiResponse::ok("All bookings fetched", bookings)).into_response()
}

/// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<BookingId>,
) -> Response {
    match state.engine.get(booking_id) {
        Some(booking) => Json(ApiResponse::ok("Booking fetched", booking)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(format!(
                "booking not found: {}",
                booking_id
            ))),
        )
            .into_response(),
    }
}
