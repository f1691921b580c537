//! REST API module
//!
//! Every endpoint answers with the `{success, message, data}` envelope the
//! UI layer consumes; engine errors are mapped to HTTP statuses here and
//! nowhere else.

pub mod http;
pub mod rest;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::engine::{BookingEngine, RecurringRuleEngine};
use crate::error::EngineError;

/// Shared application state behind every handler.
pub struct AppState {
    pub engine: Arc<BookingEngine>,
    pub recurring: Arc<RecurringRuleEngine>,
}

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Map an engine error to its HTTP status.
fn status_for(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::BookingNotFound(_)
        | EngineError::RuleNotFound(_)
        | EngineError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict { .. } | EngineError::InvalidState(_) => StatusCode::CONFLICT,
        EngineError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the failure response for an engine error.
pub fn error_response(err: &EngineError) -> Response {
    (status_for(err), Json(ApiResponse::failure(err.to_string()))).into_response()
}
