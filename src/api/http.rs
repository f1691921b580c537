//! HTTP server setup with Axum

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use super::rest::{audit, bookings, recurring, reports};
use super::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Booking lifecycle
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/approve", post(bookings::approve_booking))
        .route("/bookings/my-bookings", get(bookings::my_bookings))
        .route("/bookings/pending", get(bookings::pending_bookings))
        .route("/bookings/all", get(bookings::all_bookings))
        .route(
            "/bookings/:id",
            get(bookings::get_booking).delete(bookings::cancel_booking),
        )
        // Recurring rules
        .route("/recurring-bookings", post(recurring::create_rule))
        .route("/recurring-bookings/my-rules", get(recurring::my_rules))
        .route("/recurring-bookings/process-now", post(recurring::process_now))
        .route(
            "/recurring-bookings/:id",
            get(recurring::get_rule).delete(recurring::delete_rule),
        )
        // Analytics reports
        .route("/reports/analytics/summary", get(reports::analytics_summary))
        .route(
            "/reports/analytics/room-utilization",
            get(reports::room_utilization),
        )
        // Audit trail
        .route("/audit/recent", get(audit::recent_logs))
        .route(
            "/audit/entity/:entityType/:entityId",
            get(audit::entity_logs),
        )
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditTrail;
    use crate::engine::{BookingEngine, RecurringRuleEngine};
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let engine = Arc::new(BookingEngine::new(Arc::new(AuditTrail::new())));
        let recurring = Arc::new(RecurringRuleEngine::new(engine.clone(), 7, 5));
        Arc::new(AppState { engine, recurring })
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }
}
