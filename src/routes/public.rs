use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Unauthenticated endpoints used by infrastructure rather than by the dashboard.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Does not touch the backend.
        .route("/health", get(|| async { "ok" }))
}
