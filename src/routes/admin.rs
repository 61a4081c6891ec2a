use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// One route per admin page. The rendering layer calls these before it renders the
/// page of the same name.
///
/// Access Control:
/// No router-level layer is involved. Each handler passes through `load_guarded`, which
/// consults the gate before any backend query and answers with a redirect when the
/// session is not an administrator.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/jobs-status
        // Background job queue counters.
        .route("/jobs-status", get(handlers::jobs_status_page))
        // GET /admin/repair
        // File integrity report (orphaned database rows, untracked files).
        .route("/repair", get(handlers::repair_page))
        // GET /admin/server-status
        // Usage statistics.
        .route("/server-status", get(handlers::server_status_page))
        // GET /admin/system-settings
        // Full server configuration.
        .route("/system-settings", get(handlers::system_settings_page))
}
