use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core services: backend client, authorization gate, guarded loading.
pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod loader;
pub mod models;

// Routing segregation (Public, Admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use api::{ApiState, HttpAdminApi, MockAdminApi};
pub use auth::{GateState, SessionGate};
pub use config::AppConfig;

/// ApiDoc
///
/// OpenAPI document for the admin page endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::jobs_status_page, handlers::repair_page,
        handlers::server_status_page, handlers::system_settings_page
    ),
    components(
        schemas(
            models::JobsStatusPage, models::RepairPage, models::ServerStatusPage,
            models::SystemSettingsPage, models::FileReportItem, models::AuditFiles,
            loader::PageMeta,
        )
    ),
    tags(
        (name = "admin-console", description = "Guarded admin page loaders")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container of shared services, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Remote backend client.
    pub api: ApiState,
    /// Authorization gate consulted by every guarded loader.
    pub gate: GateState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Wires the production gate to the given backend client.
    pub fn new(api: ApiState, config: AppConfig) -> Self {
        let gate = std::sync::Arc::new(SessionGate::new(api.clone(), config.clone())) as GateState;
        Self { api, gate, config }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for ApiState {
    fn from_ref(app_state: &AppState) -> ApiState {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for GateState {
    fn from_ref(app_state: &AppState) -> GateState {
        app_state.gate.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the observability layers and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Admin pages: gated per handler by the guarded loader.
        .nest("/admin", admin::admin_routes())
        .with_state(state);

    // Request id first so the trace span can pick it up.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, correlated by the `x-request-id` header.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
