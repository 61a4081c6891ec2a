use admin_console::{
    AppState,
    api::{ApiState, HttpAdminApi},
    config::{AppConfig, Env},
    create_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, builds the backend client and serves the
/// admin page loaders.
#[tokio::main]
async fn main() {
    // 1. Configuration (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter
    // RUST_LOG wins; otherwise verbose for this crate, quieter for the HTTP stack.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "admin_console=debug,tower_http=info,axum=trace".into());

    // 3. Log format per environment: pretty locally, JSON for aggregators in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Backend Client
    let api = HttpAdminApi::new(&config.api_url, config.api_timeout)
        .expect("FATAL: Failed to build backend client. Check API_URL.");
    tracing::info!(backend = %api.base_url(), "Backend client ready");

    // 5. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(Arc::new(api) as ApiState, config);

    // 6. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
