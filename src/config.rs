use std::{env, time::Duration};

/// AppConfig
///
/// Holds the service's entire configuration state. Loaded once at startup and immutable
/// afterwards; it is pulled into handlers and extractors via FromRef from the shared AppState.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which variables are mandatory.
    pub env: Env,
    // Base URL of the remote backend API (e.g. "https://backend.internal/api").
    pub api_url: String,
    // Upper bound for a single remote API call.
    pub api_timeout: Duration,
    // Secret used to validate incoming session JWTs.
    pub jwt_secret: String,
    // Cookie consulted for the session token when no Authorization header is present.
    pub session_cookie: String,
    // Where unauthenticated sessions are sent. A `continue` query parameter is appended.
    pub login_path: String,
    // Where authenticated sessions lacking the required capability are sent.
    pub forbidden_path: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Defines the runtime context: relaxed defaults for local development,
/// mandatory secrets for production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_API_URL: &str = "http://localhost:2283/api";
const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl Default for AppConfig {
    /// Non-panicking instance for test setup, no environment variables required.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_url: DEFAULT_API_URL.to_string(),
            api_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            session_cookie: "access_token".to_string(),
            login_path: "/auth/login".to_string(),
            forbidden_path: "/photos".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, applying the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics in production when `API_URL` or `JWT_SECRET` is missing, and in any environment
    /// when `API_TIMEOUT_SECS` is set but not a positive integer.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()).as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let (api_url, jwt_secret) = match env {
            Env::Production => (
                env::var("API_URL").expect("FATAL: API_URL required in prod"),
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production."),
            ),
            Env::Local => (
                env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
                env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
            ),
        };

        let api_timeout = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => panic!("FATAL: API_TIMEOUT_SECS must be a positive integer, got {raw:?}"),
            },
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let defaults = Self::default();
        Self {
            env,
            api_url,
            api_timeout,
            jwt_secret,
            session_cookie: env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            login_path: env::var("LOGIN_PATH").unwrap_or(defaults.login_path),
            forbidden_path: env::var("FORBIDDEN_PATH").unwrap_or(defaults.forbidden_path),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }
}
