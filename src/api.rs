use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::{
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};
use uuid::Uuid;

use crate::{
    auth::Session,
    errors::ApiError,
    models::{AuditFiles, JobsStatus, ServerStats, SystemConfig, UserInfo},
};

/// Endpoint
///
/// The read-only backend queries this service issues. Doubles as the call-log entry of
/// the mock implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentUser,
    JobsStatus,
    AuditFiles,
    ServerStatistics,
    SystemConfig,
}

impl Endpoint {
    /// Path relative to the backend base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CurrentUser => "users/me",
            Endpoint::JobsStatus => "jobs",
            Endpoint::AuditFiles => "audit/file-report",
            Endpoint::ServerStatistics => "server-info/statistics",
            Endpoint::SystemConfig => "system-config",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// 1. AdminApi Contract
/// AdminApi
///
/// The remote backend as seen by the page loaders. Every operation is a read-only query
/// made on behalf of the given session, whose token is forwarded as the credential.
///
/// The trait lets handlers run against the real HTTP client in production and against
/// `MockAdminApi` in tests.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Resolves the user that owns the session token.
    async fn get_my_user(&self, session: &Session) -> Result<UserInfo, ApiError>;

    async fn get_all_jobs_status(&self, session: &Session) -> Result<JobsStatus, ApiError>;

    async fn get_audit_files(&self, session: &Session) -> Result<AuditFiles, ApiError>;

    async fn get_server_statistics(&self, session: &Session) -> Result<ServerStats, ApiError>;

    async fn get_config(&self, session: &Session) -> Result<SystemConfig, ApiError>;
}

// 2. The Real Implementation (reqwest)
/// HttpAdminApi
///
/// Talks JSON over HTTP to the backend. The reqwest client is cheap to clone and pools
/// connections, so one instance serves every request.
#[derive(Clone)]
pub struct HttpAdminApi {
    client: reqwest::Client,
    base_url: Url,
}

// Backend error bodies are kept for logs only; cap them.
const MAX_ERROR_BODY: usize = 512;

impl HttpAdminApi {
    /// new
    ///
    /// Builds the client for the backend at `base_url`. Every call is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        // Url::join replaces the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        session: &Session,
    ) -> Result<T, ApiError> {
        let url = self.base_url.join(endpoint.path())?;
        let mut request = self.client.get(url);
        if let Some(token) = session.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            tracing::debug!(%endpoint, %status, "backend returned an error status");
            return Err(ApiError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn get_my_user(&self, session: &Session) -> Result<UserInfo, ApiError> {
        self.get_json(Endpoint::CurrentUser, session).await
    }

    async fn get_all_jobs_status(&self, session: &Session) -> Result<JobsStatus, ApiError> {
        self.get_json(Endpoint::JobsStatus, session).await
    }

    async fn get_audit_files(&self, session: &Session) -> Result<AuditFiles, ApiError> {
        self.get_json(Endpoint::AuditFiles, session).await
    }

    async fn get_server_statistics(&self, session: &Session) -> Result<ServerStats, ApiError> {
        self.get_json(Endpoint::ServerStatistics, session).await
    }

    async fn get_config(&self, session: &Session) -> Result<SystemConfig, ApiError> {
        self.get_json(Endpoint::SystemConfig, session).await
    }
}

// 3. The Mock Implementation (For Tests)
/// Id of the administrator `MockAdminApi::new()` resolves every session to.
pub const MOCK_ADMIN_ID: Uuid = Uuid::from_u128(0xad);

/// MockAdminApi
///
/// In-memory backend with canned responses. Records every call so tests can assert which
/// queries were (or were not) issued, and can be told to fail specific endpoints.
pub struct MockAdminApi {
    pub user: Option<UserInfo>,
    pub jobs: JobsStatus,
    pub audit: AuditFiles,
    pub stats: ServerStats,
    pub config: SystemConfig,
    failing: Vec<Endpoint>,
    calls: Mutex<Vec<Endpoint>>,
}

impl Default for MockAdminApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdminApi {
    pub fn new() -> Self {
        Self {
            user: Some(UserInfo {
                id: MOCK_ADMIN_ID,
                email: "admin@example.com".to_string(),
                name: "Admin".to_string(),
                is_admin: true,
            }),
            jobs: json!([]),
            audit: AuditFiles::default(),
            stats: json!({}),
            config: json!({}),
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the user every session resolves to. `None` makes the lookup fail with 401.
    pub fn with_user(mut self, user: Option<UserInfo>) -> Self {
        self.user = user;
        self
    }

    pub fn with_jobs(mut self, jobs: JobsStatus) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_audit(mut self, audit: AuditFiles) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_stats(mut self, stats: ServerStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_config(mut self, config: SystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Makes every call to `endpoint` fail with a simulated 500.
    pub fn failing_on(mut self, endpoint: Endpoint) -> Self {
        self.failing.push(endpoint);
        self
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// How many times `endpoint` was called.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls().iter().filter(|call| **call == endpoint).count()
    }

    fn record(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(endpoint);

        if self.failing.contains(&endpoint) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "Mock backend failure: simulation requested".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AdminApi for MockAdminApi {
    async fn get_my_user(&self, _session: &Session) -> Result<UserInfo, ApiError> {
        self.record(Endpoint::CurrentUser)?;
        self.user.clone().ok_or_else(|| ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "Invalid user token".to_string(),
        })
    }

    async fn get_all_jobs_status(&self, _session: &Session) -> Result<JobsStatus, ApiError> {
        self.record(Endpoint::JobsStatus)?;
        Ok(self.jobs.clone())
    }

    async fn get_audit_files(&self, _session: &Session) -> Result<AuditFiles, ApiError> {
        self.record(Endpoint::AuditFiles)?;
        Ok(self.audit.clone())
    }

    async fn get_server_statistics(&self, _session: &Session) -> Result<ServerStats, ApiError> {
        self.record(Endpoint::ServerStatistics)?;
        Ok(self.stats.clone())
    }

    async fn get_config(&self, _session: &Session) -> Result<SystemConfig, ApiError> {
        self.record(Endpoint::SystemConfig)?;
        Ok(self.config.clone())
    }
}

/// ApiState
///
/// The concrete type used to share the backend client across the application state.
pub type ApiState = Arc<dyn AdminApi>;
