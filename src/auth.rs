use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, sync::Arc};
use uuid::Uuid;

use crate::{api::ApiState, config::AppConfig};

/// Claims
///
/// Payload expected inside a session JWT. Signature and expiry are checked on every
/// guarded page load.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user id. Must match the user the backend resolves the token to.
    pub sub: Uuid,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// Session
///
/// Explicit request context handed to the gate and the backend client: the session token
/// (if any) and the path the user asked for. Extraction never fails; a request without
/// credentials simply yields a session without a token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    path: String,
}

impl Session {
    pub fn new(token: Option<String>, path: impl Into<String>) -> Self {
        Self {
            token,
            path: path.into(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Requested path including the query string, used as the post-login `continue` target.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Session Extractor Implementation
///
/// Token lookup order:
/// 1. `Authorization: Bearer <token>` header.
/// 2. The configured session cookie.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_value(&parts.headers, &config.session_cookie));

        // Nested routers see a stripped URI; the original one is what the user navigated to.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(Session::new(token, path))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Requirement
///
/// The capability a session must hold before a page may load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any signed-in user.
    Authenticated,
    /// Signed-in user with administrator privilege.
    Admin,
}

/// AuthUser
///
/// The resolved identity of an authorized session.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

/// DenyReason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session, or one that is invalid, expired or unknown to the backend.
    Unauthenticated,
    /// A valid session that lacks the required capability.
    Forbidden,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::Unauthenticated => f.write_str("not authenticated"),
            DenyReason::Forbidden => f.write_str("insufficient privilege"),
        }
    }
}

/// Diversion
///
/// Where navigation goes instead of the requested page.
#[derive(Debug, Clone, PartialEq)]
pub struct Diversion {
    pub reason: DenyReason,
    pub location: String,
}

impl fmt::Display for Diversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, redirecting to {}", self.reason, self.location)
    }
}

/// AuthOutcome
///
/// Result of the authorization gate. The gate never redirects by itself; the caller turns
/// `Denied` into navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authorized(AuthUser),
    Denied(Diversion),
}

/// Authorizer
///
/// The authorization gate consulted before any page data is fetched.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authenticate(&self, session: &Session, requirement: Requirement) -> AuthOutcome;
}

/// GateState
///
/// The concrete type used to share the gate across the application state.
pub type GateState = Arc<dyn Authorizer>;

/// SessionGate
///
/// Production gate:
/// 1. Token presence (header or cookie).
/// 2. JWT validation (signature and expiry) against the configured secret.
/// 3. Backend lookup of the token's user, which must match the token subject.
/// 4. Capability check against the requirement.
///
/// Failing steps 1-3 diverts to the login page, failing step 4 to the forbidden page.
pub struct SessionGate {
    api: ApiState,
    config: AppConfig,
}

impl SessionGate {
    pub fn new(api: ApiState, config: AppConfig) -> Self {
        Self { api, config }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &decoding_key, &validation).map(|data| data.claims)
    }

    fn deny(&self, reason: DenyReason, session: &Session) -> AuthOutcome {
        let location = match reason {
            DenyReason::Unauthenticated => login_redirect(&self.config.login_path, session.path()),
            DenyReason::Forbidden => self.config.forbidden_path.clone(),
        };
        tracing::info!(%reason, path = %session.path(), %location, "page access denied");

        AuthOutcome::Denied(Diversion { reason, location })
    }
}

/// Builds `<login_path>?continue=<encoded path>`.
pub fn login_redirect(login_path: &str, continue_to: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(continue_to.as_bytes()).collect();
    format!("{}?continue={}", login_path, encoded)
}

#[async_trait]
impl Authorizer for SessionGate {
    async fn authenticate(&self, session: &Session, requirement: Requirement) -> AuthOutcome {
        let Some(token) = session.token() else {
            return self.deny(DenyReason::Unauthenticated, session);
        };

        let claims = match self.decode_claims(token) {
            Ok(claims) => claims,
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("session token expired"),
                    _ => tracing::warn!(error = %e, "session token rejected"),
                }
                return self.deny(DenyReason::Unauthenticated, session);
            }
        };

        // The backend is the source of truth for the user's current privileges.
        let user = match self.api.get_my_user(session).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "session user could not be resolved");
                return self.deny(DenyReason::Unauthenticated, session);
            }
        };

        if user.id != claims.sub {
            tracing::warn!(sub = %claims.sub, user = %user.id, "token subject does not match session user");
            return self.deny(DenyReason::Unauthenticated, session);
        }

        if requirement == Requirement::Admin && !user.is_admin {
            return self.deny(DenyReason::Forbidden, session);
        }

        AuthOutcome::Authorized(AuthUser {
            id: user.id,
            email: user.email,
            is_admin: user.is_admin,
        })
    }
}
