use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::Diversion;

/// ApiError
///
/// Every way a call against the remote backend can fail. None of these are recovered
/// locally; they travel up to the HTTP layer unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("backend response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// LoadError
///
/// Why a guarded page load produced no page. `Denied` is a navigation diversion, not a
/// failure to render; `Fetch` ends on the generic error page.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("access denied: {0}")]
    Denied(Diversion),
    #[error(transparent)]
    Fetch(#[from] ApiError),
}

/// ErrorResponse
///
/// Body of the generic error page. Deliberately carries no backend detail.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for LoadError {
    fn into_response(self) -> Response {
        match self {
            LoadError::Denied(diversion) => {
                (StatusCode::FOUND, [(header::LOCATION, diversion.location)]).into_response()
            }
            LoadError::Fetch(err) => {
                tracing::error!(error = %err, "page data could not be loaded");
                let body = Json(ErrorResponse {
                    error: "Failed to load page data".to_string(),
                    code: "BAD_GATEWAY".to_string(),
                });
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
        }
    }
}
