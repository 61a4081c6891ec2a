//! Guarded page loading: authorize first, then fetch, then hand the page to the renderer.

use serde::{Deserialize, Serialize};
use std::future::Future;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    auth::{AuthOutcome, Authorizer, Requirement, Session},
    errors::{ApiError, LoadError},
};

/// PageMeta
///
/// Page metadata consumed by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageMeta {
    pub title: String,
}

/// PageResult
///
/// What a guarded loader hands to the rendering layer. The route-specific fields of `data`
/// are flattened next to `meta`, so a jobs page serializes as `{ "jobs": ..., "meta": { "title": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    #[serde(flatten)]
    pub data: T,
    pub meta: PageMeta,
}

/// load_guarded
///
/// Runs `fetch` only once `gate` has authorized `session` for `requirement`.
///
/// - Denied: returns `LoadError::Denied` and `fetch` is never called.
/// - Authorized: awaits `fetch`. A page needing several backend calls joins them inside
///   `fetch` (e.g. with `tokio::try_join!`); the first failure aborts the load.
///
/// There is no retry and no partial result: a failed fetch surfaces as `LoadError::Fetch`.
#[tracing::instrument(name = "guarded_load", skip_all, fields(title = %title, path = %session.path()))]
pub async fn load_guarded<T, F, Fut>(
    gate: &dyn Authorizer,
    session: &Session,
    requirement: Requirement,
    title: &str,
    fetch: F,
) -> Result<PageResult<T>, LoadError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let user = match gate.authenticate(session, requirement).await {
        AuthOutcome::Authorized(user) => user,
        AuthOutcome::Denied(diversion) => return Err(LoadError::Denied(diversion)),
    };
    tracing::debug!(user = %user.id, "session authorized");

    let data = fetch().await?;
    tracing::debug!("page data loaded");

    Ok(PageResult {
        data,
        meta: PageMeta {
            title: title.to_string(),
        },
    })
}
