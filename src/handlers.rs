use crate::{
    AppState,
    auth::{Requirement, Session},
    errors::{ApiError, LoadError},
    loader::{PageResult, load_guarded},
    models::{JobsStatusPage, RepairPage, ServerStatusPage, SystemSettingsPage},
};
use axum::{Json, extract::State};

// --- Page Titles ---

pub const JOBS_STATUS_TITLE: &str = "任务状态";
pub const REPAIR_TITLE: &str = "修复";
pub const SERVER_STATUS_TITLE: &str = "服务器统计信息";
pub const SYSTEM_SETTINGS_TITLE: &str = "系统设置";

// --- Guarded Page Loaders ---
//
// One instantiation of `load_guarded` per admin page. Each differs only in the backend
// query it issues and the title it reports.

/// jobs_status_page
///
/// [Admin Page] Status of every background job queue.
#[utoipa::path(
    get,
    path = "/admin/jobs-status",
    responses(
        (status = 200, description = "Page data, plus `meta.title`", body = JobsStatusPage),
        (status = 302, description = "Redirect to login or away from admin pages"),
        (status = 502, description = "Backend query failed")
    )
)]
pub async fn jobs_status_page(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<PageResult<JobsStatusPage>>, LoadError> {
    let api = state.api.as_ref();
    let session_ref = &session;

    let page = load_guarded(
        state.gate.as_ref(),
        session_ref,
        Requirement::Admin,
        JOBS_STATUS_TITLE,
        move || async move {
            let jobs = api.get_all_jobs_status(session_ref).await?;
            Ok::<_, ApiError>(JobsStatusPage { jobs })
        },
    )
    .await?;

    Ok(Json(page))
}

/// repair_page
///
/// [Admin Page] File integrity report. The audit result is spread into the `orphans` and
/// `extras` keys.
#[utoipa::path(
    get,
    path = "/admin/repair",
    responses(
        (status = 200, description = "Page data, plus `meta.title`", body = RepairPage),
        (status = 302, description = "Redirect to login or away from admin pages"),
        (status = 502, description = "Backend query failed")
    )
)]
pub async fn repair_page(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<PageResult<RepairPage>>, LoadError> {
    let api = state.api.as_ref();
    let session_ref = &session;

    let page = load_guarded(
        state.gate.as_ref(),
        session_ref,
        Requirement::Admin,
        REPAIR_TITLE,
        move || async move {
            let audit = api.get_audit_files(session_ref).await?;
            Ok::<_, ApiError>(RepairPage::from(audit))
        },
    )
    .await?;

    Ok(Json(page))
}

/// server_status_page
///
/// [Admin Page] Server usage statistics.
#[utoipa::path(
    get,
    path = "/admin/server-status",
    responses(
        (status = 200, description = "Page data, plus `meta.title`", body = ServerStatusPage),
        (status = 302, description = "Redirect to login or away from admin pages"),
        (status = 502, description = "Backend query failed")
    )
)]
pub async fn server_status_page(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<PageResult<ServerStatusPage>>, LoadError> {
    let api = state.api.as_ref();
    let session_ref = &session;

    let page = load_guarded(
        state.gate.as_ref(),
        session_ref,
        Requirement::Admin,
        SERVER_STATUS_TITLE,
        move || async move {
            let stats = api.get_server_statistics(session_ref).await?;
            Ok::<_, ApiError>(ServerStatusPage { stats })
        },
    )
    .await?;

    Ok(Json(page))
}

/// system_settings_page
///
/// [Admin Page] The backend's full system configuration.
#[utoipa::path(
    get,
    path = "/admin/system-settings",
    responses(
        (status = 200, description = "Page data, plus `meta.title`", body = SystemSettingsPage),
        (status = 302, description = "Redirect to login or away from admin pages"),
        (status = 502, description = "Backend query failed")
    )
)]
pub async fn system_settings_page(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<PageResult<SystemSettingsPage>>, LoadError> {
    let api = state.api.as_ref();
    let session_ref = &session;

    let page = load_guarded(
        state.gate.as_ref(),
        session_ref,
        Requirement::Admin,
        SYSTEM_SETTINGS_TITLE,
        move || async move {
            let configs = api.get_config(session_ref).await?;
            Ok::<_, ApiError>(SystemSettingsPage { configs })
        },
    )
    .await?;

    Ok(Json(page))
}
