mod common;

use admin_console::{
    AppState, create_router,
    api::{AdminApi, ApiState, HttpAdminApi},
    auth::Session,
    errors::ApiError,
};
use axum::{
    Json, Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use common::{body_json, create_token, test_config};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::util::ServiceExt;
use uuid::Uuid;

const BACKEND_USER_ID: Uuid = Uuid::from_u128(42);

// --- Stub Backend ---

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Bearer "))
}

/// Spawns a backend stub under `/api` and returns its base URL (without trailing slash).
async fn spawn_backend() -> String {
    let api = Router::new()
        .route(
            "/users/me",
            get(|headers: HeaderMap| async move {
                if !has_bearer(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({
                    "id": BACKEND_USER_ID,
                    "email": "admin@backend.test",
                    "name": "Backend Admin",
                    "isAdmin": true,
                    "shouldChangePassword": false
                }))
                .into_response()
            }),
        )
        .route(
            "/jobs",
            get(|| async { Json(json!([{ "name": "thumbnailGeneration", "active": 2, "waiting": 0 }])) }),
        )
        .route(
            "/audit/file-report",
            get(|| async {
                Json(json!({
                    "orphans": [{
                        "entityId": "00000000-0000-0000-0000-000000000007",
                        "entityType": "asset",
                        "pathType": "original",
                        "pathValue": "/library/a.jpg"
                    }],
                    "extras": ["file1.jpg"]
                }))
            }),
        )
        .route(
            "/server-info/statistics",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{not json") }),
        )
        .route(
            "/system-config",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }),
        );

    let app = Router::new().nest("/api", api);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}/api", port)
}

fn session() -> Session {
    Session::new(Some("backend-token".to_string()), "/admin")
}

// --- Client Tests ---

#[tokio::test]
async fn test_client_rejects_invalid_base_url() {
    let result = HttpAdminApi::new("not a url", Duration::from_secs(1));
    assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_client_keeps_base_path() {
    let client = HttpAdminApi::new("http://backend.test/api", Duration::from_secs(1)).unwrap();
    assert_eq!(client.base_url().as_str(), "http://backend.test/api/");
}

#[tokio::test]
async fn test_client_forwards_session_token() {
    let base = spawn_backend().await;
    let client = HttpAdminApi::new(&base, Duration::from_secs(5)).unwrap();

    let user = client.get_my_user(&session()).await.unwrap();
    assert_eq!(user.id, BACKEND_USER_ID);
    assert!(user.is_admin);

    let anonymous = client.get_my_user(&Session::new(None, "/admin")).await;
    match anonymous {
        Err(ApiError::Status { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
        other => panic!("expected 401, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_decodes_resources() {
    let base = spawn_backend().await;
    let client = HttpAdminApi::new(&base, Duration::from_secs(5)).unwrap();

    let jobs = client.get_all_jobs_status(&session()).await.unwrap();
    assert_eq!(jobs[0]["name"], "thumbnailGeneration");

    let audit = client.get_audit_files(&session()).await.unwrap();
    assert_eq!(audit.orphans.len(), 1);
    assert_eq!(audit.orphans[0].entity_type, "asset");
    assert_eq!(audit.orphans[0].checksum, None);
    assert_eq!(audit.extras, vec!["file1.jpg".to_string()]);
}

#[tokio::test]
async fn test_client_reports_decode_failure() {
    let base = spawn_backend().await;
    let client = HttpAdminApi::new(&base, Duration::from_secs(5)).unwrap();

    let result = client.get_server_statistics(&session()).await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_client_reports_error_status() {
    let base = spawn_backend().await;
    let client = HttpAdminApi::new(&base, Duration::from_secs(5)).unwrap();

    match client.get_config(&session()).await {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_reports_transport_failure() {
    // Reserve a port, then free it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client =
        HttpAdminApi::new(&format!("http://127.0.0.1:{}/api", port), Duration::from_secs(2)).unwrap();

    let result = client.get_all_jobs_status(&session()).await;
    assert!(matches!(result, Err(ApiError::Transport(_))));
}

// --- End to End ---

#[tokio::test]
async fn test_pages_served_from_real_backend_client() {
    let base = spawn_backend().await;
    let client = HttpAdminApi::new(&base, Duration::from_secs(5)).unwrap();
    let state = AppState::new(Arc::new(client) as ApiState, test_config());
    let token = create_token(BACKEND_USER_ID, 3600);

    let repair = create_router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/admin/repair")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(repair.status(), StatusCode::OK);
    let body = body_json(repair).await;
    assert_eq!(body["extras"], json!(["file1.jpg"]));
    assert_eq!(body["orphans"][0]["pathValue"], "/library/a.jpg");
    assert_eq!(body["meta"]["title"], "修复");

    let settings = create_router(state)
        .oneshot(
            Request::builder()
                .uri("/admin/system-settings")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(settings.status(), StatusCode::BAD_GATEWAY);
}
