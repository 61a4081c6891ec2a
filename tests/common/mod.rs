#![allow(dead_code)]

use admin_console::{
    AppConfig, AppState,
    api::{ApiState, MOCK_ADMIN_ID, MockAdminApi},
    auth::Claims,
    models::UserInfo,
};
use axum::body::Body;
use axum::response::Response;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

/// Signs a session token for `user_id` expiring `exp_offset` seconds from now
/// (negative for an already expired token).
pub fn create_token(user_id: Uuid, exp_offset: i64) -> String {
    create_token_with_secret(user_id, exp_offset, TEST_JWT_SECRET)
}

pub fn create_token_with_secret(user_id: Uuid, exp_offset: i64, secret: &str) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// A token for the administrator the mock backend resolves sessions to.
pub fn admin_token() -> String {
    create_token(MOCK_ADMIN_ID, 3600)
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt_secret = TEST_JWT_SECRET.to_string();
    config
}

pub fn create_app_state(api: Arc<MockAdminApi>) -> AppState {
    AppState::new(api as ApiState, test_config())
}

pub fn user(id: Uuid, is_admin: bool) -> UserInfo {
    UserInfo {
        id,
        email: format!("user_{}@example.com", id.simple()),
        name: "Test User".to_string(),
        is_admin,
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
