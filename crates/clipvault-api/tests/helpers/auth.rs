use clipvault_api::auth::JwtAuth;
use std::time::Duration;
use uuid::Uuid;

/// Test JWT secret (must match the app built by `setup_test_app`).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_JWT_ISSUER: &str = "clipvault-access";

pub fn test_auth() -> JwtAuth {
    JwtAuth::new(TEST_JWT_SECRET, TEST_JWT_ISSUER)
}

/// Mint a valid bearer token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    test_auth()
        .issue_token(user_id, Duration::from_secs(300))
        .expect("Failed to issue test token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
