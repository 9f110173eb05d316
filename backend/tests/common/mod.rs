//! Common test utilities for integration tests
//!
//! Builds the full router over the demo identity registry.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use college_admin_backend::{
    config::AppConfig, repositories::IdentityStore, routes, state::AppState,
};
use secrecy::SecretString;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application over the demo accounts
    pub fn new() -> Self {
        Self::with_store(IdentityStore::demo().expect("Failed to build demo registry"))
    }

    pub fn with_store(store: IdentityStore) -> Self {
        let state = AppState::new(test_config(), store).expect("Failed to build state");
        let app = routes::create_router(state.clone());

        Self { app, state }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.jwt.secret = Some(SecretString::new(TEST_SECRET.to_string()));
    config
}
