//! Session store against a live backend over demo identities

use college_admin_backend::{
    auth::JwtService, config::AppConfig, repositories::IdentityStore, routes, state::AppState,
};
use college_admin_client::{
    ApiClient, ClientConfig, MemoryStorage, SessionState, SessionStore, TokenStorage,
};
use college_admin_shared::Role;
use secrecy::SecretString;
use std::time::Duration;

const SECRET: &str = "session-flow-secret-for-tests-only-32+";

/// Serve the full router on an ephemeral port, returning the API root
async fn spawn_backend() -> String {
    let mut config = AppConfig::default();
    config.jwt.secret = Some(SecretString::new(SECRET.to_string()));

    let store = IdentityStore::demo().expect("demo registry");
    let state = AppState::new(config, store).expect("state");
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{}/api", addr)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&ClientConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("client")
}

#[tokio::test]
async fn test_login_reload_logout() {
    let base_url = spawn_backend().await;
    let storage = MemoryStorage::new();

    let mut store = SessionStore::new(client(&base_url), storage.clone());
    store.login("faculty@example.com", "password123").await;

    assert!(store.is_authenticated());
    assert_eq!(store.user().map(|u| u.role), Some(Role::Faculty));
    assert!(storage.load().unwrap().is_some());

    // A second store over the same storage behaves like a page reload
    let mut reloaded = SessionStore::new(client(&base_url), storage.clone());
    assert!(reloaded.is_loading());
    reloaded.check_auth().await;

    assert!(reloaded.is_authenticated());
    assert!(!reloaded.is_loading());
    assert_eq!(reloaded.user().map(|u| u.id), Some("2".to_string()));

    reloaded.logout().await;
    assert_eq!(reloaded.state(), SessionState::default());
    assert_eq!(storage.load().unwrap(), None);
}

#[tokio::test]
async fn test_wrong_password_reports_server_message() {
    let base_url = spawn_backend().await;
    let mut store = SessionStore::new(client(&base_url), MemoryStorage::new());

    store.login("admin@example.com", "nope").await;

    assert!(!store.is_authenticated());
    assert_eq!(store.error().as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_expired_token_is_dropped_on_check() {
    let base_url = spawn_backend().await;
    let expired = JwtService::new(SECRET, -10)
        .issue("1", Role::Admin)
        .expect("issue");
    let storage = MemoryStorage::with_token(expired);

    let mut store = SessionStore::new(client(&base_url), storage.clone());
    store.check_auth().await;

    assert_eq!(store.state(), SessionState::default());
    assert_eq!(storage.load().unwrap(), None);
}
