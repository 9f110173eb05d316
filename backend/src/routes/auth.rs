//! Authentication routes
//!
//! Login, logout, and current-identity endpoints. Tokens are returned in the
//! login response body; when `jwt.set_cookie` is enabled they are also set as
//! an HttpOnly cookie, which logout clears.

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use college_admin_shared::{LoginRequest, MessageResponse, User};
use validator::Validate;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(current_user))
}

/// Login with email and password
///
/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;
    req.validate()?;

    let response =
        AuthService::login(state.identities(), state.jwt(), &req.email, &req.password).await?;

    let mut headers = HeaderMap::new();
    if state.config().jwt.set_cookie {
        let max_age = state.jwt().ttl_secs();
        headers.insert(SET_COOKIE, session_cookie(state.config(), &response.token, max_age)?);
    }

    Ok((headers, Json(response)).into_response())
}

/// Acknowledge logout
///
/// POST /api/auth/logout
///
/// Tokens are stateless, so there is nothing to revoke server-side.
async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let mut headers = HeaderMap::new();
    if state.config().jwt.set_cookie {
        headers.insert(SET_COOKIE, session_cookie(state.config(), "", 0)?);
    }

    let body = MessageResponse {
        message: "Logged out successfully".to_string(),
    };
    Ok((headers, Json(body)).into_response())
}

/// Get the identity behind the session token
///
/// GET /api/auth/me
async fn current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<User>> {
    let user = AuthService::current_user(state.identities(), Some(&auth_user))?;
    Ok(Json(user))
}

fn session_cookie(config: &AppConfig, token: &str, max_age: i64) -> ApiResult<HeaderValue> {
    let secure = if AppConfig::is_production() { "; Secure" } else { "" };
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        config.jwt.cookie_name, token, max_age, secure
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid session cookie: {}", e)))
}
