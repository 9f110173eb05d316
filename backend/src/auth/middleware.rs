//! Session guard
//!
//! Resolves the caller's identity from a session token and attaches it to
//! the request. Available as an extractor (`AuthUser`) for single handlers
//! and as a middleware (`session_guard`) for route groups.
//!
//! The token is read from `Authorization: Bearer <token>`, or from the
//! session cookie when no bearer header is present.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use college_admin_shared::{AuthError, Role};
use tracing::debug;

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

/// Pick the session token out of the request headers
///
/// A bearer `Authorization` header is the only source when present, even if
/// its value is empty. Any other `Authorization` value is ignored and the
/// cookie is consulted instead.
pub fn extract_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    if let Some(bearer) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        let token = bearer.trim();
        return (!token.is_empty()).then_some(token);
    }

    cookie_value(headers, cookie_name)
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Verify the request's token and resolve the identity it asserts
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let Some(token) = extract_token(headers, &state.config().jwt.cookie_name) else {
        debug!("Rejecting request without session token");
        return Err(AuthError::MissingToken.into());
    };

    let claims = state.jwt().verify(token).map_err(|reason| {
        debug!(%reason, "Rejecting session token");
        ApiError::from(AuthError::InvalidToken)
    })?;

    Ok(AuthUser {
        id: claims.sub,
        role: claims.role,
    })
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by `session_guard` further out
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, &parts.headers)
    }
}

/// Middleware attaching `AuthUser` to request extensions
///
/// Requests without a valid token are answered with 401 and never reach the
/// inner service.
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
