//! Route definitions for the College Admin API
//!
//! This module organizes all API routes and applies middleware.

use crate::error::{panic_response, ApiError};
use crate::state::AppState;
use axum::{
    body::HttpBody,
    http::{header, HeaderValue, Method},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use college_admin_shared::ErrorBody;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

mod auth;
mod health;
mod users;


pub use auth::auth_routes;
pub use users::users_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config().server.request_timeout_secs);
    let cors = cors_layer(&state.config().server.client_url);

    Router::new()
        .nest("/api", api_routes(state.clone()))
        .fallback(not_found)
        // Apply middleware layers
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(map_response(fill_empty_error_body))
        .with_state(state)
}

/// API routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth::auth_routes())
        .nest("/users", users::users_routes(state))
}

fn cors_layer(client_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(client_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!(client_url, "Invalid CORS origin, cross-origin requests disabled");
            AllowOrigin::list(Vec::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Give bodiless error responses (405, 408, ...) the uniform error body
///
/// Headers set further in, such as CORS and request ids, are kept.
async fn fill_empty_error_body(response: Response) -> Response {
    let status = response.status();
    let is_error = status.is_client_error() || status.is_server_error();
    if !is_error || response.body().size_hint().exact() != Some(0) {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Request failed");
    let (_, body) = Json(ErrorBody::new(status.as_u16(), message))
        .into_response()
        .into_parts();

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, body)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
