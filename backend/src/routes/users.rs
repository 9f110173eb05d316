//! Identity directory routes
//!
//! Read-only views over the identity registry, restricted by role:
//! listing is admin-only, single lookups are open to admin and faculty.

use crate::auth::{enforce_roles, session_guard, AuthUser, RoleGate};
use crate::error::ApiResult;
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};
use college_admin_shared::{Role, User};
use tracing::debug;

/// Create user directory routes
///
/// The session guard wraps every route here; each group then applies its
/// own role gate.
pub fn users_routes(state: AppState) -> Router<AppState> {
    let admin_only = Router::new()
        .route("/", get(list_users))
        .route_layer(from_fn_with_state(RoleGate::new([Role::Admin]), enforce_roles));

    let staff = Router::new()
        .route("/:id", get(get_user))
        .route_layer(from_fn_with_state(
            RoleGate::new([Role::Admin, Role::Faculty]),
            enforce_roles,
        ));

    admin_only
        .merge(staff)
        .route_layer(from_fn_with_state(state, session_guard))
}

/// List all users
///
/// GET /api/users
async fn list_users(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
) -> Json<Vec<User>> {
    debug!(requester = %requester.id, "Listing users");
    Json(AuthService::list_users(state.identities()))
}

/// Get one user
///
/// GET /api/users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(AuthService::find_user(state.identities(), &id)?))
}
