//! Role gate
//!
//! Restricts a route group to a fixed set of roles. Must be layered inside
//! `session_guard`, which supplies the `AuthUser` it inspects.

use super::AuthUser;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use college_admin_shared::{AuthError, Role};
use std::sync::Arc;
use tracing::{debug, warn};

/// Allowed role set for one route group
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<[Role]>,
}

impl RoleGate {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Admit or reject the identity attached by the session guard
    pub fn check(&self, user: Option<&AuthUser>) -> Result<(), ApiError> {
        let Some(user) = user else {
            warn!("Role gate reached without an authenticated identity");
            return Err(AuthError::Forbidden.into());
        };

        if !self.allows(user.role) {
            debug!(user_id = %user.id, role = %user.role, "Role not permitted");
            return Err(AuthError::Forbidden.into());
        }

        Ok(())
    }
}

/// Middleware applying a `RoleGate`
///
/// Use with `axum::middleware::from_fn_with_state(gate, enforce_roles)`.
pub async fn enforce_roles(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate.check(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}
