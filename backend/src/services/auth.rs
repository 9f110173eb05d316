//! Authentication service
//!
//! Login, current-identity lookup, and identity directory reads.
//!
//! Unknown emails and wrong passwords produce the same `Invalid credentials`
//! error so callers cannot tell which check failed.

use crate::auth::{AuthUser, JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::IdentityStore;
use college_admin_shared::{AuthError, AuthResponse, User};
use tracing::info;

/// Authentication operations over the identity registry
pub struct AuthService;

impl AuthService {
    /// Check credentials and issue a session token
    ///
    /// Password verification runs on the blocking thread pool.
    pub async fn login(
        store: &IdentityStore,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let Some(identity) = store.find_by_email(email) else {
            PasswordService::verify_dummy_async(password.to_string())
                .await
                .map_err(ApiError::Internal)?;
            info!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };

        let valid = PasswordService::verify_async(
            password.to_string(),
            identity.password_hash.clone(),
        )
        .await
        .map_err(ApiError::Internal)?;

        if !valid {
            info!(user_id = %identity.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = jwt_service
            .issue(&identity.id, identity.role)
            .map_err(ApiError::Internal)?;

        info!(user_id = %identity.id, role = %identity.role, "Login succeeded");

        Ok(AuthResponse {
            user: identity.to_user(),
            token,
        })
    }

    /// Resolve the identity attached by the session guard
    pub fn current_user(store: &IdentityStore, auth_user: Option<&AuthUser>) -> Result<User, ApiError> {
        let auth_user = auth_user.ok_or(AuthError::NotAuthenticated)?;

        store
            .find_by_id(&auth_user.id)
            .map(|identity| identity.to_user())
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// All identities, without credentials
    pub fn list_users(store: &IdentityStore) -> Vec<User> {
        store.list().iter().map(|identity| identity.to_user()).collect()
    }

    /// One identity by id, without credential
    pub fn find_user(store: &IdentityStore, id: &str) -> Result<User, ApiError> {
        store
            .find_by_id(id)
            .map(|identity| identity.to_user())
            .ok_or_else(|| AuthError::UserNotFound.into())
    }
}
