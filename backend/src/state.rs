//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! State is built once at startup and is read-only while serving, so
//! handlers never contend on it.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::IdentityStore;
use anyhow::Result;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Shared application state
///
/// All fields are Arc'd or Arc-backed, so cloning per request is O(1).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token codec with keys derived from the configured secret
    pub jwt: JwtService,
    /// Read-only identity registry
    pub identities: Arc<IdentityStore>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when no signing secret is configured.
    pub fn new(config: AppConfig, identities: IdentityStore) -> Result<Self> {
        let jwt = JwtService::new(
            config.jwt.secret()?.expose_secret(),
            config.jwt.token_ttl_secs,
        );

        Ok(Self {
            config: Arc::new(config),
            jwt,
            identities: Arc::new(identities),
        })
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get a reference to the identity registry
    #[inline]
    pub fn identities(&self) -> &IdentityStore {
        &self.identities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use college_admin_shared::Role;
    use secrecy::SecretString;

    #[test]
    fn test_state_requires_secret() {
        let store = IdentityStore::new(Vec::new()).unwrap();
        assert!(AppState::new(AppConfig::default(), store).is_err());
    }

    #[test]
    fn test_jwt_service_is_precomputed() {
        let mut config = AppConfig::default();
        config.jwt.secret = Some(SecretString::new("state-test-secret".to_string()));
        let state = AppState::new(config, IdentityStore::new(Vec::new()).unwrap()).unwrap();

        // Clone should be O(1) - just Arc increments
        let cloned = state.clone();

        let token = state.jwt().issue("1", Role::Admin).unwrap();
        assert_eq!(cloned.jwt().verify(&token).unwrap().sub, "1");
        assert_eq!(cloned.jwt().ttl_secs(), 86400);
    }
}
