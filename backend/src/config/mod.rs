//! Configuration management for the College Admin backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: CA__)
//!
//! The JWT signing secret has no default. It must come from a config file or
//! the environment, and startup fails without it.

use crate::auth::MAX_TOKEN_TTL_SECS;
use anyhow::{bail, Result};
use axum::http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub identities: IdentitiesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Origin of the browser front end, allowed by CORS with credentials
    pub client_url: String,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: Option<SecretString>,
    pub token_ttl_secs: i64,
    pub cookie_name: String,
    /// Also deliver the token as an HttpOnly cookie on login
    pub set_cookie: bool,
}

/// Credential store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentitiesConfig {
    /// TOML file holding the identity registry
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
            client_url: "http://localhost:5173".to_string(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_ttl_secs: 86400, // 24 hours
            cookie_name: "token".to_string(),
            set_cookie: false,
        }
    }
}

impl JwtConfig {
    /// The configured signing secret
    pub fn secret(&self) -> Result<&SecretString> {
        match &self.secret {
            Some(secret) if !secret.expose_secret().is_empty() => Ok(secret),
            _ => bail!("jwt.secret is not configured (set CA__JWT__SECRET)"),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with CA__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let defaults = AppConfig::default();
        let config = config::Config::builder()
            // Start with defaults
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "server.request_timeout_secs",
                defaults.server.request_timeout_secs as i64,
            )?
            .set_default("server.client_url", defaults.server.client_url)?
            .set_default("jwt.token_ttl_secs", defaults.jwt.token_ttl_secs)?
            .set_default("jwt.cookie_name", defaults.jwt.cookie_name)?
            .set_default("jwt.set_cookie", defaults.jwt.set_cookie)?
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (CA__ prefix)
            // e.g., CA__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("CA").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Reject configurations the server must not start with
    pub fn validate(&self) -> Result<()> {
        self.validate_for(Self::is_production())
    }

    pub(crate) fn validate_for(&self, production: bool) -> Result<()> {
        let mut errors = Vec::new();

        match self.jwt.secret() {
            Ok(secret) => {
                let secret = secret.expose_secret();
                if production && (secret.contains("development") || secret.len() < 32) {
                    errors.push(
                        "JWT secret must be at least 32 characters and not contain 'development'"
                            .to_string(),
                    );
                }
            }
            Err(e) => errors.push(e.to_string()),
        }

        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.jwt.token_ttl_secs) {
            errors.push(format!(
                "jwt.token_ttl_secs must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            ));
        }

        if HeaderValue::from_str(&self.server.client_url).is_err() {
            errors.push(format!(
                "server.client_url is not a valid origin: {}",
                self.server.client_url
            ));
        }

        if production && self.identities.seed_file.is_none() {
            errors.push("identities.seed_file must be set in production".to_string());
        }

        if !errors.is_empty() {
            for err in &errors {
                tracing::error!("Configuration error: {}", err);
            }
            bail!("Invalid configuration: {}", errors.join("; "));
        }

        Ok(())
    }
}
