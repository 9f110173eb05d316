//! College Admin Backend
//!
//! Authentication API for the college administration front end.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: login and identity lookups
//! - Repositories: the in-memory identity registry
//! - Auth: JWT session tokens, session guard, role gate
//!
//! Run `college-admin-backend hash-password` to hash a password read from
//! stdin for use in an identity seed file.

use anyhow::{Context, Result};
use college_admin_backend::{
    auth::PasswordService,
    config::AppConfig,
    repositories::IdentityStore,
    routes,
    state::AppState,
};
use std::io::BufRead;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    if std::env::args().nth(1).as_deref() == Some("hash-password") {
        return hash_password_from_stdin().await;
    }

    // Load and validate configuration
    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        "Starting College Admin Backend"
    );

    config.validate()?;

    let identities = load_identities(&config).await?;
    if identities.is_empty() {
        warn!("Identity registry is empty, every login will be rejected");
    } else {
        info!(count = identities.len(), "Identity registry loaded");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = AppState::new(config, identities)?;

    // Build application
    let app = routes::create_router(state);

    // Start server
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Load the identity registry from the seed file, or the demo accounts
///
/// Validation has already rejected a missing seed file in production.
async fn load_identities(config: &AppConfig) -> Result<IdentityStore> {
    match &config.identities.seed_file {
        Some(path) => {
            info!(path = %path.display(), "Loading identity seed file");
            IdentityStore::from_toml_file(path)
        }
        None => {
            warn!("No identities.seed_file configured, using demo accounts");
            tokio::task::spawn_blocking(IdentityStore::demo)
                .await
                .context("Demo registry task failed")?
        }
    }
}

/// Read one password line from stdin and print its argon2 hash
async fn hash_password_from_stdin() -> Result<()> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    let hash = PasswordService::hash_async(password).await?;
    println!("{}", hash);
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "college_admin_backend=info,tower_http=info".into()
        } else {
            "college_admin_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
