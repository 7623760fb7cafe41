//! InviteHub Server: collaborative wedding invitation backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use invitehub_api::{AppState, run_server};
use invitehub_auth::{IdentityVerifier, StaticIdentityVerifier};
use invitehub_core::config::AppConfig;
use invitehub_core::error::AppError;
use invitehub_core::traits::{Clock, IdGenerator, OsIdGenerator, SystemClock};
use invitehub_database::DatabasePool;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `INVITEHUB_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("INVITEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting InviteHub");

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    db_pool.prepare(&config.database).await?;

    // ── Step 2: Providers ────────────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids: Arc<dyn IdGenerator> = Arc::new(OsIdGenerator);

    // The identity-provider verifier is deployed separately; without it
    // every login is rejected.
    if config.auth.google_client_id.is_empty() {
        tracing::warn!("auth.google_client_id is not set; logins will be rejected");
    }
    let verifier: Arc<dyn IdentityVerifier> = Arc::new(StaticIdentityVerifier::new());

    // ── Step 3: Services and HTTP server ─────────────────────────
    let state = AppState::build(config, db_pool.stores(), clock, ids, verifier)?;

    run_server(state).await?;
    db_pool.close().await;
    Ok(())
}
