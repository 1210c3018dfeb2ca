//! Runs the idempotent schema bootstrap once and exits.
//!
//! Exits non-zero on failure so deploy tooling can detect a broken migration.

use std::process::ExitCode;

use grocery::{
    config::Config,
    database::{init_pool, initialize_database},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();

    let pool = match init_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = initialize_database(&pool).await;
    pool.close().await;

    match result {
        Ok(()) => {
            info!("Migration complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Migration failed: {e}");
            ExitCode::FAILURE
        }
    }
}
