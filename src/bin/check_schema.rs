//! Prints a column report for the `grocery_items` table and exits.

use std::process::ExitCode;

use grocery::{
    config::Config,
    database::{describe_grocery_items, init_pool},
};
use tracing::error;
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

    // Close the pool whether or not the query succeeded.
    let result = describe_grocery_items(&pool).await;
    pool.close().await;

    let columns = match result {
        Ok(columns) => columns,
        Err(e) => {
            error!("Failed to inspect schema: {e}");
            return ExitCode::FAILURE;
        }
    };

    if columns.is_empty() {
        println!("grocery_items: table not found");
        return ExitCode::SUCCESS;
    }

    println!("grocery_items columns:");
    for column in columns {
        println!(
            "  {} {} nullable={} default={}",
            column.column_name,
            column.data_type,
            column.is_nullable,
            column.column_default.as_deref().unwrap_or("none"),
        );
    }

    ExitCode::SUCCESS
}
