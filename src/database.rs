//! # PostgreSQL
//!
//! Relational store for grocery items.
//!
//! Owns the connection pool and the schema lifecycle. The schema is
//! bootstrapped by an ordered list of add-if-missing migration steps, each
//! probed against `information_schema` before executing, all inside a single
//! transaction. Running the bootstrap any number of times yields the same
//! schema as running it once.
//!
//! Row updates are single-statement writes; atomicity under concurrent
//! requests is delegated to PostgreSQL row-level locking. Concurrent updates
//! to the same row are last-writer-wins.

use std::{str::FromStr, time::Duration};

use serde::Serialize;
use sqlx::{
    FromRow, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use tracing::info;

use crate::{config::Config, error::AppError};

/// A grocery item row. Flag columns are nullable in the store; absent means
/// the same as false to consumers.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: i32,
    pub is_purchased: Option<bool>,
    pub is_skipped: Option<bool>,
}

/// One column of the `grocery_items` table, as reported by
/// `information_schema.columns`.
#[derive(Debug, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
    pub column_default: Option<String>,
}

/// Result of a single-row update.
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

struct MigrationStep {
    name: &'static str,
    /// Probe query: returns a row iff the step has already been applied.
    applied: &'static str,
    apply: &'static str,
}

const MIGRATIONS: &[MigrationStep] = &[
    MigrationStep {
        name: "create grocery_items",
        applied: "SELECT 1 FROM information_schema.tables \
                  WHERE table_name = 'grocery_items'",
        apply: "CREATE TABLE grocery_items ( \
                    id SERIAL PRIMARY KEY, \
                    is_purchased BOOLEAN DEFAULT FALSE, \
                    is_skipped BOOLEAN DEFAULT FALSE \
                )",
    },
    MigrationStep {
        name: "add grocery_items.is_skipped",
        applied: "SELECT 1 FROM information_schema.columns \
                  WHERE table_name = 'grocery_items' AND column_name = 'is_skipped'",
        apply: "ALTER TABLE grocery_items ADD COLUMN is_skipped BOOLEAN DEFAULT FALSE",
    },
];

pub async fn init_pool(config: &Config) -> Result<PgPool, AppError> {
    let ssl_mode = if config.production {
        PgSslMode::Require
    } else {
        PgSslMode::Prefer
    };

    let options = PgConnectOptions::from_str(&config.postgres_url)
        .map_err(AppError::Schema)?
        .ssl_mode(ssl_mode);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(AppError::Schema)
}

/// Ensures the `grocery_items` table and its columns exist. Idempotent, safe
/// to call on every startup.
pub async fn initialize_database(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Schema)?;

    for step in MIGRATIONS {
        let already_applied = sqlx::query(step.applied)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Schema)?
            .is_some();

        if already_applied {
            continue;
        }

        sqlx::query(step.apply)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Schema)?;

        info!("Applied migration: {}", step.name);
    }

    tx.commit().await.map_err(AppError::Schema)
}

pub async fn update_item_purchase_status(
    pool: &PgPool,
    item_id: i64,
    is_purchased: bool,
) -> Result<UpdateOutcome, AppError> {
    let result = sqlx::query("UPDATE grocery_items SET is_purchased = $1 WHERE id = $2")
        .bind(is_purchased)
        .bind(item_id)
        .execute(pool)
        .await
        .map_err(AppError::Query)?;

    Ok(outcome(result.rows_affected()))
}

pub async fn update_item_skip_status(
    pool: &PgPool,
    item_id: i64,
    is_skipped: bool,
) -> Result<UpdateOutcome, AppError> {
    let result = sqlx::query("UPDATE grocery_items SET is_skipped = $1 WHERE id = $2")
        .bind(is_skipped)
        .bind(item_id)
        .execute(pool)
        .await
        .map_err(AppError::Query)?;

    Ok(outcome(result.rows_affected()))
}

pub async fn list_items(pool: &PgPool) -> Result<Vec<GroceryItem>, AppError> {
    sqlx::query_as::<_, GroceryItem>(
        "SELECT id, is_purchased, is_skipped FROM grocery_items ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::Query)
}

/// Column report for the schema-check script.
pub async fn describe_grocery_items(pool: &PgPool) -> Result<Vec<ColumnInfo>, AppError> {
    // information_schema columns are sql_identifier domains, cast to text
    // so they decode as plain strings.
    sqlx::query_as::<_, ColumnInfo>(
        "SELECT column_name::text, data_type::text, is_nullable::text, column_default::text \
         FROM information_schema.columns \
         WHERE table_name = 'grocery_items' \
         ORDER BY ordinal_position",
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::Query)
}

fn outcome(rows_affected: u64) -> UpdateOutcome {
    if rows_affected == 0 {
        UpdateOutcome::NotFound
    } else {
        UpdateOutcome::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_names_are_unique() {
        let mut names: Vec<&str> = MIGRATIONS.iter().map(|step| step.name).collect();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), MIGRATIONS.len());
    }

    #[test]
    fn every_migration_has_an_applied_probe() {
        for step in MIGRATIONS {
            assert!(step.applied.contains("information_schema"), "{}", step.name);
        }
    }

    #[test]
    fn zero_rows_affected_is_not_found() {
        assert_eq!(outcome(0), UpdateOutcome::NotFound);
        assert_eq!(outcome(1), UpdateOutcome::Updated);
    }
}
