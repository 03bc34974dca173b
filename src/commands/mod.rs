//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::config::Config;

/// Embedded `./migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub(crate) async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set (or run `serve --in-memory`)")?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await
        .context("failed to connect to the database")?;
    tracing::info!(max_connections = config.database_max_connections, "database connected");
    Ok(pool)
}
