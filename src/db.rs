use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::AppConfig;

/// Opens (creating if needed) the local SQLite database and applies migrations.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    connect_url(&config.database_url, config.max_connections).await
}

pub async fn connect_url(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {}", database_url))?
        .create_if_missing(true);

    // every connection to `sqlite::memory:` opens its own database, and the
    // data disappears with the connection
    let in_memory = database_url.contains(":memory:");
    let max_connections = if in_memory { 1 } else { max_connections.max(1) };

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        pool_options = pool_options
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .context("connect to sqlite database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("run sqlite migrations")?;

    tracing::debug!(database_url, max_connections, "sqlite database ready");
    Ok(pool)
}
