// src/db.rs
use crate::config::Config;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Opens the connection pool. The caller owns the pool and closes it on shutdown.
pub async fn init_db_pool(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    tracing::info!(max_connections = config.max_connections, "database pool opened");
    Ok(pool)
}

/// Creates the users and messages tables if they are missing.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY NOT NULL,
            password TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            join_at TEXT NOT NULL,
            last_login_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            from_username TEXT NOT NULL REFERENCES users(username),
            to_username TEXT NOT NULL REFERENCES users(username),
            body TEXT NOT NULL,
            sent_at TEXT NOT NULL,
            read_at TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("schema ready");
    Ok(())
}
