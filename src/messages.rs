// src/messages.rs
use crate::error::{DirectoryError, Result};
use crate::models::Message;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, instrument};

/// Longest accepted message body, in bytes.
pub const MAX_BODY_LEN: usize = 8 * 1024;

/// Writes to the `messages` table. The directory only ever reads it.
#[derive(Clone)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, body))]
    pub async fn create(&self, from_username: &str, to_username: &str, body: &str) -> Result<Message> {
        if body.is_empty() || body.len() > MAX_BODY_LEN {
            return Err(DirectoryError::Validation(format!(
                "message body must be between 1 and {MAX_BODY_LEN} bytes"
            )));
        }
        let res = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (from_username, to_username, body, sent_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, from_username, to_username, body, sent_at, read_at
            "#,
        )
        .bind(from_username)
        .bind(to_username)
        .bind(body)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(message) => {
                info!(id = message.id, "message stored");
                Ok(message)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(
                DirectoryError::NotFound(format!("no such user: {from_username} or {to_username}")),
            ),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Message> {
        sqlx::query_as::<_, Message>(
            "SELECT id, from_username, to_username, body, sent_at, read_at FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("no such message: {id}")))
    }

    /// Stamps `read_at` with the current time.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: i64) -> Result<(i64, DateTime<Utc>)> {
        let read_at = Utc::now();
        let res = sqlx::query("UPDATE messages SET read_at = ? WHERE id = ?")
            .bind(read_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(format!("no such message: {id}")));
        }
        Ok((id, read_at))
    }
}
