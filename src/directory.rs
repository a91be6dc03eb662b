// src/directory.rs
use crate::error::{DirectoryError, Result};
use crate::models::{MessageWithPeer, NewUser, ReceivedMessage, RegisteredUser, SentMessage, UserDetail, UserSummary};
use crate::password::{hash_password, verify_password};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

/// Account storage and authentication over the `users` and `messages` tables.
///
/// Holds no state besides the injected pool and the bcrypt work factor, so
/// clones are cheap and may be handed to every connection task.
#[derive(Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
    work_factor: u32,
}

impl UserDirectory {
    pub fn new(pool: SqlitePool, work_factor: u32) -> Self {
        Self { pool, work_factor }
    }

    /// Creates an account. The returned record carries the stored hash, never the plaintext.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: NewUser) -> Result<RegisteredUser> {
        if input.username.is_empty() {
            return Err(DirectoryError::Validation("username cannot be empty".to_string()));
        }
        let hashed = hash_password(&input.password, self.work_factor).await?;
        let now = Utc::now();

        let res = sqlx::query_as::<_, RegisteredUser>(
            r#"
            INSERT INTO users (username, password, first_name, last_name, phone, join_at, last_login_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING username, password, first_name, last_name, phone
            "#,
        )
        .bind(&input.username)
        .bind(&hashed)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(user) => {
                info!("user registered");
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DirectoryError::DuplicateUser(input.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// True iff the user exists and the password matches. Unknown users are
    /// indistinguishable from a wrong password.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let stored: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        let Some(hashed) = stored else {
            debug!("no such user");
            return Ok(false);
        };

        verify_password(password, &hashed).await
    }

    #[instrument(skip(self))]
    pub async fn update_login_timestamp(&self, username: &str) -> Result<()> {
        let res = sqlx::query("UPDATE users SET last_login_at = ? WHERE username = ?")
            .bind(Utc::now())
            .bind(username)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(DirectoryError::NotFound("user does not exist".to_string()));
        }
        Ok(())
    }

    /// Basic profile of every user, in storage order.
    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT username, first_name, last_name, phone FROM users ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, username: &str) -> Result<UserDetail> {
        sqlx::query_as::<_, UserDetail>(
            r#"
            SELECT username, first_name, last_name, phone, join_at, last_login_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("The user: {username} does not exist")))
    }

    /// Every message sent by `username`, with the recipient's profile embedded.
    #[instrument(skip(self))]
    pub async fn messages_from(&self, username: &str) -> Result<Vec<SentMessage>> {
        self.ensure_exists(username).await?;

        let rows = sqlx::query_as::<_, MessageWithPeer>(
            r#"
            SELECT m.id, u.username, u.first_name, u.last_name, u.phone, m.body, m.sent_at, m.read_at
            FROM messages AS m
            JOIN users AS u ON m.to_username = u.username
            WHERE m.from_username = ?
            ORDER BY m.id
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "loaded sent messages");
        Ok(rows.into_iter().map(SentMessage::from).collect())
    }

    /// Every message received by `username`, with the sender's profile embedded.
    #[instrument(skip(self))]
    pub async fn messages_to(&self, username: &str) -> Result<Vec<ReceivedMessage>> {
        self.ensure_exists(username).await?;

        let rows = sqlx::query_as::<_, MessageWithPeer>(
            r#"
            SELECT m.id, u.username, u.first_name, u.last_name, u.phone, m.body, m.sent_at, m.read_at
            FROM messages AS m
            JOIN users AS u ON m.from_username = u.username
            WHERE m.to_username = ?
            ORDER BY m.id
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "loaded received messages");
        Ok(rows.into_iter().map(ReceivedMessage::from).collect())
    }

    async fn ensure_exists(&self, username: &str) -> Result<()> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        match found {
            Some(_) => Ok(()),
            None => Err(DirectoryError::NotFound(format!("The user: {username} does not exist"))),
        }
    }
}
