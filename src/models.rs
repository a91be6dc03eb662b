// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registration input. The password is plaintext and is hashed before storage.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

// Hand-written so the plaintext password never reaches a log line.
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .finish()
    }
}

/// Row returned by registration; `password` holds the bcrypt hash.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RegisteredUser {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Public profile fields, used in listings and embedded in messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserDetail {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A message as seen by its sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: i64,
    pub to_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A message as seen by its recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub id: i64,
    pub from_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Flat join row: a message plus the profile of the other party.
#[derive(Debug, FromRow)]
pub(crate) struct MessageWithPeer {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl MessageWithPeer {
    fn peer(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl From<MessageWithPeer> for SentMessage {
    fn from(row: MessageWithPeer) -> Self {
        Self {
            id: row.id,
            to_user: row.peer(),
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
        }
    }
}

impl From<MessageWithPeer> for ReceivedMessage {
    fn from(row: MessageWithPeer) -> Self {
        Self {
            id: row.id,
            from_user: row.peer(),
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
        }
    }
}
