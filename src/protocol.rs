// src/protocol.rs
use crate::models::{Message, ReceivedMessage, SentMessage, UserDetail, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "action")]
pub enum ClientRequest {
    #[serde(rename = "register")]
    Register {
        username: String,
        password: String,
        first_name: String,
        last_name: String,
        phone: String,
    },
    #[serde(rename = "login")]
    Login {
        username: String,
        password: String,
    },
    #[serde(rename = "list_users")]
    ListUsers,
    #[serde(rename = "get_user")]
    GetUser {
        username: String,
    },
    #[serde(rename = "messages_from")]
    MessagesFrom {
        username: String,
    },
    #[serde(rename = "messages_to")]
    MessagesTo {
        username: String,
    },
    #[serde(rename = "send_message")]
    SendMessage {
        to_username: String,
        body: String,
    },
    #[serde(rename = "read_message")]
    ReadMessage {
        id: i64,
    },
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "action")]
pub enum ServerResponse {
    #[serde(rename = "auth_response")]
    AuthResponse {
        status: String,
        message: String,
    },
    #[serde(rename = "users")]
    Users {
        users: Vec<UserSummary>,
    },
    #[serde(rename = "user")]
    User {
        user: UserDetail,
    },
    #[serde(rename = "sent_messages")]
    SentMessages {
        messages: Vec<SentMessage>,
    },
    #[serde(rename = "received_messages")]
    ReceivedMessages {
        messages: Vec<ReceivedMessage>,
    },
    #[serde(rename = "message")]
    Message {
        message: Message,
    },
    #[serde(rename = "message_read")]
    MessageRead {
        id: i64,
        read_at: DateTime<Utc>,
    },
    #[serde(rename = "error")]
    Error {
        code: u16,
        message: String,
    },
}

impl ServerResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        ServerResponse::AuthResponse {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        ServerResponse::Error {
            code,
            message: message.into(),
        }
    }
}
