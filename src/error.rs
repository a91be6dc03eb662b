// src/error.rs
use thiserror::Error;

/// Errors surfaced by the user directory and the message store.
///
/// Every kind maps onto an HTTP-like status code so a calling layer can
/// translate failures without inspecting messages.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user already exists: {0}")]
    DuplicateUser(String),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DirectoryError {
    pub fn status_code(&self) -> u16 {
        match self {
            DirectoryError::DuplicateUser(_) => 409,
            DirectoryError::NotFound(_) => 404,
            DirectoryError::Validation(_) => 400,
            DirectoryError::Config(_)
            | DirectoryError::Hash(_)
            | DirectoryError::Database(_)
            | DirectoryError::Internal(_) => 500,
        }
    }

    /// Message safe to hand back to a remote peer. Internal failures are
    /// collapsed so store or hashing details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            DirectoryError::DuplicateUser(_)
            | DirectoryError::NotFound(_)
            | DirectoryError::Validation(_) => self.to_string(),
            _ => "internal server error".to_string(),
        }
    }
}

pub type Result<T, E = DirectoryError> = std::result::Result<T, E>;
