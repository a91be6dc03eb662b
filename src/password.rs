// src/password.rs
//! bcrypt hashing and verification. Both run on the blocking pool since a
//! single hash at a production work factor takes hundreds of milliseconds.

use crate::error::{DirectoryError, Result};
use tokio::task;
use tracing::{debug, instrument};

#[instrument(skip(plain))]
pub async fn hash_password(plain: &str, work_factor: u32) -> Result<String> {
    if plain.is_empty() {
        return Err(DirectoryError::Validation("password cannot be empty".to_string()));
    }
    let plain = plain.to_owned();
    let hashed = task::spawn_blocking(move || bcrypt::hash(plain, work_factor))
        .await
        .map_err(|e| DirectoryError::Internal(format!("hashing task failed: {e}")))??;
    debug!("password hashed");
    Ok(hashed)
}

/// Returns `Ok(false)` on mismatch. A stored hash that cannot be parsed is an error.
#[instrument(skip_all)]
pub async fn verify_password(plain: &str, hashed: &str) -> Result<bool> {
    let plain = plain.to_owned();
    let hashed = hashed.to_owned();
    let matches = task::spawn_blocking(move || bcrypt::verify(plain, &hashed))
        .await
        .map_err(|e| DirectoryError::Internal(format!("verification task failed: {e}")))??;
    debug!(matches, "password verified");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_is_salted_and_verifiable() {
        let first = hash_password("correct horse", 4).await.unwrap();
        let second = hash_password("correct horse", 4).await.unwrap();

        assert_ne!(first, "correct horse");
        assert_ne!(first, second);
        assert!(verify_password("correct horse", &first).await.unwrap());
        assert!(verify_password("correct horse", &second).await.unwrap());
        assert!(!verify_password("battery staple", &first).await.unwrap());
    }

    #[tokio::test]
    async fn work_factor_is_encoded_in_hash() {
        let hashed = hash_password("pw", 5).await.unwrap();
        assert!(hashed.starts_with("$2b$05$"), "unexpected hash prefix: {hashed}");
    }

    #[tokio::test]
    async fn empty_password_is_rejected() {
        let err = hash_password("", 4).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let err = verify_password("pw", "not-a-bcrypt-hash").await.unwrap_err();
        assert!(matches!(err, DirectoryError::Hash(_)));
    }
}
