// src/config.rs
use crate::error::{DirectoryError, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://messagely.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// bcrypt cost; each increment doubles the work per hash.
    pub bcrypt_work_factor: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // .env is optional
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| DirectoryError::Config(format!("invalid DB_MAX_CONNECTIONS: {raw}")))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let bcrypt_work_factor = match lookup("BCRYPT_WORK_FACTOR") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| DirectoryError::Config(format!("invalid BCRYPT_WORK_FACTOR: {raw}")))?,
            None => bcrypt::DEFAULT_COST,
        };

        tracing::info!(
            bind_addr = %bind_addr,
            max_connections,
            bcrypt_work_factor,
            "configuration loaded"
        );

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            bcrypt_work_factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.bcrypt_work_factor, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn work_factor_is_read_from_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("BCRYPT_WORK_FACTOR", "4"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DB_MAX_CONNECTIONS", "1"),
        ]))
        .unwrap();
        assert_eq!(config.bcrypt_work_factor, 4);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn out_of_range_work_factor_is_rejected() {
        for raw in ["3", "32", "twelve"] {
            let err = Config::from_lookup(lookup_from(&[("BCRYPT_WORK_FACTOR", raw)])).unwrap_err();
            assert!(matches!(err, DirectoryError::Config(_)), "accepted {raw}");
        }
    }

    #[test]
    fn zero_connections_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }
}
