// tests/common/mod.rs
#![allow(dead_code)]

use messagely::db::{init_db_pool, init_schema};
use messagely::models::{NewUser, RegisteredUser};
use messagely::{Config, MessageStore, UserDirectory};
use sqlx::SqlitePool;
use std::sync::Once;

static TRACING: Once = Once::new();

pub fn setup_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Cheapest cost bcrypt accepts; keeps the suite fast.
pub const TEST_WORK_FACTOR: u32 = 4;

pub fn test_config() -> Config {
    Config {
        // A single connection, since every connection gets its own in-memory database.
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        max_connections: 1,
        bcrypt_work_factor: TEST_WORK_FACTOR,
    }
}

pub struct TestStore {
    pub pool: SqlitePool,
    pub directory: UserDirectory,
    pub messages: MessageStore,
}

pub async fn setup_store() -> TestStore {
    setup_tracing();
    let config = test_config();
    let pool = init_db_pool(&config).await.expect("open in-memory pool");
    init_schema(&pool).await.expect("create schema");
    TestStore {
        directory: UserDirectory::new(pool.clone(), config.bcrypt_work_factor),
        messages: MessageStore::new(pool.clone()),
        pool,
    }
}

pub fn new_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: password.to_string(),
        first_name: format!("{username}-first"),
        last_name: format!("{username}-last"),
        phone: format!("+1555{}", username.len()),
    }
}

pub async fn register(store: &TestStore, username: &str, password: &str) -> RegisteredUser {
    store
        .directory
        .register(new_user(username, password))
        .await
        .expect("register fixture user")
}
