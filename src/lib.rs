// src/lib.rs
//! Account storage and authentication for a small messaging service.

pub mod client;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod messages;
pub mod models;
pub mod password;
pub mod protocol;
pub mod utils;

pub use config::Config;
pub use directory::UserDirectory;
pub use error::{DirectoryError, Result};
pub use messages::MessageStore;
