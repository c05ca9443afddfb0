//! Configuration types for PRISM.
//!
//! `PrismConfig` represents the `config.toml` in the data directory. Every
//! field has a default so an absent or partial file is valid.

use serde::{Deserialize, Serialize};

use crate::user::{UserId, DEFAULT_USER_ID};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrismConfig {
    /// User id applied when a request carries no caller identity.
    /// Set to an empty string to reject such requests instead.
    #[serde(default = "default_fallback_user_id")]
    pub fallback_user_id: String,

    /// SQLite database file name, relative to the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_fallback_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_database_file() -> String {
    "prism.db".to_string()
}

impl PrismConfig {
    /// The configured fallback identity, if any. The reserved system
    /// identity is never a valid fallback.
    pub fn fallback_user(&self) -> Option<UserId> {
        UserId::new(self.fallback_user_id.clone()).filter(|id| !id.is_system())
    }
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            fallback_user_id: default_fallback_user_id(),
            database_file: default_database_file(),
            server: ServerConfig::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
