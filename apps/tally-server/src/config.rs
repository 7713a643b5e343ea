//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | variable             | default           |
//! |----------------------|-------------------|
//! | `PORT`               | `3000`            |
//! | `BIND_ADDR`          | `0.0.0.0`         |
//! | `DATABASE_PATH`      | `transactions.db` |
//! | `DB_MAX_CONNECTIONS` | `5`               |
//! | `MAX_UPLOAD_BYTES`   | `10485760`        |

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use tally_db::DbConfig;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port
    pub port: u16,

    /// Bind address
    pub bind_addr: String,

    /// SQLite database file, or `:memory:`
    pub database_path: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Request body limit for `POST /upload`
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 3000,
            bind_addr: "0.0.0.0".to_string(),
            database_path: "transactions.db".to_string(),
            db_max_connections: 5,
            max_upload_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Database settings derived from this config.
    pub fn db_config(&self) -> DbConfig {
        let config = DbConfig::new(&self.database_path);
        if config.is_in_memory() {
            DbConfig::in_memory()
        } else {
            config.max_connections(self.db_max_connections)
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
