//! Configuration Module
//!
//! Handles loading server, database and cache settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::cache::DEFAULT_TTL_SECS;

/// Connection parameters for the PostgreSQL pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub user: String,
    pub host: String,
    pub name: String,
    pub password: String,
    pub port: u16,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// How long a request waits for a pooled connection
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Builds sqlx connect options from these parameters.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            host: "localhost".to_string(),
            name: "books_db".to_string(),
            password: String::new(),
            port: 5433,
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds of the cached book listing
    pub cache_ttl: u64,
    /// Serve from a process-local store instead of PostgreSQL
    pub in_memory_store: bool,
    pub database: DatabaseConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `CACHE_TTL` - Listing cache TTL in seconds (default: 3600)
    /// - `STORE` - `memory` to run without a database (default: postgres)
    /// - `DB_USER` - Database user (default: postgres)
    /// - `DB_HOST` - Database host (default: localhost)
    /// - `DB_NAME` - Database name (default: books_db)
    /// - `DB_PASSWORD` - Database password (default: empty)
    /// - `DB_PORT` - Database port (default: 5433)
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
    /// - `DB_ACQUIRE_TIMEOUT` - Pool acquire timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            server_port: env_or("PORT", 5000),
            cache_ttl: env_or("CACHE_TTL", DEFAULT_TTL_SECS),
            in_memory_store: env::var("STORE")
                .map(|v| v.eq_ignore_ascii_case("memory"))
                .unwrap_or(false),
            database: DatabaseConfig {
                user: env::var("DB_USER").unwrap_or(defaults.user),
                host: env::var("DB_HOST").unwrap_or(defaults.host),
                name: env::var("DB_NAME").unwrap_or(defaults.name),
                password: env::var("DB_PASSWORD").unwrap_or(defaults.password),
                port: env_or("DB_PORT", defaults.port),
                max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
                acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT", defaults.acquire_timeout_secs),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            cache_ttl: DEFAULT_TTL_SECS,
            in_memory_store: false,
            database: DatabaseConfig::default(),
        }
    }
}

/// Reads and parses an environment variable, falling back on absence or parse failure.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
