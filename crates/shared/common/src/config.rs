//! Shared configuration structures.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default database URL: a private in-memory SQLite database
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Lifetime of the single in-memory connection; its database dies with it
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Log every SQL statement through sqlx
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory database with default pool settings
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults. `.env` is
    /// loaded by the binary before this is called.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.max_connections),
            min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or(defaults.min_connections),
            sqlx_logging: parse_var("DATABASE_SQLX_LOGGING").unwrap_or(defaults.sqlx_logging),
        }
    }

    /// Override the URL, keeping the pool settings
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Every connection to `sqlite::memory:` opens its own empty database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Pool bounds actually used when connecting.
    ///
    /// In-memory databases are pinned to a single connection so that every
    /// call sees the same data.
    pub fn pool_bounds(&self) -> (u32, u32) {
        if self.is_in_memory() {
            (1, 1)
        } else {
            let max = self.max_connections.max(1);
            (self.min_connections.min(max), max)
        }
    }

    /// Max lifetime and idle timeout for pooled connections.
    ///
    /// `None` keeps the pool defaults. In-memory databases get a lifetime
    /// long enough that the pool never recycles the connection holding the
    /// data.
    pub fn pinned_connection_lifetime(&self) -> Option<Duration> {
        self.is_in_memory().then_some(IN_MEMORY_CONNECTION_LIFETIME)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
