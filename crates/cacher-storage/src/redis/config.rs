//! Configuration for the Redis store

use std::env;
use std::time::Duration;

use crate::connection::RetryPolicy;

/// Connection pool and retry settings
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Maximum pool size
    pub pool_size: u32,
    /// Idle connections kept warm
    pub min_idle: u32,
    /// Reconnect attempts before giving up
    pub max_retries: u32,
    /// Delay after the first failed reconnect
    pub min_retry_backoff: Duration,
    /// Ceiling for the reconnect delay curve
    pub max_retry_backoff: Duration,
    /// Lifetime of an idle pooled connection
    pub idle_timeout: Duration,
    /// How often the pool reaps idle connections
    pub idle_check_frequency: Duration,
    /// How long a checkout may wait for a free connection
    pub pool_timeout: Duration,
    /// Deadline for read commands
    pub read_timeout: Duration,
    /// Deadline for write commands
    pub write_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            pool_size: 50,
            min_idle: 5,
            max_retries: 5,
            min_retry_backoff: Duration::from_millis(200),
            max_retry_backoff: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(30 * 60),
            idle_check_frequency: Duration::from_secs(60),
            pool_timeout: Duration::from_secs(60),
            read_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(60),
        }
    }
}

impl From<&ConnectionSettings> for RetryPolicy {
    fn from(settings: &ConnectionSettings) -> Self {
        RetryPolicy {
            attempts: settings.max_retries,
            min_backoff: settings.min_retry_backoff,
            max_backoff: settings.max_retry_backoff,
        }
    }
}

/// Configuration for the Redis store connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Password, empty for none
    pub password: String,
    /// Database index
    pub db: i64,
    /// Pool and retry settings
    pub settings: ConnectionSettings,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: String::new(),
            db: 0,
            settings: ConnectionSettings::default(),
        }
    }
}

impl RedisConfig {
    /// Read configuration from `REDIS_*` environment variables
    ///
    /// Missing or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("REDIS_HOST").unwrap_or(defaults.host),
            port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            password: env::var("REDIS_PASSWORD").unwrap_or(defaults.password),
            db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db),
            settings: ConnectionSettings::default(),
        }
    }

    /// Set the server endpoint
    pub fn endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the database index
    pub fn db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// Replace the connection settings
    pub fn settings(mut self, settings: ConnectionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Connection URL for the configured server
    pub fn url(&self) -> String {
        if self.password.is_empty() {
            format!("redis://{}:{}/{}", self.host, self.port, self.db)
        } else {
            format!(
                "redis://:{}@{}:{}/{}",
                self.password, self.host, self.port, self.db
            )
        }
    }
}
