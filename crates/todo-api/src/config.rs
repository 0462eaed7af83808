//! Process configuration from the environment

/// Which cache store to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDriver {
    Redis,
    Memory,
}

/// Settings read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cache_driver: CacheDriver,
}

impl AppConfig {
    /// Read `PORT` and `CACHE_DRIVER`, defaulting to 3000 and redis.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(3000);

        let cache_driver = match std::env::var("CACHE_DRIVER").as_deref() {
            Ok("memory") => CacheDriver::Memory,
            _ => CacheDriver::Redis,
        };

        Self { port, cache_driver }
    }
}

/// True when `APP_ENV` says we are running in production.
pub fn is_production() -> bool {
    std::env::var("APP_ENV").as_deref() == Ok("production")
}
