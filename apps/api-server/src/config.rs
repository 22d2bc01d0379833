//! Application configuration loaded from environment variables.

use std::env;

use fable_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Filesystem root for uploaded images.
    pub blob_root: String,
    /// Public URL prefix the stored blob paths are served under.
    pub blob_public_base: String,
    /// Daily AI-assist allowance per user.
    pub assist_daily_limit: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            blob_root: env::var("BLOB_ROOT").unwrap_or_else(|_| "./media".to_string()),
            blob_public_base: env::var("BLOB_PUBLIC_BASE")
                .unwrap_or_else(|_| "/media".to_string()),
            assist_daily_limit: env::var("ASSIST_DAILY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
        }
    }
}
