// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub rust_log: String,
    /// Directory backing the notification medium. `None` keeps notifications in memory.
    pub data_dir: Option<PathBuf>,
    pub port: u16,
    /// Idle time after which quiz sessions and cached notification stores are dropped.
    pub idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let data_dir = env::var("DATA_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let idle_ttl = env::var("IDLE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(2 * 60 * 60));

        Self {
            jwt_secret,
            rust_log,
            data_dir,
            port,
            idle_ttl,
        }
    }
}
