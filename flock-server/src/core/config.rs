//! Server configuration
//!
//! All settings come from environment variables with defaults suited to a
//! single check-in station:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/flock | Database, queue, and log location |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | LOG_LEVEL | info | Default tracing level (RUST_LOG overrides) |
//! | START_OFFLINE | false | Boot with the connectivity flag down |
//! | ADMIN_USERNAME / ADMIN_PASSWORD | — | First-run admin account seed |

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding database/, queue/, logs/
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    /// Station boots offline (no link to the primary store)
    pub start_offline: bool,
    /// First-run admin seed, applied only when no users exist
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/flock".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            start_offline: std::env::var("START_OFFLINE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            admin_username: std::env::var("ADMIN_USERNAME").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// Override location and port, for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("database")
    }

    pub fn queue_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("queue")
    }

    pub fn log_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("logs")
    }

    /// Create the work_dir layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.queue_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
