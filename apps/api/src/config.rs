use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::persistence::debounce::DEFAULT_WINDOW;

/// Application configuration loaded from environment variables.
/// Every key is optional; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub persist_debounce: Duration,
    pub export_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = PathBuf::from(env_or("DATA_DIR", "./data"));
        let export_dir = std::env::var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("exports"));

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            storage_key: env_or("STORAGE_KEY", "resume-data"),
            persist_debounce: match std::env::var("PERSIST_DEBOUNCE_MS") {
                Ok(ms) => Duration::from_millis(
                    ms.parse::<u64>()
                        .context("PERSIST_DEBOUNCE_MS must be a whole number of milliseconds")?,
                ),
                Err(_) => DEFAULT_WINDOW,
            },
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            data_dir,
            export_dir,
        })
    }

    /// Defaults rooted at `data_dir`, for tests.
    #[cfg(test)]
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Config {
            port: 0,
            rust_log: "info".to_string(),
            storage_key: "resume-data".to_string(),
            persist_debounce: DEFAULT_WINDOW,
            max_upload_bytes: 10 * 1024 * 1024,
            export_dir: data_dir.join("exports"),
            data_dir,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
