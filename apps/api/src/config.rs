use std::path::PathBuf;

use anyhow::{Context, Result};

/// Kept apart from `data/`, which ships the bundled sample.
const DEFAULT_STORAGE_DIR: &str = "./state";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default, so an empty environment starts a working server.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory the stores persist to. `None` keeps state in memory only.
    pub storage_dir: Option<PathBuf>,
    pub upload_dir: PathBuf,
    /// Sample data URL; the bundled sample is used when unset.
    pub sample_data_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage_dir: storage_dir(optional_env("STORAGE_DIR")),
            upload_dir: optional_env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            sample_data_url: optional_env("SAMPLE_DATA_URL"),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

/// `memory` disables persistence; unset falls back to the default directory.
fn storage_dir(raw: Option<String>) -> Option<PathBuf> {
    match raw {
        Some(dir) if dir == "memory" => None,
        Some(dir) => Some(PathBuf::from(dir)),
        None => Some(PathBuf::from(DEFAULT_STORAGE_DIR)),
    }
}

/// Reads a variable, treating an empty value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_dir_default_is_not_the_fixture_dir() {
        let dir = storage_dir(None).unwrap();
        assert_eq!(dir, PathBuf::from("./state"));
        assert_ne!(dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_storage_dir_memory_and_explicit() {
        assert_eq!(storage_dir(Some("memory".into())), None);
        assert_eq!(storage_dir(Some("/var/lib/resume".into())), Some(PathBuf::from("/var/lib/resume")));
    }
}
