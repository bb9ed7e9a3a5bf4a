use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::magazine::{MagazineConfig, DEFAULT_MAX_PHOTOS_PER_CHAPTER};
use crate::magazine::text_analysis::DEFAULT_PULL_QUOTE_MAX;

const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset runs the service on an empty in-memory catalog.
    pub database_url: Option<String>,
    pub upload_folder: PathBuf,
    pub magazine: MagazineConfig,
    /// External HTML→PDF command line, e.g. `weasyprint`. Unset serves HTML.
    pub render_command: Option<String>,
    pub render_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            upload_folder: optional_env("UPLOAD_FOLDER")
                .unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string())
                .into(),
            magazine: MagazineConfig {
                family_names: parse_family_names(
                    &optional_env("FAMILY_NAMES").unwrap_or_default(),
                ),
                max_photos_per_chapter: parse_env_or(
                    "MAX_PHOTOS_PER_CHAPTER",
                    DEFAULT_MAX_PHOTOS_PER_CHAPTER,
                )?,
                pull_quote_max_length: parse_env_or("PULL_QUOTE_MAX_LENGTH", DEFAULT_PULL_QUOTE_MAX)?,
            },
            render_command: optional_env("RENDER_COMMAND"),
            render_timeout: Duration::from_secs(parse_env_or(
                "RENDER_TIMEOUT_SECS",
                DEFAULT_RENDER_TIMEOUT_SECS,
            )?),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Set and non-blank, trimmed.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

/// `"Mary Smith, John ,"` → `["Mary Smith", "John"]`.
pub fn parse_family_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}
