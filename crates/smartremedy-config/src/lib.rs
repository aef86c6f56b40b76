//! Configuration loading for the SmartRemedy dashboard.
//! Reads smartremedy.toml from the current directory or the path in the
//! SMARTREMEDY_CONFIG env var, then applies environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "SMARTREMEDY_CONFIG";
pub const API_BASE_URL_ENV: &str = "SMARTREMEDY_API_BASE_URL";
pub const BIND_ENV: &str = "SMARTREMEDY_BIND";
pub const STORAGE_PATH_ENV: &str = "SMARTREMEDY_STORAGE_PATH";
pub const LOG_LEVEL_ENV: &str = "SMARTREMEDY_LOG_LEVEL";

const DEFAULT_CONFIG_FILE: &str = "smartremedy.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid API base URL {url:?}: {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the SmartRemedy REST backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String { "http://localhost:5000".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Largest accepted upload request (both comparison files together).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind()             -> String { "127.0.0.1:3001".to_string() }
fn default_static_dir()       -> String { "static".to_string() }
fn default_max_upload_bytes() -> usize  { 50 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// File backing the dashboard's local storage (auth token, theme).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf { PathBuf::from("smartremedy-storage.json") }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_storage_path() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` still wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Config {
    /// Load configuration the way the binary does: `.env`, then the TOML
    /// file (defaults when it does not exist), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = Self::from_file_or_default(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from any key lookup (the process environment in
    /// production, a map in tests). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(API_BASE_URL_ENV) {
            self.api.base_url = url;
        }
        if let Some(bind) = get(BIND_ENV) {
            self.server.bind = bind;
        }
        if let Some(path) = get(STORAGE_PATH_ENV) {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(level) = get(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.api.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.api.base_url.clone(),
            source,
        })?;
        Ok(())
    }
}
