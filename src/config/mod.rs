//! Configuration loading for gdpr-corpus.
//!
//! Values come from `config.toml` and can be overridden by environment
//! variables, which keeps existing deployments driven by `DAL_*` variables
//! working unchanged.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;
use thiserror::Error;

use crate::corpus::loader::CorpusPaths;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "GDPR_CORPUS_CONFIG";

pub const RECITALS_ENV: &str = "DAL_RECITALS_DATA_FILE_PATH";
pub const CHAPTERS_ENV: &str = "DAL_CHAPTERS_DATA_FILE_PATH";
pub const ARTICLES_ENV: &str = "DAL_ARTICLES_DATA_FILE_PATH";
pub const APP_NAME_ENV: &str = "APP_NAME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing data path `data.{key}` (set it in config.toml or {env})")]
    MissingDataPath {
        key: &'static str,
        env: &'static str,
    },

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Locations of the corpus directories.
#[derive(Debug, Default, Deserialize)]
pub struct DataConfig {
    pub recitals: Option<String>,
    pub chapters: Option<String>,
    pub articles: Option<String>,
}

/// Settings for the MCP server.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
}

fn default_server_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// `$GDPR_CORPUS_CONFIG`, or config.toml in the platform config directory.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "gdpr-corpus").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Replace configured values with non-blank variables from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(value) = present(RECITALS_ENV) {
            self.data.recitals = Some(value);
        }
        if let Some(value) = present(CHAPTERS_ENV) {
            self.data.chapters = Some(value);
        }
        if let Some(value) = present(ARTICLES_ENV) {
            self.data.articles = Some(value);
        }
        if let Some(value) = present(APP_NAME_ENV) {
            self.server.name = value;
        }
    }

    /// Resolve the three corpus directories. All of them are required.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDataPath`] for the first path that is
    /// unset or blank.
    pub fn corpus_paths(&self) -> Result<CorpusPaths, ConfigError> {
        Ok(CorpusPaths {
            recitals: required(self.data.recitals.as_deref(), "recitals", RECITALS_ENV)?,
            chapters: required(self.data.chapters.as_deref(), "chapters", CHAPTERS_ENV)?,
            articles: required(self.data.articles.as_deref(), "articles", ARTICLES_ENV)?,
        })
    }
}

fn required(
    value: Option<&str>,
    key: &'static str,
    env: &'static str,
) -> Result<PathBuf, ConfigError> {
    match value.map(str::trim) {
        Some(path) if !path.is_empty() => Ok(expand_tilde(path)),
        _ => Err(ConfigError::MissingDataPath { key, env }),
    }
}

/// Expand ~ to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}
