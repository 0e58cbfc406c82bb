//! Configuration management.
//!
//! Loads `config.toml` from the FinanTUI home directory with defaults for
//! every field, then applies environment overrides for the API location.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub(crate) mod paths {
    //! Path resolution for configuration and data.
    //!
    //! Resolution order:
    //! 1. FINANTUI_HOME environment variable (config and data share it)
    //! 2. Platform directories from `directories::ProjectDirs`

    use anyhow::{Context, Result};
    use std::path::PathBuf;

    pub(crate) const HOME_ENV: &str = "FINANTUI_HOME";

    fn project_dirs() -> Result<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "finantui", "FinanTUI")
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
    }

    pub(crate) fn config_dir() -> Result<PathBuf> {
        if let Ok(home) = std::env::var(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        Ok(project_dirs()?.config_dir().to_path_buf())
    }

    pub(crate) fn data_dir() -> Result<PathBuf> {
        if let Ok(home) = std::env::var(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub(crate) fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Session database; created along with its directory.
    pub(crate) fn storage_path() -> Result<PathBuf> {
        let dir = data_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(dir.join("finantui.db"))
    }

    pub(crate) fn log_dir() -> Result<PathBuf> {
        Ok(data_dir()?.join("logs"))
    }

    /// Where exports land when the config doesn't say otherwise.
    pub(crate) fn default_download_dir() -> PathBuf {
        directories::UserDirs::new()
            .and_then(|d| {
                d.download_dir()
                    .map(|p| p.to_path_buf())
                    .or_else(|| Some(d.home_dir().to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub(crate) const API_BASE_ENV: &str = "FINANTUI_API_BASE";
pub(crate) const API_PREFIX_ENV: &str = "FINANTUI_API_PREFIX";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Scheme and host of the backend, e.g. `http://localhost:8080`.
    pub(crate) base_url: String,

    /// Path prefix shared by every API route.
    pub(crate) api_prefix: String,

    /// Client-wide request timeout in seconds.
    pub(crate) timeout_secs: u64,

    /// Fallback log filter when RUST_LOG is unset.
    pub(crate) log_level: String,

    /// Directory for PDF/Excel exports.
    pub(crate) download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_prefix: Self::DEFAULT_API_PREFIX.to_string(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            log_level: "info".to_string(),
            download_dir: None,
        }
    }
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://localhost:8080";
    const DEFAULT_API_PREFIX: &str = "/api";
    const DEFAULT_TIMEOUT_SECS: u64 = 15;

    /// Loads the config file (if any) and applies environment overrides.
    pub(crate) fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path()?)?;
        config.apply_overrides(
            std::env::var(API_BASE_ENV).ok(),
            std::env::var(API_PREFIX_ENV).ok(),
        );
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub(crate) fn apply_overrides(&mut self, base_url: Option<String>, api_prefix: Option<String>) {
        if let Some(base) = base_url.filter(|b| !b.trim().is_empty()) {
            self.base_url = base.trim().to_string();
        }
        if let Some(prefix) = api_prefix {
            self.api_prefix = prefix;
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = Self::DEFAULT_TIMEOUT_SECS;
        }
    }

    pub(crate) fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(paths::default_download_dir)
    }

    /// Writes a default config file. Fails if one already exists.
    pub(crate) fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let body = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        fs::write(path, format!("# FinanTUI configuration\n\n{body}"))
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
