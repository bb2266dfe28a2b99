//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment < CLI
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_SERVICE_URL: &str = "https://transfer.sh";

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "transfer")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("transfer.toml"))
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Service endpoint uploads go to.
    pub url: String,
    /// Basic auth username; empty disables authentication.
    pub user: String,
    /// Basic auth password; empty disables authentication.
    pub pass: String,
    /// Maximum number of downloads; 0 leaves the service default in place.
    pub downloads: u32,
    /// Maximum number of days the upload is kept; 0 leaves the service default.
    pub days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_string(),
            user: String::new(),
            pass: String::new(),
            downloads: 0,
            days: 0,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.url.trim().is_empty(),
            "Invalid config: url must not be empty"
        );
        Ok(())
    }
}

/// CLI-provided values layered on top of a loaded config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub downloads: Option<u32>,
    pub days: Option<u32>,
}

/// Loads config from defaults/file/env.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path();

    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("TRANSFER_"))
        .extract()
        .context("Failed to load configuration")?;

    Ok(config)
}

/// Applies CLI overrides to a loaded config.
pub fn apply_overrides(mut config: AppConfig, overrides: &ConfigOverrides) -> AppConfig {
    if let Some(url) = &overrides.url {
        config.url = url.clone();
    }
    if let Some(user) = &overrides.user {
        config.user = user.clone();
    }
    if let Some(pass) = &overrides.pass {
        config.pass = pass.clone();
    }
    if let Some(downloads) = overrides.downloads {
        config.downloads = downloads;
    }
    if let Some(days) = overrides.days {
        config.days = days;
    }

    config
}

/// Normalizes a service URL: a missing scheme defaults to https, a single
/// trailing slash is dropped.
pub fn normalize_service_url(url: &str) -> String {
    let url = url.trim();
    let mut normalized = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    if normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}
