use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dashboard::AppPath;
use crate::dashboard::gate::MIN_INTERVAL_SECS;

/// Environment variable overriding `base_url`
pub const URL_ENV_VAR: &str = "SQLOPS_DASHBOARD_URL";

/// Shortest tick period accepted, in milliseconds
const MIN_TICK_MILLIS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Page shown at startup when no `--page` is given, as `category:name`
    #[serde(default)]
    pub default_page: Option<String>,

    /// Per-page refresh interval overrides in seconds, keyed by `category:name`
    #[serde(default)]
    pub intervals: BTreeMap<String, u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_tick_millis() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            tick_millis: default_tick_millis(),
            default_page: None,
            intervals: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("sqlops-dashboard")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".sqlops-dashboard")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Loads `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file {:?} doesn't exist, using defaults", config_path);
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config with {} interval overrides", config.intervals.len());
        Ok(config)
    }

    /// Applies `SQLOPS_DASHBOARD_URL` when set
    pub fn apply_env(&mut self) {
        self.override_base_url(std::env::var(URL_ENV_VAR).ok());
    }

    pub fn override_base_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            debug!("Using base URL {}", url);
            self.base_url = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(MIN_TICK_MILLIS))
    }

    pub fn default_page(&self) -> Result<Option<AppPath>> {
        self.default_page
            .as_deref()
            .map(|page| page.parse::<AppPath>())
            .transpose()
            .context("Invalid default_page in config")
    }

    /// Override for `path` if configured, never below [`MIN_INTERVAL_SECS`]
    pub fn interval_for(&self, path: &AppPath, fallback: u64) -> u64 {
        self.intervals
            .get(&path.to_string())
            .copied()
            .unwrap_or(fallback)
            .max(MIN_INTERVAL_SECS)
    }
}
