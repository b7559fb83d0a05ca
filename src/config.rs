//! Configuration file and credential lookup
//!
//! Looked up at `--config <path>` or `~/.fx-timeframe/config.toml`:
//!
//! ```toml
//! api_key = "..."
//! base_url = "https://api.exchangerate.host"
//! cache_ttl_secs = 86400
//! throttle_secs = 0.0
//! default_base = "GBP"
//! default_targets = ["EUR", "USD", "CHF"]
//! ```

use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted before the config file
pub const API_KEY_ENV: &str = "EXCHANGERATE_API_KEY";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub throttle_secs: f64,
    #[serde(default = "default_base")]
    pub default_base: CurrencyCode,
    #[serde(default = "default_targets")]
    pub default_targets: Vec<CurrencyCode>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_base_url() -> String {
    "https://api.exchangerate.host".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60 * 60 * 24
}

fn default_base() -> CurrencyCode {
    CurrencyCode::parse("GBP").unwrap_or(CurrencyCode::USD)
}

fn default_targets() -> Vec<CurrencyCode> {
    ["EUR", "USD", "CHF"]
        .iter()
        .filter_map(|c| CurrencyCode::parse(c).ok())
        .collect()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// `~/.fx-timeframe/config.toml`, when a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fx-timeframe").join("config.toml"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            throttle_secs: 0.0,
            default_base: default_base(),
            default_targets: default_targets(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location if present.
    ///
    /// An explicit path must exist and parse; a missing default file yields
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FxError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&contents)
            .map_err(|e| FxError::ConfigError(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| FxError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.throttle_secs.is_finite() || self.throttle_secs < 0.0 {
            return Err(FxError::ConfigError(format!(
                "throttle_secs must be a non-negative number, got {}",
                self.throttle_secs
            )));
        }
        Ok(())
    }

    /// Access key from the environment, falling back to the config file.
    pub fn access_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        resolve_access_key(from_env, self.api_key.clone())
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_secs_f64(self.throttle_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn resolve_access_key(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
    from_env
        .into_iter()
        .chain(from_file)
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}
