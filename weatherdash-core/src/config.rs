use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::{forecast::ForecastStrategy, model::Unit, provider::ApiKey};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// OpenWeather credentials and endpoint override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Display defaults applied when the dashboard starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub forecast: ForecastStrategy,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
///
/// [openweather]
/// api_key = "..."
///
/// [display]
/// unit = "fahrenheit"
/// forecast = "calendar-day"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather: Option<ProviderConfig>,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            openweather: None,
            display: DisplayConfig::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// The configured API key, or an error pointing at `weatherdash configure`.
    pub fn api_key(&self) -> Result<ApiKey> {
        self.openweather
            .as_ref()
            .map(|p| p.api_key.trim())
            .filter(|k| !k.is_empty())
            .map(ApiKey::new)
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weatherdash configure` and enter your API key."
                )
            })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    /// Set or replace the API key, keeping any base URL override.
    pub fn set_api_key(&mut self, api_key: String) {
        match self.openweather.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => {
                self.openweather = Some(ProviderConfig {
                    api_key,
                    base_url: None,
                })
            }
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.openweather
            .as_ref()
            .and_then(|p| p.base_url.as_deref())
    }

    /// Load config from the platform location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
