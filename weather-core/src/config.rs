use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, time::Duration};

use crate::error::WeatherError;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";

/// How a city name is turned into weather requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Resolve coordinates via the geocoding API first, then query by lat/lon.
    #[default]
    Geocode,
    /// Pass the city name straight to the weather endpoints.
    Direct,
}

impl LookupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupMode::Geocode => "geocode",
            LookupMode::Direct => "direct",
        }
    }

    pub const fn all() -> &'static [LookupMode] {
        &[LookupMode::Geocode, LookupMode::Direct]
    }
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LookupMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "geocode" => Ok(LookupMode::Geocode),
            "direct" => Ok(LookupMode::Direct),
            _ => Err(anyhow!(
                "Unknown lookup mode '{value}'. Supported modes: geocode, direct."
            )),
        }
    }
}

/// Terminal layout of the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Card,
    Compact,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Card => "card",
            Layout::Compact => "compact",
        }
    }

    pub const fn all() -> &'static [Layout] {
        &[Layout::Card, Layout::Compact]
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Layout {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "card" => Ok(Layout::Card),
            "compact" => Ok(Layout::Compact),
            _ => Err(anyhow!(
                "Unknown layout '{value}'. Supported layouts: card, compact."
            )),
        }
    }
}

/// Everything the HTTP client needs, resolved from file + environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// lookup_mode = "geocode"
/// layout = "card"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub lookup_mode: LookupMode,
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            lookup_mode: LookupMode::default(),
            layout: Layout::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.api_key = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Resolve client settings, with `OPENWEATHER_API_KEY` / `OPENWEATHER_BASE_URL`
    /// taking precedence over the file.
    pub fn client_config(&self) -> Result<ClientConfig, WeatherError> {
        self.client_config_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::client_config`] with an explicit environment lookup.
    pub fn client_config_with<F>(&self, env: F) -> Result<ClientConfig, WeatherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: String| if v.trim().is_empty() { None } else { Some(v) };

        let api_key = env(API_KEY_ENV)
            .and_then(non_empty)
            .or_else(|| self.api_key.clone().and_then(non_empty))
            .ok_or_else(|| {
                WeatherError::Config(format!(
                    "No API key configured.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                ))
            })?;

        let base_url = env(BASE_URL_ENV)
            .and_then(non_empty)
            .unwrap_or_else(|| self.base_url.clone());

        Ok(ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}
