//! Configuration management for the theme kit
//!
//! Supports configuration via:
//! 1. Config file (~/.config/copilot-theme-kit/config.toml)
//! 2. Environment variables (MCS_THEME, MCS_TOKEN_ENDPOINT, MCS_OUTPUT_DIR)
//! 3. CLI arguments (override file/env settings)

use crate::preview::{TokenClient, DEFAULT_TURN_DELAY_MS};
use crate::theme::find_theme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme selection
    pub theme: ThemeSettings,

    /// Live preview
    pub preview: PreviewSettings,

    /// Export output
    pub export: ExportSettings,
}

/// Theme settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Catalog id selected at startup (can also use MCS_THEME env var)
    pub default_theme: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            default_theme: "microsoft-default".to_string(),
        }
    }
}

/// Preview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Quiet period before a style change re-renders
    pub debounce_ms: u64,

    /// Pause between scripted conversation turns
    pub mock_turn_delay_ms: u64,

    /// Use the scripted conversation instead of a real agent
    pub use_mock: bool,

    /// Direct Line token endpoint (can also use MCS_TOKEN_ENDPOINT env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            mock_turn_delay_ms: DEFAULT_TURN_DELAY_MS,
            use_mock: true,
            token_endpoint: None,
        }
    }
}

impl PreviewSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Where exported files are written (can also use MCS_OUTPUT_DIR env var)
    pub output_dir: PathBuf,

    /// Version stamped into JSON exports
    pub extension_version: String,

    /// Initials shown in the avatar of generated pages
    pub bot_avatar_initials: String,

    /// Token endpoint baked into production canvases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_token_endpoint: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            extension_version: crate::export::EXTENSION_VERSION.to_string(),
            bot_avatar_initials: "BOT".to_string(),
            canvas_token_endpoint: None,
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("copilot-theme-kit")
            .join("config.toml")
    }

    /// Load config from default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config from specific path
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default().with_env_overrides());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config.with_env_overrides())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(theme) = lookup("MCS_THEME") {
            self.theme.default_theme = theme;
        }
        if let Some(endpoint) = lookup("MCS_TOKEN_ENDPOINT") {
            self.preview.token_endpoint = Some(endpoint.clone());
            if self.export.canvas_token_endpoint.is_none() {
                self.export.canvas_token_endpoint = Some(endpoint);
            }
        }
        if let Some(dir) = lookup("MCS_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
        self
    }

    /// Save config to default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Save config to specific path
    pub fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if find_theme(&self.theme.default_theme).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Unknown default theme '{}'",
                self.theme.default_theme
            )));
        }

        if self.preview.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "preview.debounce_ms must be greater than zero".to_string(),
            ));
        }

        match &self.preview.token_endpoint {
            Some(endpoint) => {
                TokenClient::parse_endpoint(endpoint)
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            }
            None if !self.preview.use_mock => {
                return Err(ConfigError::MissingRequired(
                    "preview.token_endpoint (or MCS_TOKEN_ENDPOINT) is required when use_mock = false"
                        .to_string(),
                ));
            }
            None => {}
        }

        Ok(())
    }

    /// Generate example config content
    pub fn example() -> String {
        let example = Config::default();
        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

/// Builder for creating Config programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn default_theme(mut self, id: impl Into<String>) -> Self {
        self.config.theme.default_theme = id.into();
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.preview.debounce_ms = ms;
        self
    }

    pub fn use_mock(mut self, use_mock: bool) -> Self {
        self.config.preview.use_mock = use_mock;
        self
    }

    pub fn token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.preview.token_endpoint = Some(endpoint.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.export.output_dir = dir.into();
        self
    }

    pub fn bot_avatar_initials(mut self, initials: impl Into<String>) -> Self {
        self.config.export.bot_avatar_initials = initials.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
