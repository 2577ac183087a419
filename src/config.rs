//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assistant::Model;
use crate::canvas::RevealOptions;
use crate::gateway::GatewayConfig;
use crate::locale::Locale;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Hosted table-store project
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            anon_key: String::new(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Chat assistant behavior
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Display or API name of the preselected model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Store every chat turn in `chat_messages`
    #[serde(default)]
    pub persist_history: bool,

    #[serde(default = "default_reveal_step")]
    pub reveal_step_ms: u64,

    #[serde(default = "default_reveal_chars")]
    pub reveal_chars_per_step: usize,
}

fn default_model() -> String {
    Model::default().display_name().to_string()
}

fn default_reveal_step() -> u64 {
    3
}

fn default_reveal_chars() -> usize {
    1
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            persist_history: false,
            reveal_step_ms: default_reveal_step(),
            reveal_chars_per_step: default_reveal_chars(),
        }
    }
}

/// CSV and document export
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

fn default_export_dir() -> String {
    dirs::download_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Where the canvas scratch draft is kept
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,
}

fn default_locale() -> String {
    Locale::default().tag().to_string()
}

fn default_scratch_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("shopdesk").to_string_lossy().to_string())
        .unwrap_or_else(|| "./shopdesk_data".to_string())
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            scratch_dir: default_scratch_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("shopdesk").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `SHOPDESK_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SHOPDESK_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(key) = lookup("SHOPDESK_ANON_KEY") {
            self.backend.anon_key = key;
        }

        if let Some(level) = lookup("SHOPDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SHOPDESK_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Some(locale) = lookup("SHOPDESK_LOCALE") {
            self.ui.locale = locale;
        }
        if let Some(dir) = lookup("SHOPDESK_EXPORT_DIR") {
            self.export.dir = dir;
        }
    }

    /// Connection settings for the gateway
    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.url is empty".to_string()));
        }
        Ok(GatewayConfig {
            base_url: self.backend.url.trim_end_matches('/').to_string(),
            anon_key: self.backend.anon_key.clone(),
            request_timeout_ms: self.backend.request_timeout_ms,
        })
    }

    /// Configured locale; unknown tags fall back to the default
    pub fn locale(&self) -> Locale {
        Locale::parse(&self.ui.locale).unwrap_or_else(|| {
            tracing::warn!(locale = %self.ui.locale, "Unknown locale, using default");
            Locale::default()
        })
    }

    pub fn assistant_model(&self) -> Model {
        Model::parse(&self.assistant.default_model).unwrap_or_else(|| {
            tracing::warn!(model = %self.assistant.default_model, "Unknown model, using default");
            Model::default()
        })
    }

    pub fn reveal_options(&self) -> RevealOptions {
        RevealOptions {
            step_delay: Duration::from_millis(self.assistant.reveal_step_ms),
            chars_per_step: self.assistant.reveal_chars_per_step.max(1),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Shopdesk Configuration
#
# Environment variables override these settings:
# - SHOPDESK_BACKEND_URL
# - SHOPDESK_ANON_KEY
# - SHOPDESK_LOG_LEVEL
# - SHOPDESK_LOG_FORMAT
# - SHOPDESK_LOCALE
# - SHOPDESK_EXPORT_DIR

[backend]
# Project URL of the hosted table store
url = "http://localhost:54321"

# Public anonymous key
anon_key = ""

# Request timeout in milliseconds
request_timeout_ms = 30000

[assistant]
# gemini-3-pro, claude-opus-4.5-thinking, grok-4.1-thinking or gpt-5-thinking
default_model = "gemini-3-pro"

# Store chat turns in the chat_messages table
persist_history = false

# Canvas reveal speed
reveal_step_ms = 3
reveal_chars_per_step = 1

[export]
# Directory for CSV and document exports
dir = "~/Downloads"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

[ui]
# zh-CN or en
locale = "zh-CN"

# Directory for the canvas scratch draft
scratch_dir = "~/.local/share/shopdesk"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.backend.url, "http://localhost:54321");
        assert_eq!(config.assistant_model(), Model::Gemini3Pro);
        assert_eq!(config.locale(), Locale::ZhCn);
        assert_eq!(config.reveal_options(), RevealOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nurl = \"https://demo.example.co/\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.backend.request_timeout_ms, 30_000);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(
            config.gateway_config().unwrap().base_url,
            "https://demo.example.co"
        );
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[backend\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SHOPDESK_BACKEND_URL", "https://prod.example.co"),
            ("SHOPDESK_ANON_KEY", "k"),
            ("SHOPDESK_LOG_FORMAT", "json"),
            ("SHOPDESK_LOCALE", "en-US"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend.url, "https://prod.example.co");
        assert_eq!(config.backend.anon_key, "k");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.locale(), Locale::En);
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let mut config = Config::default();
        config.ui.locale = "fr".to_string();
        config.assistant.default_model = "llama".to_string();
        config.backend.url = " ".to_string();

        assert_eq!(config.locale(), Locale::ZhCn);
        assert_eq!(config.assistant_model(), Model::Gemini3Pro);
        assert!(matches!(config.gateway_config(), Err(ConfigError::Invalid(_))));
    }
}
