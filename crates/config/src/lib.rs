//! Configuration loading and validation for Archivist.
//!
//! Loads configuration from `~/.archivist/config.toml` (defaults when the
//! file is absent) with environment variable overrides. Everything is read
//! once, when the agent is constructed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Serper API key.
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";

/// Longest wait allowed between search attempts, in seconds.
pub const MAX_BACKOFF_SECS: f64 = 3600.0;

/// The root configuration structure.
///
/// Maps directly to `~/.archivist/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model name passed to the completion backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Max tokens per model response (backend default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Maximum model turns per research request
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Completion backend settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Web search settings
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_model() -> String {
    "mistral".into()
}
fn default_max_iterations() -> u32 {
    15
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Name used in logs (e.g. "ollama", "openai")
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "ollama".into()
}
fn default_base_url() -> String {
    "http://localhost:11434/v1".into()
}
fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_provider_timeout(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Serper API key; `SERPER_API_KEY` fills it when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Organic results requested per search
    #[serde(default = "default_num_results")]
    pub num_results: u32,

    /// Country code
    #[serde(default = "default_gl")]
    pub gl: String,

    /// Interface language
    #[serde(default = "default_hl")]
    pub hl: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_search_endpoint() -> String {
    "https://google.serper.dev/search".into()
}
fn default_num_results() -> u32 {
    10
}
fn default_gl() -> String {
    "us".into()
}
fn default_hl() -> String {
    "en".into()
}
fn default_search_timeout() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_search_endpoint(),
            num_results: default_num_results(),
            gl: default_gl(),
            hl: default_hl(),
            timeout_secs: default_search_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("endpoint", &self.endpoint)
            .field("num_results", &self.num_results)
            .field("gl", &self.gl)
            .field("hl", &self.hl)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Bounded retry for search calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_min_backoff")]
    pub min_backoff_secs: f64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: f64,

    /// Scales the exponential window (`multiplier * 2^(attempt-1)` seconds)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_min_backoff() -> f64 {
    1.0
}
fn default_max_backoff() -> f64 {
    5.0
}
fn default_multiplier() -> f64 {
    1.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            min_backoff_secs: default_min_backoff(),
            max_backoff_secs: default_max_backoff(),
            multiplier: default_multiplier(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.archivist/config.toml),
    /// then apply environment overrides:
    /// - `ARCHIVIST_MODEL`, `ARCHIVIST_BASE_URL` (always win)
    /// - `ARCHIVIST_API_KEY`, `SERPER_API_KEY` (fill keys the file left unset)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup, then re-validate.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = non_blank("ARCHIVIST_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = non_blank("ARCHIVIST_BASE_URL") {
            self.provider.base_url = base_url;
        }
        if self.provider.api_key.is_none() {
            self.provider.api_key = non_blank("ARCHIVIST_API_KEY");
        }
        if self.search.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            self.search.api_key = non_blank(SERPER_API_KEY_ENV);
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".archivist")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".into(),
            ));
        }

        let retry = &self.search.retry;
        if retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "search.retry.max_attempts must be at least 1".into(),
            ));
        }
        if !retry.min_backoff_secs.is_finite() || !retry.max_backoff_secs.is_finite() {
            return Err(ConfigError::ValidationError(
                "search.retry backoff bounds must be finite".into(),
            ));
        }
        if retry.min_backoff_secs < 0.0
            || retry.max_backoff_secs < retry.min_backoff_secs
            || retry.max_backoff_secs > MAX_BACKOFF_SECS
        {
            return Err(ConfigError::ValidationError(format!(
                "search.retry backoff bounds must satisfy 0 <= min <= max <= {MAX_BACKOFF_SECS}"
            )));
        }
        if !retry.multiplier.is_finite() || retry.multiplier <= 0.0 {
            return Err(ConfigError::ValidationError(
                "search.retry.multiplier must be finite and > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: 0.0,
            max_tokens: None,
            max_iterations: default_max_iterations(),
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
