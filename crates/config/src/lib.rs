//! Configuration loading, validation, and management for Padhai.
//!
//! Loads configuration from `~/.padhai/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on follow-up questions the discover agent may ask per turn.
pub const MAX_DISCOVERY_QUESTIONS: u32 = 10;

/// The root configuration structure.
///
/// Maps directly to `~/.padhai/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for every completion
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per model response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub agents: AgentsConfig,
}

fn default_model() -> String {
    "gpt-4".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("provider", &self.provider)
            .field("store", &self.store)
            .field("gateway", &self.gateway)
            .field("agents", &self.agents)
            .finish()
    }
}

/// The OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name used in logs and `status`
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP timeout for a single completion
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "openai".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `sqlite` or `memory`
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Database file for the sqlite backend. Relative to the config dir
    /// when not absolute.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_backend() -> String {
    "sqlite".into()
}
fn default_store_path() -> String {
    "padhai.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    /// Resolve the database path against the config directory.
    pub fn resolved_path(&self) -> PathBuf {
        let p = PathBuf::from(&self.path);
        if p.is_absolute() {
            p
        } else {
            AppConfig::config_dir().join(p)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// CORS origins. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: vec![],
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// When the discover agent persists its own output into the basic summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverWriteBack {
    /// Never persist; answers come back through `/save-basic-summary`.
    #[default]
    Never,
    /// Persist only the condensed narrative produced for a profile with no summary.
    SummaryOnly,
    /// Persist whatever the model returned.
    Always,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Tutor tone when a request does not name one
    #[serde(default = "default_tone")]
    pub default_tone: String,

    #[serde(default)]
    pub discover_write_back: DiscoverWriteBack,

    #[serde(default = "default_max_discovery_questions")]
    pub max_discovery_questions: u32,

    /// Open sessions kept in memory; the oldest is evicted beyond this
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Turns kept per session (a user query and a reply are two turns)
    #[serde(default = "default_session_turn_limit")]
    pub session_turn_limit: usize,
}

fn default_tone() -> String {
    "enthusiastic".into()
}
fn default_max_discovery_questions() -> u32 {
    5
}
fn default_max_sessions() -> usize {
    1000
}
fn default_session_turn_limit() -> usize {
    20
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            default_tone: default_tone(),
            discover_write_back: DiscoverWriteBack::default(),
            max_discovery_questions: default_max_discovery_questions(),
            max_sessions: default_max_sessions(),
            session_turn_limit: default_session_turn_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.padhai/config.toml).
    ///
    /// Environment overrides:
    /// - `PADHAI_API_KEY`, then `OPENAI_API_KEY` (only when the file has no key)
    /// - `PADHAI_MODEL`
    /// - `PADHAI_API_URL`
    /// - `PADHAI_DB_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
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

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("PADHAI_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(model) = lookup("PADHAI_MODEL") {
            self.default_model = model;
        }
        if let Some(url) = lookup("PADHAI_API_URL") {
            self.provider.api_url = url;
        }
        if let Some(path) = lookup("PADHAI_DB_PATH") {
            self.store.path = path;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".padhai")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(1..=MAX_DISCOVERY_QUESTIONS).contains(&self.agents.max_discovery_questions) {
            return Err(ConfigError::ValidationError(format!(
                "agents.max_discovery_questions must be between 1 and {MAX_DISCOVERY_QUESTIONS}"
            )));
        }

        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be non-zero".into(),
            ));
        }

        if !matches!(self.store.backend.as_str(), "sqlite" | "memory") {
            return Err(ConfigError::ValidationError(format!(
                "unknown store backend '{}' (expected 'sqlite' or 'memory')",
                self.store.backend
            )));
        }

        if self.agents.max_sessions == 0 || self.agents.session_turn_limit == 0 {
            return Err(ConfigError::ValidationError(
                "agents.max_sessions and agents.session_turn_limit must be > 0".into(),
            ));
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            provider: ProviderConfig::default(),
            store: StoreConfig::default(),
            gateway: GatewayConfig::default(),
            agents: AgentsConfig::default(),
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
