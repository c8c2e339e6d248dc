//! Configuration loading and validation for Palaver.
//!
//! Loads configuration from a TOML file with environment variable
//! overrides, validates required settings at startup, and hands the
//! result to each client constructor as an immutable object. Missing
//! required settings are fatal at process start, not recoverable
//! per-request.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Inference endpoint settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Retrieval index settings
    #[serde(default)]
    pub search: SearchConfig,

    /// History store settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Settings for the chat-completion and embedding endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default)]
    pub endpoint: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Chat completion model
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Fixed generation temperature, process-wide
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Fixed max output length, process-wide
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_chat_model() -> String {
    "gpt-4o".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1000
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Settings for the retrieval index.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the search service
    #[serde(default)]
    pub endpoint: String,

    /// Query API key
    #[serde(default)]
    pub api_key: String,

    /// Index name
    #[serde(default)]
    pub index_name: String,

    /// Search service API version
    #[serde(default = "default_search_api_version")]
    pub api_version: String,

    /// Semantic ranking configuration name
    #[serde(default = "default_semantic_config")]
    pub semantic_configuration: String,

    /// Scoring profile name
    #[serde(default = "default_scoring_profile")]
    pub scoring_profile: String,

    /// Field holding the content embedding vector
    #[serde(default = "default_vector_field")]
    pub vector_field: String,
}

fn default_search_api_version() -> String {
    "2024-07-01".into()
}
fn default_semantic_config() -> String {
    "semantic-config".into()
}
fn default_scoring_profile() -> String {
    "scoring-profile".into()
}
fn default_vector_field() -> String {
    "content_vector".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            index_name: String::new(),
            api_version: default_search_api_version(),
            semantic_configuration: default_semantic_config(),
            scoring_profile: default_scoring_profile(),
            vector_field: default_vector_field(),
        }
    }
}

/// Settings for the history store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// SQLite database path (":memory:" for ephemeral)
    #[serde(default = "default_history_path")]
    pub path: String,

    /// How many prior turns are replayed into each transcript
    #[serde(default = "default_replay_window")]
    pub replay_window: usize,
}

fn default_history_path() -> String {
    "sqlite://palaver.db".into()
}
fn default_replay_window() -> usize {
    10
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            replay_window: default_replay_window(),
        }
    }
}

/// Settings for the HTTP gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &str) -> &'static str {
    if s.is_empty() { "<unset>" } else { "[REDACTED]" }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("inference", &self.inference)
            .field("search", &self.search)
            .field("history", &self.history)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("index_name", &self.index_name)
            .field("api_version", &self.api_version)
            .field("semantic_configuration", &self.semantic_configuration)
            .field("scoring_profile", &self.scoring_profile)
            .field("vector_field", &self.vector_field)
            .finish()
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Load configuration: `palaver.toml` in the working directory (or the
    /// path in `PALAVER_CONFIG`), then environment variable overrides,
    /// then validation.
    ///
    /// Environment overrides:
    /// - `PALAVER_INFERENCE_ENDPOINT`, `PALAVER_INFERENCE_API_KEY`
    /// - `PALAVER_CHAT_MODEL`, `PALAVER_EMBEDDING_MODEL`
    /// - `PALAVER_SEARCH_ENDPOINT`, `PALAVER_SEARCH_API_KEY`,
    ///   `PALAVER_SEARCH_INDEX`
    /// - `PALAVER_HISTORY_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PALAVER_CONFIG").unwrap_or_else(|_| "palaver.toml".into());
        let mut config = Self::load_from(Path::new(&path))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file path. A missing file yields defaults so
    /// env-only deployments work; validation still applies in `load`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 8] = [
            ("PALAVER_INFERENCE_ENDPOINT", &mut self.inference.endpoint),
            ("PALAVER_INFERENCE_API_KEY", &mut self.inference.api_key),
            ("PALAVER_CHAT_MODEL", &mut self.inference.chat_model),
            ("PALAVER_EMBEDDING_MODEL", &mut self.inference.embedding_model),
            ("PALAVER_SEARCH_ENDPOINT", &mut self.search.endpoint),
            ("PALAVER_SEARCH_API_KEY", &mut self.search.api_key),
            ("PALAVER_SEARCH_INDEX", &mut self.search.index_name),
            ("PALAVER_HISTORY_PATH", &mut self.history.path),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                *slot = value;
            }
        }
    }

    /// Validate required settings. Called once at startup; failures are
    /// fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inference.endpoint.is_empty() {
            return Err(ConfigError::Invalid(
                "inference.endpoint is required".into(),
            ));
        }
        if self.inference.api_key.is_empty() {
            return Err(ConfigError::Invalid("inference.api_key is required".into()));
        }
        if self.search.endpoint.is_empty() {
            return Err(ConfigError::Invalid("search.endpoint is required".into()));
        }
        if self.search.index_name.is_empty() {
            return Err(ConfigError::Invalid("search.index_name is required".into()));
        }
        if self.history.replay_window == 0 {
            return Err(ConfigError::Invalid(
                "history.replay_window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
