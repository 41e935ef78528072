//! Configuration management for Madan
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MadanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Madan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Assistant identity (wake word)
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Chat-completion endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// History and query log retention
    #[serde(default)]
    pub history: HistoryConfig,

    /// Speech input and output settings
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Local store location
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Assistant identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Name the assistant answers to; also the wake word
    #[serde(default = "default_assistant_name")]
    pub name: String,
}

fn default_assistant_name() -> String {
    "Madan".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
        }
    }
}

/// Chat-completion endpoint configuration
///
/// Model and sampling parameters are fixed for the lifetime of a client;
/// they are not adjustable per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Full URL of the OpenAI-compatible chat completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token; usually supplied through the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on reply length
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Value of the `HTTP-Referer` attribution header
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Value of the `X-Title` attribution header
    #[serde(default = "default_title")]
    pub title: String,

    /// Optional transport timeout; none by default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.5
}

fn default_top_p() -> f32 {
    0.9
}

fn default_referer() -> String {
    "https://github.com/madan-assistant/madan".to_string()
}

fn default_title() -> String {
    "MADAN AI Assistant".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            referer: default_referer(),
            title: default_title(),
            timeout_seconds: None,
        }
    }
}

/// History and query log retention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Messages kept when the conversation is persisted
    #[serde(default = "default_max_persisted")]
    pub max_persisted: usize,

    /// Trailing messages sent to the completion endpoint
    #[serde(default = "default_prompt_window")]
    pub prompt_window: usize,

    /// Query log ring buffer capacity
    #[serde(default = "default_max_query_log")]
    pub max_query_log: usize,
}

fn default_max_persisted() -> usize {
    50
}

fn default_prompt_window() -> usize {
    20
}

fn default_max_query_log() -> usize {
    500
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_persisted: default_max_persisted(),
            prompt_window: default_prompt_window(),
            max_query_log: default_max_query_log(),
        }
    }
}

/// Speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Speak replies unless a stored preference says otherwise
    #[serde(default = "default_output_enabled")]
    pub output_enabled: bool,

    /// Text-to-speech program; the text is passed as its last argument
    #[serde(default)]
    pub tts_command: Option<String>,

    /// Speech-to-text program; must print the final transcript on stdout
    #[serde(default)]
    pub recognizer_command: Option<String>,

    /// Longest text handed to the synthesizer
    #[serde(default = "default_max_speech_chars")]
    pub max_speech_chars: usize,
}

fn default_output_enabled() -> bool {
    true
}

fn default_max_speech_chars() -> usize {
    500
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            output_enabled: default_output_enabled(),
            tts_command: None,
            recognizer_command: None,
            max_speech_chars: default_max_speech_chars(),
        }
    }
}

/// Local store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory; the per-user data directory when unset
    #[serde(default)]
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MadanError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MadanError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(name) = std::env::var("MADAN_ASSISTANT_NAME") {
            self.assistant.name = name;
        }

        if let Ok(url) = std::env::var("MADAN_API_URL") {
            self.provider.api_url = url;
        }

        if let Ok(key) = std::env::var("MADAN_API_KEY") {
            self.provider.api_key = Some(key);
        } else if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            if self.provider.api_key.is_none() {
                self.provider.api_key = Some(key);
            }
        }

        if let Ok(model) = std::env::var("MADAN_MODEL") {
            self.provider.model = model;
        }

        if let Ok(voice) = std::env::var("MADAN_VOICE_OUTPUT") {
            match voice.to_lowercase().as_str() {
                "true" | "on" | "1" => self.voice.output_enabled = true,
                "false" | "off" | "0" => self.voice.output_enabled = false,
                _ => tracing::warn!("Invalid MADAN_VOICE_OUTPUT: {}", voice),
            }
        }

        if let Ok(command) = std::env::var("MADAN_TTS_COMMAND") {
            self.voice.tts_command = Some(command);
        }

        if let Ok(command) = std::env::var("MADAN_RECOGNIZER_COMMAND") {
            self.voice.recognizer_command = Some(command);
        }

        if let Ok(path) = std::env::var("MADAN_STORE_PATH") {
            self.storage.path = Some(path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }

        if let Some(session) = cli.session_args() {
            if let Some(name) = &session.name {
                self.assistant.name = name.clone();
            }
            if let Some(model) = &session.model {
                self.provider.model = model.clone();
            }
            if session.mute {
                self.voice.output_enabled = false;
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.assistant.name.trim().is_empty() {
            return Err(MadanError::Config("assistant.name cannot be empty".to_string()).into());
        }

        if self.provider.api_url.trim().is_empty() {
            return Err(MadanError::Config("provider.api_url cannot be empty".to_string()).into());
        }

        if url::Url::parse(&self.provider.api_url).is_err() {
            return Err(MadanError::Config(format!(
                "provider.api_url is not a valid URL: {}",
                self.provider.api_url
            ))
            .into());
        }

        if self.provider.model.trim().is_empty() {
            return Err(MadanError::Config("provider.model cannot be empty".to_string()).into());
        }

        if self.provider.max_tokens == 0 {
            return Err(MadanError::Config(
                "provider.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(MadanError::Config(
                "provider.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.provider.top_p <= 0.0 || self.provider.top_p > 1.0 {
            return Err(MadanError::Config(
                "provider.top_p must be between 0.0 (exclusive) and 1.0".to_string(),
            )
            .into());
        }

        if self.history.max_persisted == 0 || self.history.prompt_window == 0 {
            return Err(MadanError::Config(
                "history windows must be greater than 0".to_string(),
            )
            .into());
        }

        if self.history.prompt_window > self.history.max_persisted {
            return Err(MadanError::Config(
                "history.prompt_window must not exceed history.max_persisted".to_string(),
            )
            .into());
        }

        if self.history.max_query_log == 0 {
            return Err(MadanError::Config(
                "history.max_query_log must be greater than 0".to_string(),
            )
            .into());
        }

        if self.voice.max_speech_chars == 0 {
            return Err(MadanError::Config(
                "voice.max_speech_chars must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
