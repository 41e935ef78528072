//! Error types for Madan
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Madan operations
///
/// A classification miss is not an error: the classifier returns `None`
/// and the turn is forwarded to the completion provider.
#[derive(Error, Debug)]
pub enum MadanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion endpoint failures (transport, non-success status, malformed payload)
    ///
    /// The message is shown to the user verbatim, so it carries only the
    /// server-supplied or generic description.
    #[error("{0}")]
    Remote(String),

    /// Local storage read/write failures
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Speech recognition or synthesis failures
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Speech service failures
///
/// Permission problems are kept apart from generic failures because the
/// user-facing notice differs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// The platform refused access to the microphone or the speech command
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// No recognizer or synthesizer is configured or installed
    #[error("speech service unavailable: {0}")]
    Unavailable(String),

    /// Any other recognition or synthesis failure
    #[error("{0}")]
    Failed(String),
}

impl SpeechError {
    /// Short notice shown to the user when voice capture fails
    pub fn notice(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "Microphone access denied. Please allow microphone.",
            Self::Unavailable(_) => "Voice input not supported on this system",
            Self::Failed(_) => "Voice recognition error. Try again.",
        }
    }
}

/// Result type alias for Madan operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = MadanError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_remote_error_display_is_bare_message() {
        let error = MadanError::Remote("API error: 503".to_string());
        assert_eq!(error.to_string(), "API error: 503");
    }

    #[test]
    fn test_persistence_error_display() {
        let error = MadanError::Persistence("flush failed".to_string());
        assert_eq!(error.to_string(), "Persistence error: flush failed");
    }

    #[test]
    fn test_speech_error_conversion() {
        let error: MadanError = SpeechError::Failed("no audio".to_string()).into();
        assert!(matches!(error, MadanError::Speech(_)));
        assert_eq!(error.to_string(), "Speech error: no audio");
    }

    #[test]
    fn test_speech_error_notices_distinguish_permission() {
        let denied = SpeechError::PermissionDenied("mic".to_string());
        let failed = SpeechError::Failed("timeout".to_string());
        assert_eq!(
            denied.notice(),
            "Microphone access denied. Please allow microphone."
        );
        assert_eq!(failed.notice(), "Voice recognition error. Try again.");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: MadanError = io_error.into();
        assert!(matches!(error, MadanError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: MadanError = json_error.into();
        assert!(matches!(error, MadanError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: MadanError = yaml_error.into();
        assert!(matches!(error, MadanError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MadanError>();
    }
}
