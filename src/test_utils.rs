//! Test utilities for Madan
//!
//! Temporary directories, configuration fixtures and recording fakes for
//! the renderer, speaker and completion provider.

use crate::config::Config;
use crate::error::{MadanError, Result};
use crate::providers::{Message, Provider};
use crate::render::{ChatEntry, Renderer};
use crate::speech::Speaker;
use async_trait::async_trait;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration with default values
pub fn test_config() -> Config {
    Config::default()
}

/// A complete configuration file
pub fn test_config_yaml() -> String {
    r#"
assistant:
  name: Jarvis

provider:
  api_url: http://localhost:9999/api/v1/chat/completions
  model: test/model
  max_tokens: 200
  temperature: 0.2
  top_p: 0.5
  timeout_seconds: 5

history:
  max_persisted: 30
  prompt_window: 10
  max_query_log: 100

voice:
  output_enabled: false
  tts_command: espeak -s 150
  max_speech_chars: 300
"#
    .to_string()
}

/// Renderer that keeps everything it was asked to show
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    entries: Mutex<Vec<ChatEntry>>,
    notices: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn entries(&self) -> Vec<ChatEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, entry: &ChatEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }

    fn notice(&self, text: &str) {
        self.notices.lock().unwrap().push(text.to_string());
    }
}

/// Speaker that records utterances instead of playing them
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
    cancels: Mutex<usize>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> usize {
        *self.cancels.lock().unwrap()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn cancel(&self) {
        *self.cancels.lock().unwrap() += 1;
    }
}

/// Provider with a fixed answer or failure
pub struct ScriptedProvider {
    reply: std::result::Result<String, String>,
    error: Mutex<Option<MadanError>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    /// Always answers `reply`
    pub fn replying(reply: &str) -> Self {
        Self::scripted(Ok(reply.to_string()), None)
    }

    /// Always fails with a remote error carrying `message`
    pub fn failing(message: &str) -> Self {
        Self::scripted(Err(message.to_string()), None)
    }

    /// Fails once with `error`, then with a generic remote error
    pub fn failing_with(error: MadanError) -> Self {
        Self::scripted(Err("API error: 500".to_string()), Some(error))
    }

    fn scripted(reply: std::result::Result<String, String>, error: Option<MadanError>) -> Self {
        Self {
            reply,
            error: Mutex::new(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of completion calls
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Messages sent with the latest call
    pub fn last_request(&self) -> Option<Vec<Message>> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());

        if let Some(error) = self.error.lock().unwrap().take() {
            return Err(error.into());
        }

        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(MadanError::Remote(message.clone()).into()),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(MadanError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: Result<()> = Ok(());
        assert_error_contains(result, "error");
    }

    #[test]
    fn test_test_config() {
        let config = test_config();
        assert_eq!(config.assistant.name, "Madan");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_test_config_yaml() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert_eq!(config.assistant.name, "Jarvis");
        assert_eq!(config.history.prompt_window, 10);
        assert!(!config.voice.output_enabled);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_scripted_provider_records_requests() {
        let provider = ScriptedProvider::replying("hi");
        let reply = provider.complete(&[Message::user("hello")]).await.unwrap();
        assert_eq!(reply, "hi");
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_request().unwrap()[0].content, "hello");
    }
}
