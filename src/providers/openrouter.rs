//! OpenRouter (OpenAI-compatible) chat completion provider
//!
//! Posts `{model, messages, max_tokens, temperature, top_p}` to a chat
//! completions endpoint with bearer authentication and returns the first
//! choice's message content.

use crate::config::ProviderConfig;
use crate::error::{MadanError, Result};
use crate::providers::{Message, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat completion provider for OpenRouter and compatible endpoints
///
/// # Examples
///
/// ```no_run
/// use madan::config::ProviderConfig;
/// use madan::providers::{Message, OpenRouterProvider, Provider};
///
/// # async fn example() -> madan::error::Result<()> {
/// let config = ProviderConfig {
///     api_key: Some("sk-or-...".to_string()),
///     ..ProviderConfig::default()
/// };
/// let provider = OpenRouterProvider::new(config)?;
/// let reply = provider.complete(&[Message::user("Hello!")]).await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenRouterProvider {
    client: Client,
    config: ProviderConfig,
}

/// Request body for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl OpenRouterProvider {
    /// Create a new provider from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| MadanError::Config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            "Created completion provider for {} using model {}",
            config.api_url,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Extract the server-supplied message from an error body, if any
    fn error_message(body: &str, status: reqwest::StatusCode) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("API error: {}", status.as_u16()))
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            MadanError::Remote("No API key configured. Set MADAN_API_KEY".to_string())
        })?;

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        tracing::debug!("Sending completion request: {} messages", messages.len());

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                MadanError::Remote(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Completion endpoint returned {}: {}", status, body);
            return Err(MadanError::Remote(Self::error_message(&body, status)).into());
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            MadanError::Remote("Invalid response from AI".to_string())
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| MadanError::Remote("Invalid response from AI".to_string()).into())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_server_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded","code":429}}"#;
        let msg = OpenRouterProvider::error_message(body, reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(msg, "Rate limit exceeded");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let msg = OpenRouterProvider::error_message(
            "<html>bad gateway</html>",
            reqwest::StatusCode::BAD_GATEWAY,
        );
        assert_eq!(msg, "API error: 502");

        let msg = OpenRouterProvider::error_message("{}", reqwest::StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "API error: 401");
    }

    #[test]
    fn test_request_serialization_shape() {
        let messages = vec![Message::system("sys"), Message::user("hi")];
        let request = ChatRequest {
            model: "deepseek/deepseek-chat",
            messages: &messages,
            max_tokens: 500,
            temperature: 0.5,
            top_p: 0.9,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "deepseek/deepseek-chat");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_remote_error() {
        let provider = OpenRouterProvider::new(ProviderConfig::default()).unwrap();
        let err = provider.complete(&[Message::user("hi")]).await.unwrap_err();
        let err = err.downcast::<MadanError>().unwrap();
        assert!(matches!(err, MadanError::Remote(_)));
    }

    #[test]
    fn test_model_reports_configured_model() {
        let provider = OpenRouterProvider::new(ProviderConfig::default()).unwrap();
        assert_eq!(provider.model(), "deepseek/deepseek-chat");
    }
}
