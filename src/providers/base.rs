//! Base provider trait and common types for Madan
//!
//! This module defines the Provider trait implemented by completion
//! clients, along with the chat message type shared with the conversation
//! session.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions prepended to every completion request; never stored
    System,
    /// Text typed or spoken by the user
    User,
    /// Reply produced by the completion endpoint
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message
///
/// Messages are immutable once created; the session only ever appends
/// new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use madan::providers::{Message, Role};
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// True for messages typed or spoken by the user
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Provider trait for chat-completion backends
///
/// One call per user turn: the provider receives the full request
/// (system instruction followed by the trailing history window) and
/// returns the assistant's reply text. Providers never retry; a failure
/// is reported once as `MadanError::Remote`.
///
/// # Examples
///
/// ```no_run
/// use madan::providers::{Message, Provider};
/// use madan::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(&self, messages: &[Message]) -> Result<String> {
///         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Request a reply for the given messages
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Remote` on transport failure, non-success
    /// status, or a response without a reply
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Model identifier used for every request
    fn model(&self) -> &str {
        "unknown"
    }
}

/// Fixed system instruction for the assistant
pub fn system_prompt(assistant_name: &str) -> String {
    format!(
        "You are {name}'s AI, a helpful voice assistant.

RULES:
1. Give SHORT answers (under 100 words)
2. For MATH: Use Unicode symbols (x³, x², ∫, √)
3. NEVER use LaTeX like \\[ \\] or $ $
4. Be conversational - responses are spoken aloud",
        name = assistant_name
    )
}

/// Build the outgoing request: system instruction plus trailing history
///
/// Only the last `window` history messages are included, oldest first.
/// The current user message is expected to already be the last entry of
/// `history`.
///
/// # Examples
///
/// ```
/// use madan::providers::{build_request_messages, Message, Role};
///
/// let history: Vec<Message> = (0..30).map(|i| Message::user(i.to_string())).collect();
/// let request = build_request_messages("be brief", &history, 20);
/// assert_eq!(request.len(), 21);
/// assert_eq!(request[0].role, Role::System);
/// assert_eq!(request[1].content, "10");
/// ```
pub fn build_request_messages(system: &str, history: &[Message], window: usize) -> Vec<Message> {
    let start = history.len().saturating_sub(window);
    let mut messages = Vec::with_capacity(history.len() - start + 1);
    messages.push(Message::system(system));
    messages.extend_from_slice(&history[start..]);
    messages
}
