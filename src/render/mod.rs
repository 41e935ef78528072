//! Chat rendering
//!
//! The orchestrator hands every user message, reply and error to a
//! [`Renderer`]. User text is always shown literally; assistant text may
//! carry Markdown-like formatting (see [`markdown`]).

pub mod markdown;
pub mod terminal;
pub mod transcript;

pub use markdown::{escape_html, format_markdown};
pub use terminal::TerminalRenderer;
pub use transcript::export_html;

use crate::intent::executor::format_time;
use chrono::{Local, NaiveDateTime};

/// One displayed chat bubble
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub text: String,
    pub is_user: bool,
    pub is_error: bool,
    pub timestamp: NaiveDateTime,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true, false)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, false, false)
    }

    /// Assistant-side entry flagged as an error
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, false, true)
    }

    fn new(text: impl Into<String>, is_user: bool, is_error: bool) -> Self {
        Self {
            text: text.into(),
            is_user,
            is_error,
            timestamp: Local::now().naive_local(),
        }
    }

    /// Display time, e.g. `3:07 PM`
    pub fn time_label(&self) -> String {
        format_time(&self.timestamp)
    }
}

/// Display surface for the chat
pub trait Renderer: Send + Sync {
    /// Show a chat entry
    fn render(&self, entry: &ChatEntry);

    /// Show a short transient status line ("Chat cleared!")
    fn notice(&self, text: &str);

    /// Show or hide the "assistant is typing" indicator
    fn typing(&self, _active: bool) {}
}
