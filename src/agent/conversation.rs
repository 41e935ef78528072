//! Conversation session state
//!
//! Holds the ordered user/assistant messages of the current session and the
//! track the executor last started. Only questions and answers become
//! history; local commands never do.

use crate::error::Result;
use crate::providers::Message;
use crate::storage::{load_json, save_json, KeyValueStore, HISTORY_KEY};

/// Messages kept in the persisted copy of the history
pub const DEFAULT_MAX_PERSISTED: usize = 50;

/// Session state for one chat
///
/// The in-memory history grows for the whole process lifetime. Only the
/// persisted copy is bounded.
///
/// # Examples
///
/// ```
/// use madan::agent::Conversation;
///
/// let mut conversation = Conversation::new();
/// conversation.append_user("What is Rust?");
/// conversation.append_assistant("A systems programming language.");
/// assert_eq!(conversation.len(), 2);
/// assert_eq!(conversation.history_window(1)[0].content, "A systems programming language.");
/// ```
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    current_track: Option<String>,
    max_persisted: usize,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            current_track: None,
            max_persisted: DEFAULT_MAX_PERSISTED,
        }
    }

    /// Set how many trailing messages `persist` writes
    pub fn with_max_persisted(mut self, max_persisted: usize) -> Self {
        self.max_persisted = max_persisted;
        self
    }

    pub fn append_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last `n` messages, oldest first
    pub fn history_window(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Track marked as playing, if any
    pub fn current_track(&self) -> Option<&str> {
        self.current_track.as_deref()
    }

    pub fn set_current_track(&mut self, track: Option<String>) {
        self.current_track = track;
    }

    /// Replace the history with whatever the store holds
    ///
    /// A missing or unreadable entry leaves an empty history; the problem is
    /// logged and otherwise ignored.
    pub fn load(&mut self, store: &dyn KeyValueStore) {
        self.messages = match load_json::<Vec<Message>>(store, HISTORY_KEY) {
            Ok(Some(messages)) => {
                tracing::debug!("Loaded {} messages from history", messages.len());
                messages
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not load chat history: {}", e);
                Vec::new()
            }
        };
    }

    /// Write the last `max_persisted` messages to the store
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Persistence` if the store rejects the write
    pub fn persist(&self, store: &dyn KeyValueStore) -> Result<()> {
        let start = self.messages.len().saturating_sub(self.max_persisted);
        save_json(store, HISTORY_KEY, &self.messages[start..])
    }

    /// Forget all messages and the current track, and delete the stored
    /// history
    ///
    /// The in-memory session is cleared even when the store fails.
    pub fn clear(&mut self, store: &dyn KeyValueStore) -> Result<()> {
        self.messages.clear();
        self.current_track = None;
        store.remove(HISTORY_KEY)
    }
}
