//! Turn orchestration
//!
//! One submission of user text is one turn. A turn either runs a local
//! command or asks the completion provider, then renders (and optionally
//! speaks) the reply. Only one turn runs at a time; anything submitted
//! while a turn is in flight is dropped.

use crate::agent::conversation::Conversation;
use crate::agent::query_log::{QueryLog, QueryType};
use crate::config::Config;
use crate::error::Result;
use crate::intent::{Clock, Command, CommandClassifier, CommandExecutor, ExternalSurface};
use crate::providers::{build_request_messages, system_prompt, Provider, Role};
use crate::render::{ChatEntry, Renderer};
use crate::speech::Speaker;
use crate::storage::{KeyValueStore, Preferences};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Phrase spoken when a completion fails
const SPOKEN_ERROR: &str = "Sorry, I encountered an error. Please try again.";

/// Where the orchestrator is in the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Submitting,
    Executing,
    AwaitingCompletion,
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, or a turn was already running
    Ignored,
    /// A local command ran
    Command { command: Command, response: String },
    /// The provider answered
    Answer(String),
    /// The provider failed; the message is what the error said
    Failed(String),
}

/// Resets the turn state to `Idle` when the turn ends, however it ends
struct TurnGuard<'a> {
    state: &'a Mutex<TurnState>,
}

impl<'a> TurnGuard<'a> {
    fn set(&self, next: TurnState) {
        *lock(self.state) = next;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state) = TurnState::Idle;
    }
}

/// A poisoned lock only means an earlier turn panicked; the data is still
/// usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives turns from submitted text to rendered replies
pub struct TurnOrchestrator {
    classifier: CommandClassifier,
    executor: CommandExecutor,
    provider: Arc<dyn Provider>,
    renderer: Arc<dyn Renderer>,
    speaker: Arc<dyn Speaker>,
    store: Arc<dyn KeyValueStore>,
    query_log: QueryLog,
    conversation: Mutex<Conversation>,
    state: Mutex<TurnState>,
    voice_output: AtomicBool,
    system_prompt: String,
    prompt_window: usize,
}

impl TurnOrchestrator {
    /// Build an orchestrator and load the stored conversation
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Config` if the assistant name is unusable
    pub fn new(
        config: &Config,
        provider: Arc<dyn Provider>,
        surface: Arc<dyn ExternalSurface>,
        renderer: Arc<dyn Renderer>,
        speaker: Arc<dyn Speaker>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let name = &config.assistant.name;
        let classifier = CommandClassifier::new(name)?;
        let executor = CommandExecutor::new(name.clone(), surface);
        let query_log = QueryLog::with_capacity(store.clone(), config.history.max_query_log);

        let mut conversation =
            Conversation::new().with_max_persisted(config.history.max_persisted);
        conversation.load(store.as_ref());
        tracing::info!(
            "Session ready for {} with {} stored messages (model {})",
            name,
            conversation.len(),
            provider.model()
        );

        Ok(Self {
            classifier,
            executor,
            provider,
            renderer,
            speaker,
            store,
            query_log,
            conversation: Mutex::new(conversation),
            state: Mutex::new(TurnState::Idle),
            voice_output: AtomicBool::new(config.voice.output_enabled),
            system_prompt: system_prompt(name),
            prompt_window: config.history.prompt_window,
        })
    }

    /// Replace the clock used for time and date commands
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.executor = self.executor.with_clock(clock);
        self
    }

    /// Start with spoken replies on or off, without storing the choice
    pub fn with_voice_output(self, enabled: bool) -> Self {
        self.voice_output.store(enabled, Ordering::SeqCst);
        self
    }

    /// Current turn state
    pub fn state(&self) -> TurnState {
        *lock(&self.state)
    }

    /// Snapshot of the session
    pub fn conversation(&self) -> Conversation {
        lock(&self.conversation).clone()
    }

    pub fn voice_output(&self) -> bool {
        self.voice_output.load(Ordering::SeqCst)
    }

    /// Render the loaded history, oldest first
    pub fn restore_history(&self) {
        let conversation = self.conversation();
        for message in conversation.messages() {
            let entry = match message.role {
                Role::User => ChatEntry::user(&message.content),
                Role::Assistant => ChatEntry::assistant(&message.content),
                Role::System => continue,
            };
            self.renderer.render(&entry);
        }
    }

    fn begin_turn(&self) -> Option<TurnGuard<'_>> {
        let mut state = lock(&self.state);
        if *state != TurnState::Idle {
            return None;
        }
        *state = TurnState::Submitting;
        Some(TurnGuard { state: &self.state })
    }

    fn speak(&self, text: &str) {
        if !self.voice_output() {
            return;
        }
        if let Err(e) = self.speaker.speak(text) {
            tracing::warn!("Could not speak reply: {}", e);
        }
    }

    /// Run one turn for the submitted text
    ///
    /// Returns [`TurnOutcome::Ignored`] without touching anything when the
    /// text is blank or another turn is still running. Provider failures
    /// are reported to the user and returned as [`TurnOutcome::Failed`];
    /// the user's message stays in the history.
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }

        let Some(turn) = self.begin_turn() else {
            tracing::debug!("Turn in progress, ignoring submission");
            return Ok(TurnOutcome::Ignored);
        };

        self.renderer.render(&ChatEntry::user(text));

        let track = lock(&self.conversation)
            .current_track()
            .map(str::to_string);

        if let Some(command) = self.classifier.classify(text, track.as_deref()) {
            self.query_log.record(text, QueryType::Command);
            turn.set(TurnState::Executing);

            let response = {
                let mut conversation = lock(&self.conversation);
                self.executor.execute(&command, &mut conversation)
            };

            self.renderer.render(&ChatEntry::assistant(&response));
            self.speak(&response);
            return Ok(TurnOutcome::Command { command, response });
        }

        self.query_log.record(text, QueryType::Question);

        let request = {
            let mut conversation = lock(&self.conversation);
            conversation.append_user(text);
            build_request_messages(
                &self.system_prompt,
                conversation.messages(),
                self.prompt_window,
            )
        };

        turn.set(TurnState::AwaitingCompletion);
        self.renderer.typing(true);
        let result = self.provider.complete(&request).await;
        self.renderer.typing(false);

        match result {
            Ok(reply) => {
                self.renderer.render(&ChatEntry::assistant(&reply));
                self.speak(&reply);

                let conversation = {
                    let mut conversation = lock(&self.conversation);
                    conversation.append_assistant(&reply);
                    conversation.clone()
                };
                if let Err(e) = conversation.persist(self.store.as_ref()) {
                    tracing::warn!("Could not save chat history: {}", e);
                }

                Ok(TurnOutcome::Answer(reply))
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Completion failed: {}", message);

                self.renderer.render(&ChatEntry::error(format!(
                    "Sorry, I encountered an error: {}. Please try again.",
                    message
                )));
                self.speak(SPOKEN_ERROR);

                Ok(TurnOutcome::Failed(message))
            }
        }
    }

    /// Forget the session and delete the stored history
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot delete the history; the
    /// in-memory session is cleared regardless
    pub fn clear_chat(&self) -> Result<()> {
        lock(&self.conversation).clear(self.store.as_ref())?;
        self.renderer.notice("Chat cleared!");
        Ok(())
    }

    /// Turn spoken replies on or off and remember the choice
    ///
    /// Turning voice off stops any reply being spoken.
    pub fn set_voice_output(&self, enabled: bool) -> Result<()> {
        self.voice_output.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.speaker.cancel();
        }
        Preferences::save_voice_output(self.store.as_ref(), enabled)?;
        self.renderer.notice(if enabled {
            "Voice output enabled"
        } else {
            "Voice output disabled"
        });
        Ok(())
    }
}
