//! Command execution
//!
//! Turns a classified [`Command`] into the assistant's reply text. Browser
//! side effects go through an [`ExternalSurface`]; the only session state
//! touched is the conversation's current track.

use crate::agent::Conversation;
use crate::intent::surface::{google_search_url, youtube_search_url, GOOGLE_URL, YOUTUBE_URL};
use crate::intent::{Command, ExternalSurface};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 12-hour time without a leading zero, e.g. `3:07 PM`
pub fn format_time(at: &NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

/// Long date, e.g. `Monday, October 19, 2026`
pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

/// Executes local commands
///
/// Execution never fails and never returns an empty reply. Failing to open
/// a browser is logged by the surface and does not change the reply.
pub struct CommandExecutor {
    assistant_name: String,
    surface: Arc<dyn ExternalSurface>,
    clock: Arc<dyn Clock>,
}

impl CommandExecutor {
    /// Create an executor using the system clock
    pub fn new(assistant_name: impl Into<String>, surface: Arc<dyn ExternalSurface>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            surface,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for time and date replies
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run a command and return the reply to show the user
    pub fn execute(&self, command: &Command, conversation: &mut Conversation) -> String {
        tracing::info!("Executing command: {}", command);

        let name = &self.assistant_name;
        match command {
            Command::PlayMusic(song) => {
                self.surface.open_url(&youtube_search_url(song));
                conversation.set_current_track(Some(song.clone()));
                format!("🎵 Playing \"{}\" on YouTube! Check the new tab.", song)
            }
            Command::StopMusic => {
                self.surface.close_media();
                conversation.set_current_track(None);
                "⏹️ Music stopped.".to_string()
            }
            Command::Search(query) => {
                self.surface.open_url(&google_search_url(query));
                format!("🔍 Searching for \"{}\" on Google...", query)
            }
            Command::OpenYoutube => {
                self.surface.open_url(YOUTUBE_URL);
                "📺 Opening YouTube...".to_string()
            }
            Command::OpenGoogle => {
                self.surface.open_url(GOOGLE_URL);
                "🔍 Opening Google...".to_string()
            }
            Command::GetTime => {
                format!("🕐 The current time is {}", format_time(&self.clock.now()))
            }
            Command::GetDate => format!("📅 Today is {}", format_date(&self.clock.now())),
            Command::Greeting => format!(
                "👋 Hello! I'm {}'s AI, your personal assistant. How can I help you today?",
                name
            ),
            Command::Introduce => format!(
                "I'm **{name}'s AI**, your personal voice assistant! You can call me by saying \"Hey {name}\" followed by a command."
            ),
        }
    }
}
