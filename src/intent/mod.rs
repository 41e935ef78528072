//! Local command handling
//!
//! Utterances are first stripped of the wake word, then matched against an
//! ordered rule table. A match yields a [`Command`] that the
//! [`CommandExecutor`] turns into a reply (and possibly an external side
//! effect such as opening a browser tab). No match means the text is an
//! open-ended question for the completion provider.

pub mod classifier;
pub mod executor;
pub mod surface;
pub mod wake_word;

pub use classifier::CommandClassifier;
pub use executor::{Clock, CommandExecutor, SystemClock};
pub use surface::{ExternalSurface, SystemSurface};
pub use wake_word::WakeWordNormalizer;

use std::fmt;

/// A recognised local command
///
/// Commands are transient: built by the classifier and consumed
/// immediately by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play a song by name
    PlayMusic(String),
    /// Stop whatever is playing
    StopMusic,
    /// Web search for the query
    Search(String),
    OpenYoutube,
    OpenGoogle,
    GetTime,
    GetDate,
    /// Greeting addressed to the assistant by name
    Greeting,
    /// "Who are you?"
    Introduce,
}

impl Command {
    /// Stable snake_case name, matching the query log vocabulary
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayMusic(_) => "play_music",
            Self::StopMusic => "stop_music",
            Self::Search(_) => "search",
            Self::OpenYoutube => "open_youtube",
            Self::OpenGoogle => "open_google",
            Self::GetTime => "get_time",
            Self::GetDate => "get_date",
            Self::Greeting => "greeting",
            Self::Introduce => "introduce",
        }
    }

    /// Extracted argument, for commands that carry one
    pub fn data(&self) -> Option<&str> {
        match self {
            Self::PlayMusic(s) | Self::Search(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            Some(data) => write!(f, "{}({})", self.kind(), data),
            None => write!(f, "{}", self.kind()),
        }
    }
}
