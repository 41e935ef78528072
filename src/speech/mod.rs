//! Speech input and output
//!
//! Output goes through a [`Speaker`]; replies are cleaned of formatting
//! and emoji before synthesis. Input is an external recognizer process
//! driven by the [`input::VoiceCapture`] state machine.

pub mod input;
pub mod output;

pub use input::{
    CaptureAction, CaptureState, ExternalRecognizer, Recognition, RecognizerEvent, VoiceCapture,
};
pub use output::SystemSpeaker;

use crate::config::VoiceConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::Arc;

/// Emoji the executor puts in replies; they are not read aloud
const SILENT_CHARS: &[char] = &[
    '🎵', '🔍', '📺', '💬', '👋', '⏹', '\u{fe0f}', '🕐', '📅',
];

/// Make a reply suitable for a speech synthesizer
///
/// Strips Markdown markers, reduces links to their labels, drops the
/// executor's emoji and truncates to `max_chars` characters.
///
/// # Examples
///
/// ```
/// use madan::speech::prepare_for_speech;
///
/// assert_eq!(
///     prepare_for_speech("🎵 Playing **Believer**", 500),
///     " Playing Believer"
/// );
/// ```
pub fn prepare_for_speech(text: &str, max_chars: usize) -> String {
    let mut cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '#'))
        .collect();

    if let Ok(re) = Regex::new(r"\[([^\]]+)\]\([^)]+\)") {
        cleaned = re.replace_all(&cleaned, "${1}").to_string();
    }

    cleaned
        .chars()
        .filter(|c| !SILENT_CHARS.contains(c))
        .take(max_chars)
        .collect()
}

/// Speech synthesizer
pub trait Speaker: Send + Sync {
    /// Speak `text`, interrupting anything still being spoken
    fn speak(&self, text: &str) -> Result<()>;

    /// Stop speaking
    fn cancel(&self);
}

/// Speaker that says nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn cancel(&self) {}
}

/// Build the speaker for the configured synthesizer
pub fn create_speaker(config: &VoiceConfig) -> Arc<dyn Speaker> {
    match SystemSpeaker::from_config(config) {
        Some(speaker) => Arc::new(speaker),
        None => {
            tracing::warn!("No text-to-speech command configured; replies will not be spoken");
            Arc::new(NullSpeaker)
        }
    }
}
