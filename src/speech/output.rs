//! Text-to-speech through a system command

use crate::config::VoiceConfig;
use crate::error::{MadanError, Result, SpeechError};
use crate::speech::{prepare_for_speech, Speaker};
use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

/// Synthesizer used when none is configured
#[cfg(target_os = "macos")]
pub const DEFAULT_TTS_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_TTS_COMMAND: &str = "espeak";

/// Map a spawn failure to the speech error the user should see
pub(crate) fn spawn_error(program: &str, err: std::io::Error) -> SpeechError {
    match err.kind() {
        ErrorKind::NotFound => SpeechError::Unavailable(format!("{} not found", program)),
        ErrorKind::PermissionDenied => SpeechError::PermissionDenied(program.to_string()),
        _ => SpeechError::Failed(format!("{}: {}", program, err)),
    }
}

/// Speaks by running a command with the text as its last argument
///
/// Only one utterance runs at a time: starting a new one kills the
/// previous process.
#[derive(Debug)]
pub struct SystemSpeaker {
    program: String,
    args: Vec<String>,
    max_chars: usize,
    current: Mutex<Option<Child>>,
}

impl SystemSpeaker {
    /// Create a speaker from a command line such as `espeak -s 160`
    ///
    /// Returns `None` for a blank command.
    pub fn new(command: &str, max_chars: usize) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            max_chars,
            current: Mutex::new(None),
        })
    }

    /// Speaker for the configured command, or the platform default
    pub fn from_config(config: &VoiceConfig) -> Option<Self> {
        let command = config
            .tts_command
            .as_deref()
            .unwrap_or(DEFAULT_TTS_COMMAND);
        Self::new(command, config.max_speech_chars)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn stop_current(&self, slot: &mut Option<Child>) {
        if let Some(mut child) = slot.take() {
            // Already-finished children just report an error here.
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        let text = prepare_for_speech(text, self.max_chars);
        if text.trim().is_empty() {
            return Ok(());
        }

        let mut current = self
            .current
            .lock()
            .map_err(|_| MadanError::Speech(SpeechError::Failed("speaker lock poisoned".into())))?;
        self.stop_current(&mut current);

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                tracing::warn!("Could not start {}: {}", self.program, e);
                MadanError::Speech(spawn_error(&self.program, e))
            })?;

        tracing::debug!("Speaking {} characters with {}", text.chars().count(), self.program);
        *current = Some(child);
        Ok(())
    }

    fn cancel(&self) {
        if let Ok(mut current) = self.current.lock() {
            self.stop_current(&mut current);
        }
    }
}
