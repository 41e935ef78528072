//! Voice capture
//!
//! [`VoiceCapture`] tracks whether the user is being listened to and turns
//! recognizer events into actions for the chat loop. The recognizer itself
//! is an external program ([`ExternalRecognizer`]) that prints transcripts
//! on stdout, one per line; the last line is the final transcript.

use crate::error::{MadanError, Result, SpeechError};
use crate::speech::output::spawn_error;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

/// Events reported by a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    Started,
    Transcript { text: String, is_final: bool },
    Error(SpeechError),
    Ended,
}

/// Listening state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
}

/// What the chat loop should do in response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureAction {
    Nothing,
    /// Begin recognition
    Start,
    /// Stop the running recognition
    Stop,
    /// Show a partial transcript in the input line
    Interim(String),
    /// Submit the final transcript like typed input
    Submit(String),
    /// Show a short status message
    Notice(String),
}

/// Listening state machine
///
/// # Examples
///
/// ```
/// use madan::speech::{CaptureAction, RecognizerEvent, VoiceCapture};
///
/// let mut capture = VoiceCapture::new(true);
/// assert_eq!(capture.toggle(), CaptureAction::Start);
/// capture.on_event(RecognizerEvent::Started);
/// let action = capture.on_event(RecognizerEvent::Transcript {
///     text: "what time is it".to_string(),
///     is_final: true,
/// });
/// assert_eq!(action, CaptureAction::Submit("what time is it".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct VoiceCapture {
    supported: bool,
    state: CaptureState,
}

impl VoiceCapture {
    /// `supported` is false when no recognizer is available
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    /// Microphone button: start when idle, stop when listening
    pub fn toggle(&mut self) -> CaptureAction {
        if !self.supported {
            let err = SpeechError::Unavailable("no recognizer configured".to_string());
            return CaptureAction::Notice(err.notice().to_string());
        }

        match self.state {
            CaptureState::Listening => CaptureAction::Stop,
            CaptureState::Idle => CaptureAction::Start,
        }
    }

    /// Feed a recognizer event
    pub fn on_event(&mut self, event: RecognizerEvent) -> CaptureAction {
        match event {
            RecognizerEvent::Started => {
                self.state = CaptureState::Listening;
                CaptureAction::Notice("Listening... Speak now!".to_string())
            }
            RecognizerEvent::Transcript { text, is_final } => {
                let text = text.trim().to_string();
                if !is_final {
                    CaptureAction::Interim(text)
                } else if text.is_empty() {
                    CaptureAction::Nothing
                } else {
                    CaptureAction::Submit(text)
                }
            }
            RecognizerEvent::Error(err) => {
                tracing::error!("Speech recognition error: {}", err);
                self.state = CaptureState::Idle;
                CaptureAction::Notice(err.notice().to_string())
            }
            RecognizerEvent::Ended => {
                self.state = CaptureState::Idle;
                CaptureAction::Nothing
            }
        }
    }
}

/// Recognizer backed by an external speech-to-text program
#[derive(Debug, Clone)]
pub struct ExternalRecognizer {
    program: String,
    args: Vec<String>,
}

impl ExternalRecognizer {
    /// Returns `None` for a blank command
    pub fn new(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run one recognition and stream its events
    ///
    /// The event stream always ends with [`RecognizerEvent::Ended`], also
    /// after [`Recognition::stop`].
    ///
    /// # Errors
    ///
    /// Returns an error only if called outside a Tokio runtime.
    pub fn start(&self) -> Result<Recognition> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| MadanError::Speech(SpeechError::Failed(e.to_string())))?;

        let (tx, rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let program = self.program.clone();
        let args = self.args.clone();

        handle.spawn(async move {
            // Dropping the run future kills the child (`kill_on_drop`).
            tokio::select! {
                _ = Self::run(&program, &args, &tx) => {}
                _ = stop_rx => tracing::debug!("Stopped recognizer {}", program),
            }
            let _ = tx.send(RecognizerEvent::Ended).await;
        });

        Ok(Recognition {
            events: rx,
            stop: Some(stop_tx),
        })
    }

    async fn run(program: &str, args: &[String], tx: &mpsc::Sender<RecognizerEvent>) {
        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let _ = tx
                    .send(RecognizerEvent::Error(spawn_error(program, e)))
                    .await;
                return;
            }
        };
        let _ = tx.send(RecognizerEvent::Started).await;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained together; a chatty stderr must not stall stdout.
        let read_transcripts = async {
            // Every line but the last is a partial result.
            let mut last: Option<String> = None;
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(previous) = last.replace(line) {
                        let _ = tx
                            .send(RecognizerEvent::Transcript {
                                text: previous,
                                is_final: false,
                            })
                            .await;
                    }
                }
            }
            last
        };
        let read_diagnostics = async {
            let mut text = String::new();
            if let Some(mut err) = stderr {
                let _ = err.read_to_string(&mut text).await;
            }
            text
        };
        let (last, stderr) = tokio::join!(read_transcripts, read_diagnostics);

        match child.wait().await {
            Ok(status) if status.success() => {
                if let Some(text) = last {
                    let _ = tx
                        .send(RecognizerEvent::Transcript {
                            text,
                            is_final: true,
                        })
                        .await;
                }
            }
            Ok(status) => {
                let detail = stderr.trim();
                let err = if detail.to_lowercase().contains("permission")
                    || detail.to_lowercase().contains("not allowed")
                {
                    SpeechError::PermissionDenied(detail.to_string())
                } else {
                    SpeechError::Failed(format!("{} exited with {}: {}", program, status, detail))
                };
                let _ = tx.send(RecognizerEvent::Error(err)).await;
            }
            Err(e) => {
                let _ = tx
                    .send(RecognizerEvent::Error(SpeechError::Failed(e.to_string())))
                    .await;
            }
        }
    }
}

/// A running recognition
///
/// Dropping it stops the recognizer as well.
#[derive(Debug)]
pub struct Recognition {
    events: mpsc::Receiver<RecognizerEvent>,
    stop: Option<oneshot::Sender<()>>,
}

impl Recognition {
    /// Next event; `None` once [`RecognizerEvent::Ended`] has been delivered
    pub async fn recv(&mut self) -> Option<RecognizerEvent> {
        self.events.recv().await
    }

    /// Kill the recognizer; the stream still ends with `Ended`
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.is_none()
    }
}
