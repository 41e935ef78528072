/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`: Interactive chat session
- `ask`: Run a single turn
- `history`, `logs`, `prefs`: Inspect and manage stored state

The chat and ask handlers share the session wiring in this module: local
store, preferences, provider, renderer and speaker around a
`TurnOrchestrator`.
*/

use crate::agent::{TurnOrchestrator, TurnOutcome};
use crate::config::Config;
use crate::error::{MadanError, Result};
use crate::intent::SystemSurface;
use crate::providers::{create_provider, Provider};
use crate::render::{Renderer, TerminalRenderer};
use crate::speech::create_speaker;
use crate::storage::{KeyValueStore, Preferences, SledStore, Theme};
use std::io::Write;
use std::sync::Arc;

// Special commands parser for session control
pub mod special_commands;

// Stored conversation management
pub mod history;

// Query log output
pub mod logs;

// Preference management
pub mod prefs;

/// Open the configured local store
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store = SledStore::open(config.storage.path.as_deref())?;
    tracing::debug!("Using store at {}", store.path().display());
    Ok(Arc::new(store))
}

/// Preferences with the configured voice default
pub fn load_preferences(config: &Config, store: &dyn KeyValueStore) -> Preferences {
    Preferences::load(
        store,
        Preferences {
            theme: Theme::default(),
            voice_output: config.voice.output_enabled,
        },
    )
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is no
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Everything a session needs, wired together
struct Session {
    orchestrator: TurnOrchestrator,
    renderer: Arc<TerminalRenderer>,
    store: Arc<dyn KeyValueStore>,
}

fn build_session(config: &Config, mute: bool) -> Result<Session> {
    let store = open_store(config)?;
    let prefs = load_preferences(config, store.as_ref());
    let voice_output = prefs.voice_output && !mute;

    let renderer = Arc::new(TerminalRenderer::new(
        config.assistant.name.clone(),
        prefs.theme,
    ));
    let provider: Arc<dyn Provider> = Arc::from(create_provider(&config.provider)?);

    let orchestrator = TurnOrchestrator::new(
        config,
        provider,
        Arc::new(SystemSurface::new()),
        renderer.clone(),
        create_speaker(&config.voice),
        store.clone(),
    )?
    .with_voice_output(voice_output);

    Ok(Session {
        orchestrator,
        renderer,
        store,
    })
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Restores the stored conversation, then runs a readline loop that
    //! either handles a special command or submits the line as a turn.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::speech::{CaptureAction, ExternalRecognizer, RecognizerEvent, VoiceCapture};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `mute` - Keep spoken replies off for this session
    pub async fn run_chat(config: Config, mute: bool) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let session = build_session(&config, mute)?;
        let Session {
            orchestrator,
            renderer,
            store,
        } = session;

        let recognizer = config
            .voice
            .recognizer_command
            .as_deref()
            .and_then(ExternalRecognizer::new);
        let mut capture = VoiceCapture::new(recognizer.is_some());

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config.assistant.name);
        orchestrator.restore_history();

        loop {
            let readline = rl.readline(&format!("{} ", "You>".cyan().bold()));
            match readline {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::None => {
                            if let Err(e) = orchestrator.submit(trimmed).await {
                                eprintln!("Error: {}\n", e);
                            }
                        }
                        SpecialCommand::Help => print_help(&config.assistant.name),
                        SpecialCommand::Clear => {
                            let answer = rl.readline("Clear all chat history? [y/N] ");
                            if matches!(answer, Ok(ref a) if is_yes(a)) {
                                if let Err(e) = orchestrator.clear_chat() {
                                    eprintln!("Error: {}\n", e);
                                }
                            }
                        }
                        SpecialCommand::Voice(setting) => {
                            let enabled = setting.unwrap_or(!orchestrator.voice_output());
                            if let Err(e) = orchestrator.set_voice_output(enabled) {
                                eprintln!("Error: {}\n", e);
                            }
                        }
                        SpecialCommand::Theme(setting) => {
                            let theme = setting.unwrap_or_else(|| renderer.theme().toggled());
                            renderer.set_theme(theme);
                            if let Err(e) = Preferences::save_theme(store.as_ref(), theme) {
                                tracing::warn!("Could not save theme: {}", e);
                            }
                            renderer.notice(&theme_notice(theme));
                        }
                        SpecialCommand::Listen => {
                            if let Err(e) = listen(
                                &mut capture,
                                recognizer.as_ref(),
                                &orchestrator,
                                renderer.as_ref(),
                            )
                            .await
                            {
                                eprintln!("Error: {}\n", e);
                            }
                        }
                        SpecialCommand::ShowStatus => {
                            print_status_display(&config, &orchestrator, renderer.theme())
                        }
                        SpecialCommand::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn theme_notice(theme: Theme) -> String {
        match theme {
            Theme::Dark => "Dark theme activated!".to_string(),
            Theme::Light => "Light theme activated!".to_string(),
        }
    }

    /// Capture one utterance and submit the final transcript
    ///
    /// Ctrl-C while capturing acts as a second press of the microphone
    /// button: it stops the recognizer and returns to the prompt.
    async fn listen(
        capture: &mut VoiceCapture,
        recognizer: Option<&ExternalRecognizer>,
        orchestrator: &TurnOrchestrator,
        renderer: &TerminalRenderer,
    ) -> Result<()> {
        match capture.toggle() {
            CaptureAction::Start => {}
            CaptureAction::Stop => {
                capture.on_event(RecognizerEvent::Ended);
                renderer.notice("Stopped listening.");
                return Ok(());
            }
            CaptureAction::Notice(text) => {
                renderer.notice(&text);
                return Ok(());
            }
            _ => return Ok(()),
        }

        let Some(recognizer) = recognizer else {
            return Ok(());
        };

        let mut recognition = recognizer.start()?;
        renderer.notice("Press Ctrl-C to stop listening.");

        loop {
            let event = tokio::select! {
                event = recognition.recv() => event,
                _ = tokio::signal::ctrl_c(), if !recognition.is_stopping() => {
                    let action = capture.toggle();
                    tracing::debug!("Capture toggled while recognizing: {:?}", action);
                    recognition.stop();
                    renderer.notice("Stopped listening.");
                    continue;
                }
            };
            let Some(event) = event else {
                break;
            };

            match capture.on_event(event) {
                CaptureAction::Interim(text) => renderer.notice(&format!("🎤 {}", text)),
                CaptureAction::Notice(text) => renderer.notice(&text),
                CaptureAction::Submit(text) => {
                    orchestrator.submit(&text).await?;
                }
                CaptureAction::Nothing | CaptureAction::Start | CaptureAction::Stop => {}
            }
        }
        Ok(())
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(name: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!(
            "║{:^62}║",
            format!("{}'s AI - Interactive Chat", name)
        );
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "Say {} followed by a command, or just ask a question.",
            format!("\"Hey {}\"", name).cyan()
        );
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Display session status for `/status`
    fn print_status_display(config: &Config, orchestrator: &TurnOrchestrator, theme: Theme) {
        let conversation = orchestrator.conversation();
        let voice = if orchestrator.voice_output() {
            "on".green()
        } else {
            "off".yellow()
        };

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                        Session Status                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Assistant:         {}", config.assistant.name.cyan());
        println!("Model:             {}", config.provider.model);
        println!("Voice Output:      {}", voice);
        println!("Theme:             {}", theme);
        println!("Conversation Size: {} messages", conversation.len());
        println!(
            "Now Playing:       {}",
            conversation.current_track().unwrap_or("No music playing")
        );
        println!();
    }
}

// One-shot command handler
pub mod ask {
    //! Single-turn handler: submits the text once and prints the reply.

    use super::*;

    /// Run one turn
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Remote` when the completion failed, so the
    /// process exits unsuccessfully.
    pub async fn run_ask(config: Config, text: &str, mute: bool) -> Result<()> {
        let session = build_session(&config, mute)?;

        match session.orchestrator.submit(text).await? {
            TurnOutcome::Failed(message) => Err(MadanError::Remote(message).into()),
            TurnOutcome::Ignored => {
                session.renderer.notice("Nothing to ask.");
                Ok(())
            }
            TurnOutcome::Command { .. } | TurnOutcome::Answer(_) => Ok(()),
        }
    }
}
