//! Special commands parser for interactive chat mode
//!
//! Special commands act on the session itself (clearing it, switching
//! voice output or theme, starting voice capture) instead of being
//! submitted as a turn. They start with `/` and are case-insensitive;
//! `exit` and `quit` also work without the slash.

use crate::storage::Theme;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },
}

/// Session commands available in interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show available commands
    Help,

    /// Clear the conversation and stored history, after confirmation
    Clear,

    /// Turn spoken replies on (`Some(true)`), off, or toggle (`None`)
    Voice(Option<bool>),

    /// Switch to a theme, or toggle (`None`)
    Theme(Option<Theme>),

    /// Capture one spoken utterance and submit it
    Listen,

    /// Show session status
    ShowStatus,

    /// Exit the interactive session
    Exit,

    /// Not a special command; submit the input as a turn
    None,
}

fn parse_voice_arg(arg: &str) -> Result<SpecialCommand, CommandError> {
    match arg {
        "" | "toggle" => Ok(SpecialCommand::Voice(None)),
        "on" => Ok(SpecialCommand::Voice(Some(true))),
        "off" | "mute" => Ok(SpecialCommand::Voice(Some(false))),
        other => Err(CommandError::UnsupportedArgument {
            command: "/voice".to_string(),
            arg: other.to_string(),
        }),
    }
}

fn parse_theme_arg(arg: &str) -> Result<SpecialCommand, CommandError> {
    if arg.is_empty() || arg == "toggle" {
        return Ok(SpecialCommand::Theme(None));
    }
    Theme::parse_str(arg)
        .map(|theme| SpecialCommand::Theme(Some(theme)))
        .map_err(|_| CommandError::UnsupportedArgument {
            command: "/theme".to_string(),
            arg: arg.to_string(),
        })
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognised `/` input and
/// `CommandError::UnsupportedArgument` for a bad argument.
///
/// # Examples
///
/// ```
/// use madan::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/voice off").unwrap(), SpecialCommand::Voice(Some(false)));
/// assert_eq!(parse_special_command("play believer").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = match lower.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (lower.as_str(), ""),
    };

    match command {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/clear" => Ok(SpecialCommand::Clear),
        "/voice" => parse_voice_arg(arg),
        "/theme" => parse_theme_arg(arg),
        "/listen" | "/mic" => Ok(SpecialCommand::Listen),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for special commands
pub fn print_help(assistant_name: &str) {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

CONVERSATION:
  /clear          - Clear the conversation and saved history (asks first)
  /status         - Show voice, theme and history status

VOICE:
  /listen         - Speak a request (uses the configured recognizer)
  /mic            - Same as /listen
  /voice          - Toggle spoken replies
  /voice on|off   - Turn spoken replies on or off

APPEARANCE:
  /theme          - Toggle between dark and light
  /theme dark|light - Switch to a theme

SESSION CONTROL:
  /help           - Show this help message
  /?              - Same as /help
  exit            - Exit interactive mode
  quit            - Same as exit

LOCAL COMMANDS (handled without the AI):
  play <song>                 - Open the song on YouTube
  stop                        - Stop the music
  search <query>              - Search Google
  open youtube / open google  - Open the site
  what time is it             - Current time
  what is the date            - Today's date
  who are you                 - Introduction

NOTES:
  - Commands are case-insensitive
  - You may start with "Hey {name}"; the wake word is ignored
  - Anything else is answered by the AI
"#,
        name = assistant_name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_special_command("tell me a joke").unwrap(), SpecialCommand::None);
        assert_eq!(parse_special_command("exit the matrix").unwrap(), SpecialCommand::None);
    }

    #[test]
    fn test_exit_aliases() {
        for input in ["exit", "QUIT", "/exit", "/quit", "  exit  "] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_help_and_status() {
        assert_eq!(parse_special_command("/help").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/STATUS").unwrap(), SpecialCommand::ShowStatus);
    }

    #[test]
    fn test_clear_and_listen() {
        assert_eq!(parse_special_command("/clear").unwrap(), SpecialCommand::Clear);
        assert_eq!(parse_special_command("/listen").unwrap(), SpecialCommand::Listen);
        assert_eq!(parse_special_command("/mic").unwrap(), SpecialCommand::Listen);
    }

    #[test]
    fn test_voice_arguments() {
        assert_eq!(parse_special_command("/voice").unwrap(), SpecialCommand::Voice(None));
        assert_eq!(
            parse_special_command("/voice ON").unwrap(),
            SpecialCommand::Voice(Some(true))
        );
        assert_eq!(
            parse_special_command("/voice off").unwrap(),
            SpecialCommand::Voice(Some(false))
        );
        assert_eq!(
            parse_special_command("/voice loud").unwrap_err(),
            CommandError::UnsupportedArgument {
                command: "/voice".to_string(),
                arg: "loud".to_string(),
            }
        );
    }

    #[test]
    fn test_theme_arguments() {
        assert_eq!(parse_special_command("/theme").unwrap(), SpecialCommand::Theme(None));
        assert_eq!(
            parse_special_command("/theme light").unwrap(),
            SpecialCommand::Theme(Some(Theme::Light))
        );
        assert!(parse_special_command("/theme neon").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_special_command("/dance").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("/dance".to_string()));
        assert!(err.to_string().contains("/help"));
    }
}
