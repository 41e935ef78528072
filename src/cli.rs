//! Command-line interface definition for Madan
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, one-shot questions, history, the query
//! log and preferences.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Madan - voice and text chat assistant
///
/// Understands a handful of local commands (music, search, time, date)
/// and forwards everything else to a chat-completion endpoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "madan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the local store directory
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Per-session overrides shared by `chat` and `ask`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionArgs {
    /// Override the assistant (wake word) name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Override the completion model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Disable spoken replies for this session
    #[arg(long)]
    pub mute: bool,
}

/// Available commands for Madan
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Run a single turn and print the reply
    Ask {
        /// Text to submit, as typed or spoken
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Inspect or manage the stored conversation
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Print the query log
    Logs {
        /// Show only the most recent entries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change stored preferences
    Prefs {
        /// Color theme: dark or light
        #[arg(long)]
        theme: Option<String>,

        /// Spoken replies: on or off
        #[arg(long)]
        voice: Option<String>,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// Print the stored conversation
    Show {
        /// Show only the most recent messages
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete the stored conversation
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Write the stored conversation as an HTML transcript
    Export {
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Session overrides carried by the selected command, if any
    pub fn session_args(&self) -> Option<&SessionArgs> {
        match &self.command {
            Commands::Chat { session } | Commands::Ask { session, .. } => Some(session),
            _ => None,
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            command: Commands::Prefs {
                theme: None,
                voice: None,
            },
        }
    }
}
