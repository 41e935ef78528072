//! Madan - voice and text chat assistant library
//!
//! This library provides the core functionality for the Madan assistant:
//! wake-word handling, local command classification and execution, the
//! conversation session, the completion client and the turn orchestrator
//! that ties them together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `intent`: Wake-word normalizer, command classifier and executor
//! - `agent`: Conversation session, query log and turn orchestrator
//! - `providers`: Chat-completion client abstraction and HTTP implementation
//! - `render`: Chat entries, markdown formatting, terminal and HTML output
//! - `speech`: Voice capture and spoken replies
//! - `storage`: Local key-value store and preferences
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use madan::intent::{Command, CommandClassifier};
//!
//! let classifier = CommandClassifier::new("Madan").unwrap();
//! assert_eq!(
//!     classifier.classify("Hey Madan, play Believer", None),
//!     Some(Command::PlayMusic("Believer".to_string()))
//! );
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod intent;
pub mod providers;
pub mod render;
pub mod speech;
pub mod storage;

// Re-export commonly used types
pub use agent::{Conversation, TurnOrchestrator, TurnOutcome};
pub use config::Config;
pub use error::{MadanError, Result};
pub use intent::{Command, CommandClassifier, CommandExecutor, WakeWordNormalizer};

#[cfg(test)]
pub mod test_utils;
