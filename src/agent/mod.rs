//! Agent module for Madan
//!
//! This module contains the conversation session, the query log and the
//! turn orchestrator that ties classification, command execution and
//! completion together.

pub mod conversation;
pub mod orchestrator;
pub mod query_log;

pub use conversation::Conversation;
pub use orchestrator::{TurnOrchestrator, TurnOutcome, TurnState};
pub use query_log::{QueryLog, QueryLogEntry, QueryType};
