//! Query log
//!
//! Every submitted utterance is recorded as either a command or a question,
//! oldest first, in a bounded list stored under [`QUERY_LOG_KEY`].

use crate::error::Result;
use crate::storage::{load_json, save_json, KeyValueStore, QUERY_LOG_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Entries kept before the oldest are dropped
pub const DEFAULT_CAPACITY: usize = 500;

/// How an utterance was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Matched a local command
    Command,
    /// Forwarded to the completion provider
    Question,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Question => write!(f, "question"),
        }
    }
}

/// One recorded utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: QueryType,
    pub timestamp: DateTime<Utc>,
}

/// Append-only ring buffer of queries backed by a key-value store
pub struct QueryLog {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
}

impl QueryLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    /// Record a query, dropping the oldest entries beyond capacity
    ///
    /// Storage failures are logged and ignored; logging must never break a
    /// turn.
    pub fn record(&self, query: &str, kind: QueryType) {
        if let Err(e) = self.try_record(query, kind) {
            tracing::warn!("Could not log query: {}", e);
        }
    }

    fn try_record(&self, query: &str, kind: QueryType) -> Result<()> {
        // A corrupt log is replaced rather than blocking new entries.
        let mut entries = self.entries().unwrap_or_default();
        entries.push(QueryLogEntry {
            query: query.to_string(),
            kind,
            timestamp: Utc::now(),
        });

        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }

        save_json(self.store.as_ref(), QUERY_LOG_KEY, &entries)?;
        tracing::debug!("Query logged: {} ({})", query, kind);
        Ok(())
    }

    /// All entries, oldest first
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Persistence` if the stored log is unreadable
    pub fn entries(&self) -> Result<Vec<QueryLogEntry>> {
        Ok(load_json(self.store.as_ref(), QUERY_LOG_KEY)?.unwrap_or_default())
    }

    /// The newest `limit` entries, oldest first
    pub fn recent(&self, limit: usize) -> Result<Vec<QueryLogEntry>> {
        let mut entries = self.entries()?;
        let start = entries.len().saturating_sub(limit);
        Ok(entries.split_off(start))
    }
}
