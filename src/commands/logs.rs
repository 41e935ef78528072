//! Query log output
//!
//! Prints the recorded queries as a table, or as JSON with `--json`.

use crate::agent::{QueryLog, QueryLogEntry, QueryType};
use crate::commands::open_store;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

/// Entries shown when no limit is given
pub const DEFAULT_LIMIT: usize = 20;

/// Show the newest query log entries
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `limit` - Number of entries, newest last; [`DEFAULT_LIMIT`] when `None`
/// * `json` - Print JSON instead of a table
pub fn show_logs(config: &Config, limit: Option<usize>, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let log = QueryLog::with_capacity(store, config.history.max_query_log);
    let entries = log.recent(limit.unwrap_or(DEFAULT_LIMIT))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "No queries logged yet.".yellow());
        return Ok(());
    }

    println!("\nRecent Queries:");
    logs_table(&entries).printstd();
    println!();

    Ok(())
}

fn logs_table(entries: &[QueryLogEntry]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "Time".bold(),
        "Type".bold(),
        "Query".bold()
    ]);

    for entry in entries {
        let kind = entry.kind.to_string();
        let kind = match entry.kind {
            QueryType::Command => kind.cyan(),
            QueryType::Question => kind.green(),
        };
        let query = if entry.query.chars().count() > 60 {
            format!("{}...", entry.query.chars().take(57).collect::<String>())
        } else {
            entry.query.clone()
        };
        let time = entry
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        table.add_row(prettytable::row![time, kind, query]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_logs_table_has_header_and_rows() {
        let entries = vec![
            QueryLogEntry {
                query: "play believer".to_string(),
                kind: QueryType::Command,
                timestamp: Utc::now(),
            },
            QueryLogEntry {
                query: "x".repeat(100),
                kind: QueryType::Question,
                timestamp: Utc::now(),
            },
        ];

        let table = logs_table(&entries);
        assert_eq!(table.len(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("play believer"));
        assert!(rendered.contains(&format!("{}...", "x".repeat(57))));
    }

    #[test]
    fn test_show_logs_on_empty_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("store").display().to_string());

        assert!(show_logs(&config, None, false).is_ok());
        assert!(show_logs(&config, Some(5), true).is_ok());
    }
}
