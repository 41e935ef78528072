//! Preference management
//!
//! With no flags, prints the effective preferences. `--theme` and
//! `--voice` store new values.

use crate::commands::{load_preferences, open_store};
use crate::config::Config;
use crate::error::{MadanError, Result};
use crate::storage::{types::parse_switch, Preferences, Theme};
use colored::Colorize;

/// Show or update stored preferences
pub fn handle_prefs(config: &Config, theme: Option<String>, voice: Option<String>) -> Result<()> {
    let store = open_store(config)?;

    if let Some(theme) = theme {
        let theme = Theme::parse_str(&theme).map_err(MadanError::Config)?;
        Preferences::save_theme(store.as_ref(), theme)?;
        println!("{}", format!("Theme set to {}", theme).green());
    }

    if let Some(voice) = voice {
        let enabled = parse_switch(&voice)?;
        Preferences::save_voice_output(store.as_ref(), enabled)?;
        let message = if enabled {
            "Voice output enabled"
        } else {
            "Voice output disabled"
        };
        println!("{}", message.green());
    }

    let prefs = load_preferences(config, store.as_ref());
    println!("Assistant:    {}", config.assistant.name.cyan());
    println!("Theme:        {}", prefs.theme);
    println!(
        "Voice Output: {}",
        if prefs.voice_output { "on" } else { "off" }
    );
    println!("Store:        {}", describe_store(config));

    Ok(())
}

fn describe_store(config: &Config) -> String {
    match &config.storage.path {
        Some(path) => path.clone(),
        None => crate::storage::default_store_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "-".to_string()),
    }
}
