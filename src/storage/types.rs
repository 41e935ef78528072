use crate::error::{MadanError, Result};
use crate::storage::KeyValueStore;
use std::fmt;

/// Conversation history (JSON array of messages)
pub const HISTORY_KEY: &str = "chatHistory";
/// Query log (JSON array of entries)
pub const QUERY_LOG_KEY: &str = "queryLogs";
/// Color theme (`dark` or `light`)
pub const THEME_KEY: &str = "chatTheme";
/// Spoken replies flag (`true` or `false`)
pub const VOICE_OUTPUT_KEY: &str = "voiceOutput";

/// Color theme for the chat surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse a theme name
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }

    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

/// Scalar user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub voice_output: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            voice_output: true,
        }
    }
}

impl Preferences {
    /// Load preferences, falling back to `defaults` for anything missing
    ///
    /// Unreadable or unrecognised values are logged and ignored; preferences
    /// never block startup.
    pub fn load(store: &dyn KeyValueStore, defaults: Preferences) -> Self {
        let mut prefs = defaults;

        match store.get(THEME_KEY) {
            Ok(Some(raw)) => match Theme::parse_str(&raw) {
                Ok(theme) => prefs.theme = theme,
                Err(e) => tracing::warn!("Ignoring stored theme: {}", e),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not read theme preference: {}", e),
        }

        match store.get(VOICE_OUTPUT_KEY) {
            Ok(Some(raw)) => match raw.as_str() {
                "true" => prefs.voice_output = true,
                "false" => prefs.voice_output = false,
                other => tracing::warn!("Ignoring stored voice output flag: {}", other),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not read voice output preference: {}", e),
        }

        prefs
    }

    /// Persist the theme
    pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<()> {
        store.set(THEME_KEY, &theme.to_string())
    }

    /// Persist the spoken replies flag
    pub fn save_voice_output(store: &dyn KeyValueStore, enabled: bool) -> Result<()> {
        store.set(VOICE_OUTPUT_KEY, if enabled { "true" } else { "false" })
    }
}

/// Parse an `on`/`off` style switch
pub fn parse_switch(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(MadanError::Config(format!("Expected on or off, got '{}'", other)).into()),
    }
}
