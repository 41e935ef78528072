//! Coloured terminal rendering

use crate::render::{ChatEntry, Renderer};
use crate::storage::Theme;
use colored::{Color, Colorize};
use regex::{Captures, Regex};
use std::sync::Mutex;

/// Colours for one theme
#[derive(Debug, Clone, Copy)]
struct Palette {
    user: Color,
    assistant: Color,
    error: Color,
    muted: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                user: Color::BrightCyan,
                assistant: Color::BrightWhite,
                error: Color::BrightRed,
                muted: Color::BrightBlack,
            },
            Theme::Light => Self {
                user: Color::Blue,
                assistant: Color::Black,
                error: Color::Red,
                muted: Color::BrightBlack,
            },
        }
    }
}

/// Prints chat entries to stdout
pub struct TerminalRenderer {
    assistant_name: String,
    theme: Mutex<Theme>,
    bold: Option<Regex>,
    code: Option<Regex>,
}

impl TerminalRenderer {
    pub fn new(assistant_name: impl Into<String>, theme: Theme) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            theme: Mutex::new(theme),
            bold: Regex::new(r"\*\*([^*]+)\*\*").ok(),
            code: Regex::new(r"`([^`]+)`").ok(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme.lock().map(|t| *t).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        if let Ok(mut current) = self.theme.lock() {
            *current = theme;
        }
    }

    /// Apply bold and inline-code styling to assistant text
    fn style_reply(&self, text: &str, color: Color) -> String {
        let mut styled = text.to_string();
        if let Some(re) = &self.bold {
            styled = re
                .replace_all(&styled, |caps: &Captures| caps[1].bold().to_string())
                .to_string();
        }
        if let Some(re) = &self.code {
            styled = re
                .replace_all(&styled, |caps: &Captures| caps[1].yellow().to_string())
                .to_string();
        }
        styled.color(color).to_string()
    }

    /// The text printed for an entry, without the trailing newline
    pub fn format_entry(&self, entry: &ChatEntry) -> String {
        let palette = Palette::for_theme(self.theme());
        let time = format!("[{}]", entry.time_label()).color(palette.muted);

        if entry.is_user {
            // User text is shown exactly as typed.
            format!(
                "{} {} {}",
                time,
                "You:".color(palette.user).bold(),
                entry.text.color(palette.user)
            )
        } else if entry.is_error {
            format!(
                "{} {} {}",
                time,
                format!("{}:", self.assistant_name).color(palette.error).bold(),
                entry.text.color(palette.error)
            )
        } else {
            format!(
                "{} {} {}",
                time,
                format!("{}:", self.assistant_name)
                    .color(palette.assistant)
                    .bold(),
                self.style_reply(&entry.text, palette.assistant)
            )
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, entry: &ChatEntry) {
        println!("{}\n", self.format_entry(entry));
    }

    fn notice(&self, text: &str) {
        let palette = Palette::for_theme(self.theme());
        println!("{}", text.color(palette.muted).italic());
    }

    fn typing(&self, active: bool) {
        if active {
            let palette = Palette::for_theme(self.theme());
            println!(
                "{}",
                format!("{} is typing...", self.assistant_name)
                    .color(palette.muted)
                    .italic()
            );
        }
    }
}
