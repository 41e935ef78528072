//! Standalone HTML transcript of a conversation

use crate::error::Result;
use crate::providers::{Message, Role};
use crate::render::markdown::{escape_html, format_markdown};
use crate::storage::Theme;
use anyhow::Context;
use std::path::Path;

const DARK_STYLE: &str = "body{background:#0f172a;color:#e2e8f0}\
.user .bubble{background:#1e40af}.assistant .bubble{background:#1e293b}\
code,pre{background:#020617}";

const LIGHT_STYLE: &str = "body{background:#f8fafc;color:#0f172a}\
.user .bubble{background:#dbeafe}.assistant .bubble{background:#ffffff}\
code,pre{background:#e2e8f0}";

const BASE_STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto}\
.message{margin:0.75rem 0}.user{text-align:right}\
.bubble{display:inline-block;padding:0.6rem 0.9rem;border-radius:0.8rem;text-align:left}\
.role{font-size:0.75rem;opacity:0.7;margin-bottom:0.2rem}\
pre{padding:0.5rem;overflow-x:auto}";

/// Render stored messages as a complete HTML page
///
/// User text is escaped verbatim; assistant text goes through
/// [`format_markdown`]. System messages are never part of a transcript.
pub fn export_html(messages: &[Message], assistant_name: &str, theme: Theme) -> String {
    let name = escape_html(assistant_name);
    let theme_style = match theme {
        Theme::Dark => DARK_STYLE,
        Theme::Light => LIGHT_STYLE,
    };

    let mut body = String::new();
    for message in messages {
        let (class, label, content) = match message.role {
            Role::User => ("user", "You".to_string(), escape_html(&message.content)),
            Role::Assistant => (
                "assistant",
                format!("{}'s AI", name),
                format_markdown(&message.content),
            ),
            Role::System => continue,
        };
        body.push_str(&format!(
            "<div class=\"message {}\"><div class=\"role\">{}</div><div class=\"bubble\">{}</div></div>\n",
            class, label, content
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{name}'s AI conversation</title>\n<style>{base}{theme}</style>\n</head>\n\
<body>\n<h1>{name}'s AI conversation</h1>\n{body}</body>\n</html>\n",
        name = name,
        base = BASE_STYLE,
        theme = theme_style,
        body = body
    )
}

/// Write [`export_html`] output to a file
pub fn write_transcript(
    path: &Path,
    messages: &[Message],
    assistant_name: &str,
    theme: Theme,
) -> Result<()> {
    std::fs::write(path, export_html(messages, assistant_name, theme))
        .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
    tracing::info!("Exported {} messages to {}", messages.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_text_is_escaped_and_reply_is_formatted() {
        let messages = vec![
            Message::user("<b>**literal**</b>"),
            Message::assistant("**bold** reply"),
        ];
        let html = export_html(&messages, "Madan", Theme::Dark);

        assert!(html.contains("&lt;b&gt;**literal**&lt;/b&gt;"));
        assert!(html.contains("<strong>bold</strong> reply"));
        assert!(html.contains("Madan's AI conversation"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_system_messages_are_skipped() {
        let html = export_html(&[Message::system("secret rules")], "Madan", Theme::Light);
        assert!(!html.contains("secret rules"));
        assert!(html.contains("#f8fafc"));
    }

    #[test]
    fn test_write_transcript() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chat.html");
        write_transcript(&path, &[Message::user("hi")], "Madan", Theme::Dark).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<div class=\"bubble\">hi</div>"));
    }
}
