//! Markdown-like formatting of assistant replies
//!
//! Replies are escaped first and then rewritten by an ordered chain of
//! regex substitutions into an HTML fragment. The chain is deliberately
//! shallow (no nesting, no parser) and each step sees the output of the
//! previous one, so order matters.

use regex::{Captures, Regex};

/// Substitutions applied after code blocks, in order
const RULES: &[(&str, &str)] = &[
    // inline code
    (r"`([^`]+)`", "<code>${1}</code>"),
    // bold
    (r"\*\*([^*]+)\*\*", "<strong>${1}</strong>"),
    (r"__([^_]+)__", "<strong>${1}</strong>"),
    // italic
    (r"\*([^*]+)\*", "<em>${1}</em>"),
    (r"_([^_]+)_", "<em>${1}</em>"),
    // headings
    (r"(?m)^### (.+)$", "<h3>${1}</h3>"),
    (r"(?m)^## (.+)$", "<h2>${1}</h2>"),
    (r"(?m)^# (.+)$", "<h1>${1}</h1>"),
    // block quotes, already escaped
    (r"(?m)^&gt; (.+)$", "<blockquote>${1}</blockquote>"),
    // unordered items, then wrap runs of items
    (r"(?m)^[-*] (.+)$", "<li>${1}</li>"),
    (r"(<li>.*</li>\n?)+", "<ul>${0}</ul>"),
    // numbered items stay unwrapped
    (r"(?m)^\d+\. (.+)$", "<li>${1}</li>"),
    // links
    (r"\[([^\]]+)\]\(([^)]+)\)", r#"<a href="${2}" target="_blank">${1}</a>"#),
    (r"\n", "<br>"),
    (r"(<br>){3,}", "<br><br>"),
];

/// Escape text for literal display inside HTML
///
/// Quotes are left alone; the output is only ever used as element content.
///
/// # Examples
///
/// ```
/// use madan::render::markdown::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render an assistant reply as an HTML fragment
///
/// # Examples
///
/// ```
/// use madan::render::markdown::format_markdown;
///
/// assert_eq!(format_markdown("**Hi** there"), "<strong>Hi</strong> there");
/// ```
pub fn format_markdown(text: &str) -> String {
    let mut result = escape_html(text);

    if let Ok(re) = Regex::new(r"```(\w*)\n?([\s\S]*?)```") {
        result = re
            .replace_all(&result, |caps: &Captures| {
                let lang = match &caps[1] {
                    "" => "plaintext",
                    lang => lang,
                };
                format!(
                    "<pre><code class=\"language-{}\">{}</code></pre>",
                    lang,
                    caps[2].trim()
                )
            })
            .to_string();
    }

    for (pattern, replacement) in RULES {
        if let Ok(re) = Regex::new(pattern) {
            result = re.replace_all(&result, *replacement).to_string();
        }
    }

    result
}
