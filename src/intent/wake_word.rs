//! Wake-word stripping
//!
//! Users may address the assistant before giving a command ("Hey Madan,
//! play believer"). The normalizer removes that prefix so the classifier
//! sees only the request.

use crate::error::{MadanError, Result};
use regex::Regex;

/// Removes a greeting and/or the assistant's name from the start of input
#[derive(Debug, Clone)]
pub struct WakeWordNormalizer {
    name_lower: String,
    rules: Vec<Regex>,
}

impl WakeWordNormalizer {
    /// Build the prefix rules for an assistant name
    ///
    /// Rules are applied in this order, all case-insensitive, and the whole
    /// pass repeats until it removes nothing:
    ///
    /// 1. greeting + name: `hey|hi|hello|ok|okay <name>[,\s]*`
    /// 2. name followed by punctuation or whitespace: `<name>[,\s]+`
    /// 3. possessive form: `<name>'s ai[,\s]*`
    /// 4. bare name: `<name>\s*`
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Config` if the name is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use madan::intent::WakeWordNormalizer;
    ///
    /// let normalizer = WakeWordNormalizer::new("Madan").unwrap();
    /// assert_eq!(normalizer.normalize("Hey Madan, what time is it"), "what time is it");
    /// assert_eq!(normalizer.normalize("Madan"), "Madan");
    /// ```
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MadanError::Config("Assistant name cannot be empty".to_string()).into());
        }

        let escaped = regex::escape(name);
        let patterns = [
            format!(r"(?i)^(hey|hi|hello|ok|okay)\s+{}[,\s]*", escaped),
            format!(r"(?i)^{}[,\s]+", escaped),
            format!(r"(?i)^{}'s ai[,\s]*", escaped),
            format!(r"(?i)^{}\s*", escaped),
        ];

        let rules = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| MadanError::Config(format!("Invalid wake word pattern: {}", e)))?;

        Ok(Self {
            name_lower: name.to_lowercase(),
            rules,
        })
    }

    /// Strip the wake word and return the trimmed remainder
    ///
    /// A lone wake word never vanishes: when nothing is left after
    /// stripping, the trimmed original is returned.
    pub fn normalize(&self, raw: &str) -> String {
        let mut cleaned = raw.trim().to_string();
        loop {
            let before = cleaned.len();
            for rule in &self.rules {
                cleaned = rule.replace(&cleaned, "").trim().to_string();
            }
            // Every match is non-empty, so an unchanged length means a fixed point.
            if cleaned.len() == before {
                break;
            }
        }

        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            raw.trim().to_string()
        } else {
            cleaned.to_string()
        }
    }

    /// Whether the raw text contains the assistant's name anywhere
    pub fn mentions_name(&self, raw: &str) -> bool {
        raw.to_lowercase().contains(&self.name_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> WakeWordNormalizer {
        WakeWordNormalizer::new("Madan").unwrap()
    }

    #[test]
    fn test_strips_greeting_and_name() {
        let n = normalizer();
        assert_eq!(n.normalize("Hey Madan, what time is it"), "what time is it");
        assert_eq!(n.normalize("okay madan play believer"), "play believer");
        assert_eq!(n.normalize("HELLO MADAN tell me a joke"), "tell me a joke");
    }

    #[test]
    fn test_strips_bare_name_with_punctuation() {
        let n = normalizer();
        assert_eq!(n.normalize("Madan, open youtube"), "open youtube");
        assert_eq!(n.normalize("madan stop"), "stop");
    }

    #[test]
    fn test_strips_possessive_form() {
        let n = normalizer();
        assert_eq!(n.normalize("Madan's AI, what is the date"), "what is the date");
    }

    #[test]
    fn test_leaves_text_without_wake_word() {
        let n = normalizer();
        assert_eq!(n.normalize("  tell me a joke  "), "tell me a joke");
        assert_eq!(n.normalize("hey there"), "hey there");
    }

    #[test]
    fn test_lone_wake_word_falls_back_to_original() {
        let n = normalizer();
        assert_eq!(n.normalize("Madan"), "Madan");
        assert_eq!(n.normalize("  Hey Madan  "), "Hey Madan");
        assert_eq!(n.normalize("madan,"), "madan,");
    }

    #[test]
    fn test_name_inside_sentence_is_kept() {
        let n = normalizer();
        assert_eq!(n.normalize("say hi to madan"), "say hi to madan");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        let inputs = [
            "Hey Madan, what time is it",
            "Madan",
            "madan, madan play music",
            "Madan's AI",
            "hello madan",
            "search for rust",
            "",
            "   ",
            "hi madan, hey madan",
            "hey madan hey madan play x",
            "madan madan madan play x",
            "  hey madan play x",
        ];
        for input in inputs {
            let once = n.normalize(input);
            assert_eq!(n.normalize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_repeated_wake_words_are_all_stripped() {
        let n = normalizer();
        assert_eq!(n.normalize("hey madan hey madan play x"), "play x");
        assert_eq!(n.normalize("madan madan madan play x"), "play x");
        assert_eq!(n.normalize("Hey Madan, Madan's AI, what time is it"), "what time is it");
        assert_eq!(n.normalize("hey madan hey madan"), "hey madan hey madan");
    }

    #[test]
    fn test_custom_name_is_escaped() {
        let n = WakeWordNormalizer::new("J.A.R.V.I.S").unwrap();
        assert_eq!(n.normalize("hey j.a.r.v.i.s play jazz"), "play jazz");
        assert_eq!(n.normalize("hey jxaxrxvxixs play jazz"), "hey jxaxrxvxixs play jazz");
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(WakeWordNormalizer::new("  ").is_err());
    }

    #[test]
    fn test_mentions_name() {
        let n = normalizer();
        assert!(n.mentions_name("Hello MADAN"));
        assert!(!n.mentions_name("hello there"));
    }
}
