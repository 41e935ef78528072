//! Command classification
//!
//! A best-effort keyword classifier: the normalized utterance is checked
//! against an ordered rule table and the first rule that produces a
//! command wins. Later rules are never consulted once one matches, so the
//! order of [`RULES`] is part of the behavior.

use crate::error::{MadanError, Result};
use crate::intent::{Command, WakeWordNormalizer};
use regex::Regex;

/// Everything a rule may look at
#[derive(Debug)]
pub struct Utterance<'a> {
    /// Text with the wake word removed, original casing
    pub cleaned: &'a str,
    /// `cleaned`, lowercased and trimmed
    pub lower: &'a str,
    /// Raw input mentions the assistant's name (wake word not stripped)
    pub mentions_name: bool,
    /// Track the executor last started, if any
    pub current_track: Option<&'a str>,
}

/// Filler patterns used to trim extracted arguments
#[derive(Debug, Clone)]
struct Fillers {
    play_leading: Regex,
    play_trailing: Regex,
    search_leading: Regex,
    search_trailing: Regex,
}

impl Fillers {
    fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            play_leading: Regex::new(r"(?i)^(song|music|the song|a song|me|for me)\b\s*")?,
            play_trailing: Regex::new(r"(?i)\s*\b(song|for me|please)$")?,
            search_leading: Regex::new(r"(?i)^(search|google)\b\s*")?,
            search_trailing: Regex::new(r"(?i)\s*\b(for|on google|on the internet)$")?,
        })
    }
}

type Matcher = fn(&Fillers, &Utterance<'_>) -> Option<Command>;

/// One entry of the rule table
struct Rule {
    name: &'static str,
    matcher: Matcher,
}

/// The rule table, in evaluation order
const RULES: &[Rule] = &[
    Rule {
        name: "play_music",
        matcher: match_play,
    },
    Rule {
        name: "stop_music",
        matcher: match_stop,
    },
    Rule {
        name: "search",
        matcher: match_search,
    },
    Rule {
        name: "open_youtube",
        matcher: match_open_youtube,
    },
    Rule {
        name: "open_google",
        matcher: match_open_google,
    },
    Rule {
        name: "get_time",
        matcher: match_time,
    },
    Rule {
        name: "get_date",
        matcher: match_date,
    },
    Rule {
        name: "greeting",
        matcher: match_greeting,
    },
    Rule {
        name: "introduce",
        matcher: match_introduce,
    },
];

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn match_play(fillers: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    let idx = u.lower.find("play")?;
    let after = u
        .cleaned
        .get(idx + 4..)
        .unwrap_or_else(|| &u.lower[idx + 4..])
        .trim();

    let song = fillers.play_leading.replace(after, "");
    let song = fillers.play_trailing.replace(song.trim(), "");
    let song = song.trim();

    if song.is_empty() {
        None
    } else {
        Some(Command::PlayMusic(song.to_string()))
    }
}

fn match_stop(_: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    if !contains_any(u.lower, &["stop", "pause", "turn off"]) {
        return None;
    }

    // A marked track makes any stop-like utterance a music stop, even an
    // unrelated one.
    let about_music = contains_any(u.lower, &["music", "song", "playing"])
        || u.lower == "stop"
        || u.current_track.is_some();

    about_music.then_some(Command::StopMusic)
}

fn match_search(fillers: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    if !(u.lower.contains("search") || u.lower.starts_with("google ")) {
        return None;
    }

    let query = fillers.search_leading.replace(u.lower, "");
    let query = fillers.search_trailing.replace(query.trim(), "");
    let query = query.trim();

    if query.is_empty() {
        None
    } else {
        Some(Command::Search(query.to_string()))
    }
}

fn match_open_youtube(_: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    (u.lower.contains("open youtube") || u.lower == "youtube").then_some(Command::OpenYoutube)
}

fn match_open_google(_: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    (u.lower.contains("open google") || u.lower == "google").then_some(Command::OpenGoogle)
}

fn match_time(_: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    (u.lower.contains("time") && contains_any(u.lower, &["what", "current", "tell"]))
        .then_some(Command::GetTime)
}

fn match_date(_: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    contains_any(u.lower, &["date", "today", "what day"]).then_some(Command::GetDate)
}

fn match_greeting(_: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    (u.mentions_name && contains_any(u.lower, &["hello", "hi", "hey"]))
        .then_some(Command::Greeting)
}

fn match_introduce(_: &Fillers, u: &Utterance<'_>) -> Option<Command> {
    contains_any(u.lower, &["your name", "who are you", "what are you"])
        .then_some(Command::Introduce)
}

/// Maps raw utterances to local commands
///
/// # Examples
///
/// ```
/// use madan::intent::{Command, CommandClassifier};
///
/// let classifier = CommandClassifier::new("Madan").unwrap();
/// assert_eq!(
///     classifier.classify("Hey Madan, play Believer please", None),
///     Some(Command::PlayMusic("Believer".to_string()))
/// );
/// assert_eq!(classifier.classify("tell me a joke", None), None);
/// ```
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    normalizer: WakeWordNormalizer,
    fillers: Fillers,
}

impl CommandClassifier {
    /// Create a classifier for the given assistant name
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Config` if the name is empty or a pattern
    /// fails to compile
    pub fn new(assistant_name: &str) -> Result<Self> {
        let normalizer = WakeWordNormalizer::new(assistant_name)?;
        let fillers = Fillers::new()
            .map_err(|e| MadanError::Config(format!("Invalid command pattern: {}", e)))?;
        Ok(Self {
            normalizer,
            fillers,
        })
    }

    /// Wake-word normalizer used before matching
    pub fn normalizer(&self) -> &WakeWordNormalizer {
        &self.normalizer
    }

    /// Names of the rules in evaluation order
    pub fn rule_names() -> Vec<&'static str> {
        RULES.iter().map(|r| r.name).collect()
    }

    /// Classify an utterance
    ///
    /// Returns `None` when no rule matches; the text should then be
    /// treated as a question for the completion provider.
    pub fn classify(&self, raw: &str, current_track: Option<&str>) -> Option<Command> {
        let cleaned = self.normalizer.normalize(raw);
        let lower = cleaned.to_lowercase();
        let utterance = Utterance {
            cleaned: &cleaned,
            lower: lower.trim(),
            mentions_name: self.normalizer.mentions_name(raw),
            current_track,
        };

        tracing::debug!("Classifying {:?} (cleaned {:?})", raw, cleaned);

        for rule in RULES {
            if let Some(command) = (rule.matcher)(&self.fillers, &utterance) {
                tracing::debug!("Rule {} matched: {}", rule.name, command);
                return Some(command);
            }
        }

        tracing::debug!("No command rule matched");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CommandClassifier {
        CommandClassifier::new("Madan").unwrap()
    }

    fn classify(text: &str) -> Option<Command> {
        classifier().classify(text, None)
    }

    fn play(name: &str) -> Option<Command> {
        Some(Command::PlayMusic(name.to_string()))
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            CommandClassifier::rule_names(),
            vec![
                "play_music",
                "stop_music",
                "search",
                "open_youtube",
                "open_google",
                "get_time",
                "get_date",
                "greeting",
                "introduce",
            ]
        );
    }

    #[test]
    fn test_play_extracts_song_name() {
        assert_eq!(classify("play Believer"), play("Believer"));
        assert_eq!(classify("Hey Madan, play Shape of You"), play("Shape of You"));
    }

    #[test]
    fn test_play_strips_fillers_on_both_sides() {
        assert_eq!(classify("play the song Believer"), play("Believer"));
        assert_eq!(classify("play me Imagine please"), play("Imagine"));
        assert_eq!(classify("play for me Yellow"), play("Yellow"));
        assert_eq!(classify("play a song Numb song"), play("Numb"));
        assert_eq!(classify("please play Hurt for me"), play("Hurt"));
    }

    #[test]
    fn test_play_keeps_names_that_start_with_filler_letters() {
        assert_eq!(classify("play Metallica"), play("Metallica"));
        assert_eq!(classify("play Songbird"), play("Songbird"));
    }

    #[test]
    fn test_play_without_song_falls_through() {
        assert_eq!(classify("play"), None);
        assert_eq!(classify("play music"), None);
        assert_eq!(classify("play the song please"), None);
    }

    #[test]
    fn test_play_wins_over_search() {
        assert_eq!(
            classify("play and then search for cats"),
            play("and then search for cats")
        );
    }

    #[test]
    fn test_play_wins_over_stop() {
        assert_eq!(classify("play stop this train"), play("stop this train"));
    }

    #[test]
    fn test_stop_alone_always_stops() {
        let c = classifier();
        assert_eq!(c.classify("stop", None), Some(Command::StopMusic));
        assert_eq!(c.classify("stop", Some("Believer")), Some(Command::StopMusic));
        assert_eq!(c.classify("Madan, stop", None), Some(Command::StopMusic));
    }

    #[test]
    fn test_pause_without_music_context_is_a_question() {
        assert_eq!(classifier().classify("pause", None), None);
    }

    #[test]
    fn test_stop_keywords_with_music_words() {
        assert_eq!(classify("pause the music"), Some(Command::StopMusic));
        assert_eq!(classify("turn off the song"), Some(Command::StopMusic));
    }

    #[test]
    fn test_current_track_makes_any_stop_a_music_stop() {
        let c = classifier();
        assert_eq!(c.classify("how do I stop procrastinating", None), None);
        assert_eq!(
            c.classify("how do I stop procrastinating", Some("Believer")),
            Some(Command::StopMusic)
        );
    }

    #[test]
    fn test_search_extracts_query() {
        assert_eq!(
            classify("search rust lifetimes"),
            Some(Command::Search("rust lifetimes".to_string()))
        );
        assert_eq!(
            classify("google weather in pune"),
            Some(Command::Search("weather in pune".to_string()))
        );
        assert_eq!(
            classify("search cats on google"),
            Some(Command::Search("cats".to_string()))
        );
        assert_eq!(
            classify("search dogs on the internet"),
            Some(Command::Search("dogs".to_string()))
        );
    }

    #[test]
    fn test_search_leading_for_is_kept() {
        // Only a trailing "for" is stripped.
        assert_eq!(
            classify("search for cats"),
            Some(Command::Search("for cats".to_string()))
        );
    }

    #[test]
    fn test_search_prefix_matches_whole_word_only() {
        assert_eq!(
            classify("searching for cats"),
            Some(Command::Search("searching for cats".to_string()))
        );
    }

    #[test]
    fn test_search_query_is_lowercased() {
        assert_eq!(
            classify("Search Taylor Swift"),
            Some(Command::Search("taylor swift".to_string()))
        );
    }

    #[test]
    fn test_search_without_query_falls_through() {
        assert_eq!(classify("search"), None);
    }

    #[test]
    fn test_open_sites() {
        assert_eq!(classify("open youtube"), Some(Command::OpenYoutube));
        assert_eq!(classify("YouTube"), Some(Command::OpenYoutube));
        assert_eq!(classify("please open google"), Some(Command::OpenGoogle));
        assert_eq!(classify("google"), Some(Command::OpenGoogle));
    }

    #[test]
    fn test_google_with_query_is_search_not_open() {
        assert_eq!(
            classify("google rust"),
            Some(Command::Search("rust".to_string()))
        );
    }

    #[test]
    fn test_time_requires_question_word() {
        assert_eq!(classify("what time is it"), Some(Command::GetTime));
        assert_eq!(classify("tell me the current time"), Some(Command::GetTime));
        assert_eq!(classify("time flies"), None);
    }

    #[test]
    fn test_time_wins_over_date() {
        assert_eq!(classify("what time is it today"), Some(Command::GetTime));
    }

    #[test]
    fn test_date() {
        assert_eq!(classify("what is the date"), Some(Command::GetDate));
        assert_eq!(classify("what day is it"), Some(Command::GetDate));
        assert_eq!(classify("how is the weather today"), Some(Command::GetDate));
    }

    #[test]
    fn test_greeting_needs_name_in_raw_text() {
        assert_eq!(classify("hello madan"), Some(Command::Greeting));
        assert_eq!(classify("Hey Madan"), Some(Command::Greeting));
        assert_eq!(classify("hello there"), None);
    }

    #[test]
    fn test_introduce() {
        assert_eq!(classify("what is your name"), Some(Command::Introduce));
        assert_eq!(classify("who are you"), Some(Command::Introduce));
    }

    #[test]
    fn test_greeting_words_are_checked_after_wake_word_removal() {
        assert_eq!(classify("Madan, hi there"), Some(Command::Greeting));
        // The greeting went away with the wake word.
        assert_eq!(classify("hi madan, who are you"), Some(Command::Introduce));
    }

    #[test]
    fn test_play_is_a_substring_match() {
        assert_eq!(classify("stop playing"), play("ing"));
    }

    #[test]
    fn test_open_question_is_not_a_command() {
        assert_eq!(classify("tell me a joke"), None);
        assert_eq!(classify("explain quantum computing"), None);
    }
}
