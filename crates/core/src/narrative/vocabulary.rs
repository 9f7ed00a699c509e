//! Plain-language vocabulary for the general audience.
//!
//! Replacement is whole-word only, so `correlations` becomes `relationships`
//! but an identifier like `correlation_matrix` or `remodel` is left alone.
//! A capitalised source word yields a capitalised replacement.

use std::sync::OnceLock;

use regex_lite::{Captures, Regex};

/// Jargon and its plain replacement. Plural forms come first so the
/// alternation prefers them.
pub const VOCABULARY: &[(&str, &str)] = &[
    ("correlations", "relationships"),
    ("correlation", "relationship"),
    ("coefficients", "measures"),
    ("coefficient", "measure"),
    ("models", "analyses"),
    ("model", "analysis"),
    ("classification", "identification"),
];

static VOCABULARY_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn vocabulary_regex() -> Option<&'static Regex> {
    VOCABULARY_RE
        .get_or_init(|| {
            let words: Vec<&str> = VOCABULARY.iter().map(|(from, _)| *from).collect();
            Regex::new(&format!(r"(?i)\b({})\b", words.join("|"))).ok()
        })
        .as_ref()
}

fn replacement_for(word: &str) -> Option<String> {
    let lower = word.to_ascii_lowercase();
    let (_, plain) = VOCABULARY.iter().find(|(from, _)| *from == lower)?;
    let starts_upper = word.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    Some(if starts_upper {
        let mut chars = plain.chars();
        chars
            .next()
            .map(|c| c.to_ascii_uppercase().to_string() + chars.as_str())
            .unwrap_or_default()
    } else {
        plain.to_string()
    })
}

/// Replace jargon with plain words on token boundaries.
pub fn simplify(text: &str) -> String {
    let Some(re) = vocabulary_regex() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures<'_>| {
        let word = &caps[0];
        replacement_for(word).unwrap_or_else(|| word.to_string())
    })
    .into_owned()
}

// ============================================================================
// Tests
// ============================================================================
