//! # Voice Text Normalizer
//!
//! Cleans dictated text before it is parsed: hesitation sounds, stutters and
//! repeated words are removed, known mis-transcriptions of food terms are
//! corrected, sentences are capitalized and the language is guessed.
//!
//! ## Usage
//!
//! ```rust
//! use menu_costing::voice_normalizer::{clean_voice_input, Language};
//!
//! let cleaned = clean_voice_input("um um lemon lemon juice");
//! assert_eq!(cleaned.cleaned_text, "Lemon juice");
//! assert_eq!(cleaned.detected_language, Language::English);
//! ```

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::voice_patterns::{
    CORRECTION_REGEX, ELONGATED_FILLER_REGEX, ENGLISH_WORD_SET, FILLER_WORD_SET,
    FOOD_TERM_CORRECTIONS, FRAGMENT_REGEX, GERMAN_WORD_SET, HYPHEN_STUTTER_REGEX,
    PROTECTED_WORD_SET,
};

/// Cleanup passes are repeated until the text stops changing
const MAX_CLEANUP_PASSES: usize = 8;
const MIN_DETECTION_LENGTH: usize = 3;
const DIACRITIC_BONUS: usize = 2;
const MAX_PHRASE_WORDS: usize = 4;

/// Language of a piece of dictated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of [`clean_voice_input`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedVoiceInput {
    pub cleaned_text: String,
    pub detected_language: Language,
}

/// Clean dictated text
///
/// The result is stable: cleaning `cleaned_text` again returns it unchanged.
pub fn clean_voice_input(text: &str) -> CleanedVoiceInput {
    let mut current = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    for pass in 0..MAX_CLEANUP_PASSES {
        let next = apply_corrections(&clean_tokens(&current));
        if next == current {
            trace!("Voice cleanup stable after {} passes", pass);
            break;
        }
        current = next;
    }

    let cleaned_text = capitalize_sentences(&current);
    let detected_language = detect_language(&cleaned_text);

    debug!(
        "Cleaned voice input '{}' -> '{}' ({})",
        text, cleaned_text, detected_language
    );

    CleanedVoiceInput {
        cleaned_text,
        detected_language,
    }
}

/// Token without surrounding punctuation, used for comparisons
fn bare(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Token without surrounding punctuation, hyphens kept
fn core(token: &str) -> &str {
    token.trim_matches(|c: char| !(c.is_alphanumeric() || c == '-'))
}

fn is_repeated_letter_run(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {
            word.chars().count() >= 3 && chars.all(|c| c == first)
        }
        _ => false,
    }
}

fn is_filler(word: &str) -> bool {
    FILLER_WORD_SET.contains(word)
        || ELONGATED_FILLER_REGEX.is_match(word)
        || FRAGMENT_REGEX.is_match(word)
        || is_repeated_letter_run(word)
}

/// Resolve "le--lemon" to "lemon"; other tokens are returned unchanged
fn resolve_hyphen_stutter(token: &str) -> String {
    let word = core(token);
    if let Some(caps) = HYPHEN_STUTTER_REGEX.captures(word) {
        let (head, tail) = (&caps[1], &caps[2]);
        if tail.starts_with(head) {
            trace!("Collapsed hyphen stutter '{}' -> '{}'", word, tail);
            return token.replacen(word, tail, 1);
        }
    }
    token.to_string()
}

fn is_prefix_stutter(token: &str, next: &str) -> bool {
    let word = bare(token);
    let next = bare(next);
    !word.is_empty()
        && word == token
        && word.chars().all(char::is_alphabetic)
        && !PROTECTED_WORD_SET.contains(word)
        && word.chars().count() < next.chars().count()
        && next.starts_with(word)
}

/// One cleanup pass over lowercased text
fn clean_tokens(text: &str) -> String {
    let tokens: Vec<String> = text
        .split_whitespace()
        .filter(|token| {
            let keep = !is_filler(core(token));
            if !keep {
                trace!("Dropped filler '{}'", token);
            }
            keep
        })
        .map(resolve_hyphen_stutter)
        .collect();

    let mut kept: Vec<String> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        if let Some(previous) = kept.last() {
            if !bare(token).is_empty() && bare(previous) == bare(token) {
                trace!("Dropped repeated word '{}'", token);
                continue;
            }
        }
        if let Some(next) = tokens.get(i + 1) {
            if is_prefix_stutter(token, next) {
                trace!("Dropped stutter '{}' before '{}'", token, next);
                continue;
            }
        }
        kept.push(token.clone());
    }

    collapse_repeated_phrases(&mut kept);
    kept.join(" ")
}

fn same_phrase(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| bare(x) == bare(y))
}

/// Remove immediate repeats of 2-4 word phrases, longest phrase first
fn collapse_repeated_phrases(tokens: &mut Vec<String>) {
    let mut i = 0;
    while i < tokens.len() {
        let mut collapsed = false;
        for n in (2..=MAX_PHRASE_WORDS).rev() {
            if i + 2 * n <= tokens.len() && same_phrase(&tokens[i..i + n], &tokens[i + n..i + 2 * n]) {
                trace!("Collapsed repeated phrase '{}'", tokens[i..i + n].join(" "));
                tokens.drain(i + n..i + 2 * n);
                collapsed = true;
                break;
            }
        }
        if !collapsed {
            i += 1;
        }
    }
}

/// Replace known mis-transcriptions, longest match first
fn apply_corrections(text: &str) -> String {
    CORRECTION_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            let found = &caps[0];
            FOOD_TERM_CORRECTIONS
                .iter()
                .find(|(from, _)| *from == found)
                .map(|(_, to)| to.to_string())
                .unwrap_or_else(|| found.to_string())
        })
        .into_owned()
}

/// Uppercase the first letter of the text and of every sentence
fn capitalize_sentences(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut capitalize_next = true;
    let mut after_terminator = false;

    for c in text.chars() {
        if capitalize_next && c.is_alphabetic() {
            result.extend(c.to_uppercase());
            capitalize_next = false;
            after_terminator = false;
            continue;
        }

        if matches!(c, '.' | '!' | '?') {
            after_terminator = true;
        } else if c.is_whitespace() {
            if after_terminator {
                capitalize_next = true;
            }
        } else {
            if c.is_alphanumeric() {
                capitalize_next = false;
            }
            after_terminator = false;
        }
        result.push(c);
    }

    result
}

/// Guess whether text is English or German
///
/// Known words score their length, each German diacritic adds a bonus.
/// Ties, empty and very short text are `Unknown`.
pub fn detect_language(text: &str) -> Language {
    let text = text.trim().to_lowercase();
    if text.chars().count() < MIN_DETECTION_LENGTH {
        return Language::Unknown;
    }

    let mut german_score = 0;
    let mut english_score = 0;

    for word in text.split_whitespace().map(bare) {
        if GERMAN_WORD_SET.contains(word) {
            german_score += word.chars().count();
        }
        if ENGLISH_WORD_SET.contains(word) {
            english_score += word.chars().count();
        }
    }

    german_score += text
        .chars()
        .filter(|c| matches!(c, 'ä' | 'ö' | 'ü' | 'ß'))
        .count()
        * DIACRITIC_BONUS;

    trace!("Language scores for '{}': de={}, en={}", text, german_score, english_score);

    if german_score > english_score {
        Language::German
    } else if english_score > german_score {
        Language::English
    } else {
        Language::Unknown
    }
}
