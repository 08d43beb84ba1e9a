//! # Voice Patterns Module
//!
//! Static word lists and regex patterns used to clean dictated text and to
//! guess its language.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Filler words dropped from dictated text (English and German)
pub const FILLER_WORDS: &[&str] = &[
    // English
    "um", "umm", "uh", "uhh", "uhm", "erm", "ah", "ahh", "eh", "hmm", "hm", "mhm",
    "uh-huh", "mm", // German
    "äh", "ähm", "öh", "öhm", "hä", "naja", "sozusagen",
];

/// Short words that are never treated as the stutter of the following word
pub const PROTECTED_SHORT_WORDS: &[&str] = &[
    // English
    "a", "an", "and", "as", "at", "be", "by", "for", "i", "in", "is", "it", "of", "on", "or",
    "so", "the", "to", "we", "with", // German
    "am", "auf", "aus", "das", "dem", "den", "der", "die", "ein", "eine", "im", "ist", "mit",
    "und", "vom", "von", "zu", "zum", "zur",
];

/// Known mis-transcriptions of food terms and their corrections
///
/// No correction may contain another entry's key, so applying the table
/// twice gives the same result as applying it once.
pub const FOOD_TERM_CORRECTIONS: &[(&str, &str)] = &[
    // English
    ("mozarella", "mozzarella"),
    ("mozzarela", "mozzarella"),
    ("mots a rella", "mozzarella"),
    ("parmesean", "parmesan"),
    ("parma john", "parmesan"),
    ("zuchini", "zucchini"),
    ("zukini", "zucchini"),
    ("oregeno", "oregano"),
    ("tumeric", "turmeric"),
    ("halapeno", "jalapeño"),
    ("jalapeno", "jalapeño"),
    ("olive oyl", "olive oil"),
    ("garlic clothes", "garlic cloves"),
    ("cinammon", "cinnamon"),
    ("brocoli", "broccoli"),
    ("brockoli", "broccoli"),
    ("basal leaves", "basil leaves"),
    ("tomatos", "tomatoes"),
    ("potatos", "potatoes"),
    ("lettice", "lettuce"),
    ("avacado", "avocado"),
    ("creme fresh", "crème fraîche"),
    ("crem fresh", "crème fraîche"),
    ("kinoa", "quinoa"),
    // German
    ("tomatten", "tomaten"),
    ("knobloch", "knoblauch"),
    ("knoblach", "knoblauch"),
    ("zwibeln", "zwiebeln"),
    ("zwiebln", "zwiebeln"),
    ("peter silie", "petersilie"),
    ("petersilje", "petersilie"),
    ("schlag sahne", "schlagsahne"),
    ("oliven öl", "olivenöl"),
    ("olivenoel", "olivenöl"),
    ("kartofeln", "kartoffeln"),
    ("champions", "champignons"),
    ("schampinjons", "champignons"),
    ("rucola salat", "rucolasalat"),
];

/// German function and food words used for language detection
pub const GERMAN_WORDS: &[&str] = &[
    "und", "mit", "der", "die", "das", "ein", "eine", "ist", "für", "von", "pro", "gramm",
    "kilo", "stück", "euro", "cent", "dazu", "noch", "auch", "oder", "ich", "wir", "mache",
    "tomaten", "zwiebeln", "knoblauch", "kartoffeln", "käse", "sahne", "mehl", "zucker",
    "milch", "eier", "salz", "pfeffer", "petersilie", "olivenöl", "paprika", "gurke",
    "nudeln", "reis", "rindfleisch", "hähnchen", "schinken", "zitrone", "saft", "brot",
    "esslöffel", "teelöffel", "minuten", "personen", "portionen", "gericht", "rezept",
];

/// English function and food words used for language detection
pub const ENGLISH_WORDS: &[&str] = &[
    "and", "with", "the", "this", "is", "a", "of", "for", "per", "grams", "kilo", "piece",
    "pieces", "some", "plus", "then", "add", "i'm", "making", "recipe", "tomatoes", "onions",
    "garlic", "potatoes", "cheese", "cream", "flour", "sugar", "milk", "eggs", "salt",
    "pepper", "parsley", "olive", "oil", "lemon", "juice", "chicken", "beef", "ham", "bread",
    "rice", "pasta", "butter", "basil", "tablespoon", "teaspoon", "minutes", "people",
    "servings", "dish", "sauce",
];

lazy_static! {
    pub static ref FILLER_WORD_SET: HashSet<&'static str> = FILLER_WORDS.iter().copied().collect();
    pub static ref PROTECTED_WORD_SET: HashSet<&'static str> =
        PROTECTED_SHORT_WORDS.iter().copied().collect();
    pub static ref GERMAN_WORD_SET: HashSet<&'static str> = GERMAN_WORDS.iter().copied().collect();
    pub static ref ENGLISH_WORD_SET: HashSet<&'static str> = ENGLISH_WORDS.iter().copied().collect();

    /// Drawn-out hesitation sounds: "ummm", "uhhh", "ähhhm", "hmmm"
    pub static ref ELONGATED_FILLER_REGEX: Regex = Regex::new(
        r"^(?:u+m+|u+h+m*|a+h+|ä+h+m*|ö+h+m*|e+h+|e+r+m+|h+m+|m+h+m+)$"
    )
    .expect("Elongated filler pattern should be valid");

    /// A cut-off word fragment: "le-", "to--"
    pub static ref FRAGMENT_REGEX: Regex =
        Regex::new(r"^\p{L}{1,4}-+$").expect("Fragment pattern should be valid");

    /// A hyphenated stutter: "le--lemon", "to-tomato"
    pub static ref HYPHEN_STUTTER_REGEX: Regex =
        Regex::new(r"^(\p{L}{1,4})-+(\p{L}{2,})$").expect("Hyphen stutter pattern should be valid");

    /// Alternation of every correction key, longest first, on word boundaries
    pub static ref CORRECTION_REGEX: Regex = {
        let mut keys: Vec<&str> = FOOD_TERM_CORRECTIONS.iter().map(|(from, _)| *from).collect();
        keys.sort_by_key(|key| std::cmp::Reverse(key.chars().count()));
        let alternation = keys.iter().map(|key| regex::escape(key)).collect::<Vec<_>>().join("|");
        Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("Correction pattern should be valid")
    };
}
