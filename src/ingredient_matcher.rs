//! # Ingredient Fuzzy Matcher
//!
//! Maps noisy spoken ingredient names onto a canonical ingredient catalog.
//!
//! Matching runs through a cascade of tiers, each producing scored
//! candidates:
//!
//! 1. exact, case-insensitive (confidence 1.0, returned immediately)
//! 2. fuzzy, normalized Levenshtein similarity of at least 0.7
//! 3. phonetic, similarity of simplified phonetic keys of at least 0.6
//! 4. substring containment in either direction
//! 5. context, using a dish type to ingredient co-occurrence table
//!
//! Each tier has its own acceptance threshold and confidence scale, so a
//! substring match may score as low as 0.35. Evaluation stops once a tier
//! yields a candidate of 0.9 or more. The best pooled candidate wins; ties
//! keep the first candidate found in tier-then-catalog order.

use lazy_static::lazy_static;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strsim::normalized_levenshtein;

/// Built-in canonical ingredient names
pub const COMMON_INGREDIENTS: &[&str] = &[
    "tomatoes", "onions", "garlic", "potatoes", "carrots", "bell pepper", "mozzarella",
    "parmesan", "basil", "oregano", "olive oil", "butter", "flour", "sugar", "salt",
    "black pepper", "eggs", "milk", "cream", "cheese", "chicken breast", "beef", "pork",
    "bacon", "ham", "salmon", "shrimp", "rice", "pasta", "spaghetti", "bread", "lettuce",
    "cucumber", "avocado", "lemon", "lime", "lemon juice", "ginger", "chili", "cumin",
    "paprika", "cinnamon", "vanilla", "honey", "soy sauce", "vinegar", "mushrooms", "spinach",
    "zucchini", "eggplant", "broccoli", "parsley", "cilantro", "thyme", "rosemary",
    "coconut milk", "chickpeas", "lentils", "tofu", "feta", "yogurt", "corn", "peas",
    "jalapeño", "turmeric", "curry paste", "quinoa", "arugula", "crème fraîche",
];

const EXACT_CONFIDENCE: f64 = 1.0;
const FUZZY_THRESHOLD: f64 = 0.7;
const PHONETIC_THRESHOLD: f64 = 0.6;
const PHONETIC_IDENTICAL_SCALE: f64 = 0.9;
const PHONETIC_SIMILAR_SCALE: f64 = 0.8;
const SUBSTRING_THRESHOLD: f64 = 0.5;
const SUBSTRING_SCALE: f64 = 0.7;
const MIN_SUBSTRING_LENGTH: usize = 3;
const CONTEXT_THRESHOLD: f64 = 0.5;
const CONTEXT_SCALE: f64 = 0.9;
const EARLY_ACCEPT_CONFIDENCE: f64 = 0.9;
const SUGGESTION_MIN_SIMILARITY: f64 = 0.4;
const MIN_EXTRACT_WORD_LENGTH: usize = 3;

/// How an ingredient match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Fuzzy,
    Phonetic,
    Substring,
    Context,
}

/// A catalog ingredient matched from spoken input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMatch {
    /// Catalog entry, as spelled in the catalog
    pub ingredient: String,
    /// Match quality, 0-1
    pub confidence: f64,
    pub match_type: MatchType,
    /// Input text the match was made from
    pub original: String,
}

lazy_static! {
    /// Dish keywords and the ingredients that usually go with them
    static ref DISH_CONTEXT: HashMap<&'static str, &'static [&'static str]> = {
        let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        let pizza: &[&str] = &["tomatoes", "mozzarella", "basil", "oregano", "olive oil", "flour"];
        let pasta: &[&str] = &["pasta", "spaghetti", "tomatoes", "garlic", "parmesan", "basil", "olive oil"];
        let salad: &[&str] = &["lettuce", "tomatoes", "cucumber", "olive oil", "vinegar", "feta", "arugula"];
        let curry: &[&str] = &["curry paste", "coconut milk", "rice", "chicken breast", "ginger", "garlic", "turmeric"];
        let burger: &[&str] = &["beef", "bread", "cheese", "lettuce", "tomatoes", "onions", "bacon"];
        let soup: &[&str] = &["onions", "carrots", "potatoes", "cream", "parsley", "lentils"];
        let cake: &[&str] = &["flour", "sugar", "butter", "eggs", "vanilla", "milk"];
        let taco: &[&str] = &["beef", "chili", "cumin", "avocado", "lime", "cilantro", "jalapeño"];

        map.insert("pizza", pizza);
        map.insert("pasta", pasta);
        map.insert("spaghetti", pasta);
        map.insert("nudeln", pasta);
        map.insert("salad", salad);
        map.insert("salat", salad);
        map.insert("curry", curry);
        map.insert("burger", burger);
        map.insert("soup", soup);
        map.insert("suppe", soup);
        map.insert("cake", cake);
        map.insert("kuchen", cake);
        map.insert("dessert", cake);
        map.insert("taco", taco);
        map.insert("burrito", taco);
        map
    };
}

// Digraphs folded before letter folding, longest first
const DIGRAPHS: &[(&str, &str)] = &[
    ("sch", "sh"),
    ("ch", "k"),
    ("ph", "f"),
    ("th", "t"),
    ("ck", "k"),
    ("qu", "kw"),
    ("gh", "g"),
];

fn fold_letter(c: char) -> char {
    match c {
        'c' | 'q' => 'k',
        'z' => 's',
        'ß' => 's',
        'ä' | 'à' | 'á' | 'â' => 'a',
        'ö' | 'ò' | 'ó' | 'ô' => 'o',
        'ü' | 'ù' | 'ú' | 'û' => 'u',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        other => other,
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Simplified phonetic key of a word
///
/// # Examples
///
/// ```rust
/// use menu_costing::ingredient_matcher::phonetic_key;
///
/// assert_eq!(phonetic_key("avacado"), phonetic_key("avocado"));
/// assert_eq!(phonetic_key("Philly"), "fl");
/// ```
pub fn phonetic_key(word: &str) -> String {
    let mut text: String = word.to_lowercase().chars().filter(|c| c.is_alphabetic()).collect();
    for (from, to) in DIGRAPHS {
        text = text.replace(from, to);
    }

    let mut deduped: Vec<char> = Vec::with_capacity(text.len());
    for c in text.chars().map(fold_letter) {
        if deduped.last() != Some(&c) {
            deduped.push(c);
        }
    }

    let mut chars = deduped.into_iter();
    let mut key = String::new();
    if let Some(first) = chars.next() {
        key.push(first);
        key.extend(chars.filter(|c| !is_vowel(*c)));
    }
    key
}

/// Scored candidates collected across tiers
struct CandidatePool<'a> {
    original: &'a str,
    best: Option<IngredientMatch>,
}

impl<'a> CandidatePool<'a> {
    fn new(original: &'a str) -> Self {
        Self { original, best: None }
    }

    /// Keep the candidate only if it beats the current best
    fn offer(&mut self, ingredient: &str, confidence: f64, match_type: MatchType) {
        let confidence = confidence.clamp(0.0, 1.0);
        trace!("Candidate '{}' ({:?}, {:.3})", ingredient, match_type, confidence);
        let better = match &self.best {
            Some(best) => confidence > best.confidence,
            None => true,
        };
        if better {
            self.best = Some(IngredientMatch {
                ingredient: ingredient.to_string(),
                confidence,
                match_type,
                original: self.original.to_string(),
            });
        }
    }

    fn confident_enough(&self) -> bool {
        self.best
            .as_ref()
            .is_some_and(|best| best.confidence >= EARLY_ACCEPT_CONFIDENCE)
    }
}

fn fuzzy_tier<S: AsRef<str>>(input: &str, catalog: &[S], pool: &mut CandidatePool) {
    for entry in catalog {
        let name = entry.as_ref();
        let similarity = normalized_levenshtein(input, &name.to_lowercase());
        if similarity >= FUZZY_THRESHOLD {
            pool.offer(name, similarity, MatchType::Fuzzy);
        }
    }
}

fn phonetic_tier<S: AsRef<str>>(input: &str, catalog: &[S], pool: &mut CandidatePool) {
    let input_key = phonetic_key(input);
    if input_key.is_empty() {
        return;
    }
    for entry in catalog {
        let name = entry.as_ref();
        let entry_key = phonetic_key(name);
        if entry_key.is_empty() {
            continue;
        }
        let similarity = normalized_levenshtein(&input_key, &entry_key);
        if similarity >= PHONETIC_THRESHOLD {
            let scale = if input_key == entry_key {
                PHONETIC_IDENTICAL_SCALE
            } else {
                PHONETIC_SIMILAR_SCALE
            };
            pool.offer(name, similarity * scale, MatchType::Phonetic);
        }
    }
}

fn substring_tier<S: AsRef<str>>(input: &str, catalog: &[S], pool: &mut CandidatePool) {
    let input_len = input.chars().count();
    for entry in catalog {
        let name = entry.as_ref();
        let lower = name.to_lowercase();
        let entry_len = lower.chars().count();
        if input_len.min(entry_len) < MIN_SUBSTRING_LENGTH {
            continue;
        }
        if lower.contains(input) || input.contains(lower.as_str()) {
            let ratio = input_len.min(entry_len) as f64 / input_len.max(entry_len) as f64;
            if ratio >= SUBSTRING_THRESHOLD {
                pool.offer(name, ratio * SUBSTRING_SCALE, MatchType::Substring);
            }
        }
    }
}

fn context_tier<S: AsRef<str>>(input: &str, catalog: &[S], context: &str, pool: &mut CandidatePool) {
    let context = context.to_lowercase();
    let mut dishes: Vec<(&&str, &&[&str])> = DISH_CONTEXT
        .iter()
        .filter(|(dish, _)| context.contains(**dish))
        .collect();
    // HashMap order is arbitrary; keep the tie-break deterministic
    dishes.sort_by_key(|(dish, _)| **dish);

    for (dish, ingredients) in dishes {
        trace!("Context '{}' suggests {:?}", dish, ingredients);
        for entry in catalog {
            let name = entry.as_ref();
            let lower = name.to_lowercase();
            if !ingredients.contains(&lower.as_str()) {
                continue;
            }
            let similarity = normalized_levenshtein(input, &lower);
            if similarity >= CONTEXT_THRESHOLD {
                pool.offer(name, similarity * CONTEXT_SCALE, MatchType::Context);
            }
        }
    }
}

/// Find the catalog ingredient that best matches a spoken name
///
/// Returns `None` for empty input, an empty catalog, or when no tier
/// produces a candidate.
///
/// # Examples
///
/// ```rust
/// use menu_costing::ingredient_matcher::{find_best_ingredient_match, MatchType, COMMON_INGREDIENTS};
///
/// let found = find_best_ingredient_match("Mozarella", COMMON_INGREDIENTS, Some("pizza")).unwrap();
/// assert_eq!(found.ingredient, "mozzarella");
/// assert_eq!(found.match_type, MatchType::Fuzzy);
/// ```
pub fn find_best_ingredient_match<S: AsRef<str>>(
    input: &str,
    catalog: &[S],
    context: Option<&str>,
) -> Option<IngredientMatch> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() || catalog.is_empty() {
        return None;
    }

    if let Some(entry) = catalog
        .iter()
        .map(|entry| entry.as_ref())
        .find(|name| name.to_lowercase() == normalized)
    {
        trace!("Exact match '{}' for '{}'", entry, input);
        return Some(IngredientMatch {
            ingredient: entry.to_string(),
            confidence: EXACT_CONFIDENCE,
            match_type: MatchType::Exact,
            original: input.to_string(),
        });
    }

    let mut pool = CandidatePool::new(input);

    fuzzy_tier(&normalized, catalog, &mut pool);
    if !pool.confident_enough() {
        phonetic_tier(&normalized, catalog, &mut pool);
    }
    if !pool.confident_enough() {
        substring_tier(&normalized, catalog, &mut pool);
    }
    if !pool.confident_enough() {
        if let Some(context) = context {
            context_tier(&normalized, catalog, context, &mut pool);
        }
    }

    let result = pool.best;

    match &result {
        Some(found) => debug!(
            "Matched '{}' to '{}' ({:?}, {:.2})",
            input, found.ingredient, found.match_type, found.confidence
        ),
        None => debug!("No ingredient match for '{}'", input),
    }
    result
}

/// Find every catalog ingredient mentioned in a phrase
///
/// Each word of at least three characters and each adjacent word pair is
/// matched; only the best match per ingredient is kept, in first-seen order.
pub fn extract_ingredients_from_text<S: AsRef<str>>(
    text: &str,
    catalog: &[S],
    context: Option<&str>,
) -> Vec<IngredientMatch> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect();

    let mut phrases: Vec<String> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if word.chars().count() >= MIN_EXTRACT_WORD_LENGTH {
            phrases.push(word.clone());
        }
        if let Some(next) = words.get(i + 1) {
            phrases.push(format!("{} {}", word, next));
        }
    }

    let mut found: Vec<IngredientMatch> = Vec::new();
    for phrase in &phrases {
        let Some(candidate) = find_best_ingredient_match(phrase, catalog, context) else {
            continue;
        };
        match found
            .iter_mut()
            .find(|existing| existing.ingredient.eq_ignore_ascii_case(&candidate.ingredient))
        {
            Some(existing) if candidate.confidence > existing.confidence => *existing = candidate,
            Some(_) => {}
            None => found.push(candidate),
        }
    }

    debug!("Extracted {} ingredients from '{}'", found.len(), text);
    found
}

/// "Did you mean" candidates for an input that matched nothing
///
/// Returns up to `max_suggestions` catalog entries whose similarity is below
/// the fuzzy acceptance threshold but at least 0.4, best first.
pub fn suggest_ingredient_corrections<S: AsRef<str>>(
    input: &str,
    catalog: &[S],
    max_suggestions: usize,
) -> Vec<IngredientMatch> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<IngredientMatch> = catalog
        .iter()
        .filter_map(|entry| {
            let name = entry.as_ref();
            let similarity = normalized_levenshtein(&normalized, &name.to_lowercase());
            (SUGGESTION_MIN_SIMILARITY..FUZZY_THRESHOLD)
                .contains(&similarity)
                .then(|| IngredientMatch {
                    ingredient: name.to_string(),
                    confidence: similarity,
                    match_type: MatchType::Fuzzy,
                    original: input.to_string(),
                })
        })
        .collect();

    // Stable sort keeps catalog order among equal scores
    suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    suggestions.truncate(max_suggestions);
    suggestions
}
