//! # Measurement Patterns Module
//!
//! Regex patterns, unit aliases and word tables used to pull quantities,
//! prices, serving sizes and preparation times out of dictated recipes.
//! English and German are supported.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Spoken unit aliases and their canonical long forms
pub const UNIT_ALIASES: &[(&str, &str)] = &[
    // Weight
    ("g", "grams"),
    ("gr", "grams"),
    ("gram", "grams"),
    ("grams", "grams"),
    ("gramm", "grams"),
    ("gramme", "grams"),
    ("grammes", "grams"),
    ("kg", "kilograms"),
    ("kilo", "kilograms"),
    ("kilos", "kilograms"),
    ("kilogram", "kilograms"),
    ("kilograms", "kilograms"),
    ("kilogramm", "kilograms"),
    ("mg", "milligrams"),
    ("lb", "pounds"),
    ("lbs", "pounds"),
    ("pound", "pounds"),
    ("pounds", "pounds"),
    ("oz", "ounces"),
    ("ounce", "ounces"),
    ("ounces", "ounces"),
    // Volume
    ("ml", "milliliters"),
    ("milliliter", "milliliters"),
    ("milliliters", "milliliters"),
    ("millilitre", "milliliters"),
    ("millilitres", "milliliters"),
    ("l", "liters"),
    ("liter", "liters"),
    ("liters", "liters"),
    ("litre", "liters"),
    ("litres", "liters"),
    ("tbsp", "tablespoons"),
    ("tablespoon", "tablespoons"),
    ("tablespoons", "tablespoons"),
    ("el", "tablespoons"),
    ("esslöffel", "tablespoons"),
    ("tsp", "teaspoons"),
    ("teaspoon", "teaspoons"),
    ("teaspoons", "teaspoons"),
    ("tl", "teaspoons"),
    ("teelöffel", "teaspoons"),
    ("cup", "cups"),
    ("cups", "cups"),
    ("tasse", "cups"),
    ("tassen", "cups"),
    // Count
    ("piece", "pieces"),
    ("pieces", "pieces"),
    ("pc", "pieces"),
    ("pcs", "pieces"),
    ("stück", "pieces"),
    ("stueck", "pieces"),
    ("stk", "pieces"),
    ("pinch", "pinches"),
    ("pinches", "pinches"),
    ("prise", "pinches"),
    ("prisen", "pinches"),
    ("clove", "cloves"),
    ("cloves", "cloves"),
    ("zehe", "cloves"),
    ("zehen", "cloves"),
    ("bunch", "bunches"),
    ("bunches", "bunches"),
    ("bund", "bunches"),
    ("can", "cans"),
    ("cans", "cans"),
    ("dose", "cans"),
    ("dosen", "cans"),
    ("slice", "slices"),
    ("slices", "slices"),
    ("scheibe", "slices"),
    ("scheiben", "slices"),
];

/// Kilograms (or liters) per canonical unit, for units priced by weight
const KILOGRAM_FACTORS: &[(&str, f64)] = &[
    ("grams", 0.001),
    ("kilograms", 1.0),
    ("milligrams", 0.000_001),
    ("pounds", KILOGRAMS_PER_POUND),
    ("ounces", 0.028_349_523_125),
    ("milliliters", 0.001),
    ("liters", 1.0),
];

pub const KILOGRAMS_PER_POUND: f64 = 0.453_592_37;

/// Spelled-out numbers (English and German)
pub const NUMBER_WORDS: &[(&str, f64)] = &[
    // English
    ("a", 1.0),
    ("an", 1.0),
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
    ("fifteen", 15.0),
    ("twenty", 20.0),
    ("thirty", 30.0),
    ("forty", 40.0),
    ("fifty", 50.0),
    ("hundred", 100.0),
    ("thousand", 1000.0),
    ("dozen", 12.0),
    ("half", 0.5),
    ("quarter", 0.25),
    // German
    ("ein", 1.0),
    ("eine", 1.0),
    ("einen", 1.0),
    ("eins", 1.0),
    ("zwei", 2.0),
    ("drei", 3.0),
    ("vier", 4.0),
    ("fünf", 5.0),
    ("sechs", 6.0),
    ("sieben", 7.0),
    ("acht", 8.0),
    ("neun", 9.0),
    ("zehn", 10.0),
    ("elf", 11.0),
    ("zwölf", 12.0),
    ("fünfzehn", 15.0),
    ("zwanzig", 20.0),
    ("dreißig", 30.0),
    ("vierzig", 40.0),
    ("fünfzig", 50.0),
    ("hundert", 100.0),
    ("tausend", 1000.0),
    ("dutzend", 12.0),
    ("halb", 0.5),
    ("halbe", 0.5),
    ("halber", 0.5),
    ("halbes", 0.5),
    ("halben", 0.5),
    ("viertel", 0.25),
];

/// Number words that only count as a quantity when a unit follows
pub const ARTICLE_NUMBER_WORDS: &[&str] = &["a", "an", "ein", "eine", "einen"];

/// Words dropped from the residual ingredient name
pub const STOP_WORDS: &[&str] = &[
    // English
    "a", "an", "the", "of", "some", "at", "for", "with", "and", "plus", "per", "about", "around",
    "approximately", "roughly", "i", "we", "need", "use", "also", "then", "add", "costs", "cost",
    "costing", "each", "which", "that", "takes", "prep", "preparation", "time", "is", "are",
    // German
    "der", "die", "das", "den", "dem", "des", "ein", "eine", "einen", "einer", "eines", "und",
    "mit", "sowie", "für", "zu", "zum", "von", "vom", "etwas", "noch", "dazu", "pro", "je", "à",
    "kostet", "kosten", "ca", "circa", "ungefähr", "etwa", "brauche", "nehme", "dann", "auch",
    "dauert", "zubereitung", "zubereitungszeit",
    // Currency
    "euro", "euros", "eur", "cent", "cents", "dollar", "dollars", "usd",
];

/// German ingredient names and their English equivalents
pub const GERMAN_TO_ENGLISH: &[(&str, &str)] = &[
    ("tomaten", "tomatoes"),
    ("tomate", "tomato"),
    ("zwiebeln", "onions"),
    ("zwiebel", "onion"),
    ("knoblauch", "garlic"),
    ("kartoffeln", "potatoes"),
    ("karotten", "carrots"),
    ("möhren", "carrots"),
    ("paprikaschoten", "bell peppers"),
    ("käse", "cheese"),
    ("sahne", "cream"),
    ("schlagsahne", "whipping cream"),
    ("mehl", "flour"),
    ("zucker", "sugar"),
    ("salz", "salt"),
    ("pfeffer", "black pepper"),
    ("milch", "milk"),
    ("eier", "eggs"),
    ("ei", "egg"),
    ("olivenöl", "olive oil"),
    ("öl", "oil"),
    ("petersilie", "parsley"),
    ("basilikum", "basil"),
    ("rindfleisch", "beef"),
    ("hackfleisch", "ground beef"),
    ("hähnchen", "chicken"),
    ("hähnchenbrust", "chicken breast"),
    ("schweinefleisch", "pork"),
    ("schinken", "ham"),
    ("speck", "bacon"),
    ("lachs", "salmon"),
    ("garnelen", "shrimp"),
    ("reis", "rice"),
    ("nudeln", "pasta"),
    ("brot", "bread"),
    ("zitrone", "lemon"),
    ("zitronen", "lemons"),
    ("zitronensaft", "lemon juice"),
    ("limette", "lime"),
    ("gurke", "cucumber"),
    ("gurken", "cucumbers"),
    ("kopfsalat", "lettuce"),
    ("champignons", "mushrooms"),
    ("pilze", "mushrooms"),
    ("spinat", "spinach"),
    ("ingwer", "ginger"),
    ("honig", "honey"),
    ("essig", "vinegar"),
    ("rucola", "arugula"),
    ("thymian", "thyme"),
    ("rosmarin", "rosemary"),
    ("zimt", "cinnamon"),
    ("kichererbsen", "chickpeas"),
    ("linsen", "lentils"),
    ("kokosmilch", "coconut milk"),
    ("joghurt", "yogurt"),
    ("mais", "corn"),
    ("erbsen", "peas"),
    ("auberginen", "eggplant"),
    ("zucchini", "zucchini"),
];

/// Prefix marking a "mixed" German compound, as in "Buntpaprika"
pub const MIXED_PREFIX: &str = "bunt";

/// Adjective forms of the mixed prefix, as in "bunte Paprika"
pub const MIXED_ADJECTIVES: &[&str] = &["bunt", "bunte", "bunter", "buntes", "bunten"];

/// Translations used only after the mixed prefix
pub const MIXED_COMPOUND_NAMES: &[(&str, &str)] = &[
    ("paprika", "bell peppers"),
    ("salat", "salad greens"),
    ("pfeffer", "peppercorns"),
    ("bohnen", "beans"),
];

pub static UNIT_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| UNIT_ALIASES.iter().copied().collect());

pub static KILOGRAM_FACTOR_MAP: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| KILOGRAM_FACTORS.iter().copied().collect());

pub static NUMBER_WORD_MAP: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| NUMBER_WORDS.iter().copied().collect());

pub static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

pub static GERMAN_TO_ENGLISH_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| GERMAN_TO_ENGLISH.iter().copied().collect());

pub static MIXED_COMPOUND_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| MIXED_COMPOUND_NAMES.iter().copied().collect());

/// Canonical long form of a unit alias
pub fn canonical_unit(unit: &str) -> Option<&'static str> {
    UNIT_MAP.get(unit.trim().to_lowercase().as_str()).copied()
}

/// Kilograms per one of a canonical unit; liquids count as kilograms per liter
pub fn kilogram_factor(unit: &str) -> Option<f64> {
    KILOGRAM_FACTOR_MAP.get(unit).copied()
}

/// Convert a quantity between units
///
/// Weight and volume units convert through kilograms. A missing unit counts
/// as pieces. Returns `None` when the units are unrelated.
pub fn convert_quantity(quantity: f64, from_unit: &str, to_unit: &str) -> Option<f64> {
    let normalize = |unit: &str| -> String {
        let unit = unit.trim().to_lowercase();
        if unit.is_empty() {
            return "pieces".to_string();
        }
        canonical_unit(&unit).map(str::to_string).unwrap_or(unit)
    };
    let (from, to) = (normalize(from_unit), normalize(to_unit));

    if from == to {
        return Some(quantity);
    }
    let from_factor = kilogram_factor(&from)?;
    let to_factor = kilogram_factor(&to)?;
    Some(quantity * from_factor / to_factor)
}

/// Alternation of words, longest first so that "kilogramm" wins over "kilo"
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.collect();
    words.sort_by_key(|word| std::cmp::Reverse(word.chars().count()));
    words.dedup();
    words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|")
}

/// A decimal number, with either a point or a comma
const NUMBER: &str = r"\d+(?:[.,]\d+)?";

/// Currencies a spoken price may be given in
const CURRENCY: &str = r"€|euros?|eur|dollars?|usd|\$|cents?";

/// What a price may be quoted per
const PRICE_PER: &str = r"(?:\s*/\s*|\s+(?:per|pro|je|a|the)\s+)(?P<per>100\s*(?:g|gr|gramm|grams?)|kilogramm|kilograms?|kilos?|kg|liters?|litres?|l|stück|stk|pieces?|each|pounds?|lbs?)\b";

lazy_static! {
    static ref UNIT_ALTERNATION: String = alternation(UNIT_ALIASES.iter().map(|(alias, _)| *alias));

    static ref NUMBER_WORD_ALTERNATION: String =
        alternation(NUMBER_WORDS.iter().map(|(word, _)| *word));

    static ref COUNTING_WORD_ALTERNATION: String = alternation(
        NUMBER_WORDS
            .iter()
            .map(|(word, _)| *word)
            .filter(|word| !ARTICLE_NUMBER_WORDS.contains(word)),
    );

    /// "1/2 kg", "1 1/2 cups", "3/4"
    pub static ref FRACTION_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?:(?P<whole>\d+)\s+)?(?P<num>\d+)\s*/\s*(?P<den>\d+)(?:\s*(?P<unit>{})\b)?",
        *UNIT_ALTERNATION
    ))
    .expect("Fraction pattern should be valid");

    /// "200g", "1,5 kilo", "3 stück"
    pub static ref QUANTITY_UNIT_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?P<amount>{})\s*(?P<unit>{})\b",
        NUMBER, *UNIT_ALTERNATION
    ))
    .expect("Quantity with unit pattern should be valid");

    /// "half a kilo", "zwei esslöffel", "ein bund"
    pub static ref WORD_UNIT_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?P<words>(?:{nw})(?:[\s-]+(?:{nw}))*)\s+(?P<unit>{units})\b",
        nw = *NUMBER_WORD_ALTERNATION,
        units = *UNIT_ALTERNATION
    ))
    .expect("Number word with unit pattern should be valid");

    /// A plain number: "3 tomatoes"
    pub static ref BARE_NUMBER_REGEX: Regex = Regex::new(&format!(r"\b(?P<amount>{})\b", NUMBER))
        .expect("Bare number pattern should be valid");

    /// A plain number word: "two onions", "a dozen eggs"
    pub static ref BARE_WORD_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?P<words>(?:{counting})(?:[\s-]+(?:{nw}))*)\b",
        counting = *COUNTING_WORD_ALTERNATION,
        nw = *NUMBER_WORD_ALTERNATION
    ))
    .expect("Bare number word pattern should be valid");

    /// "50 cent und 2 euro", optionally quoted per unit
    pub static ref CENT_EURO_PRICE_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?P<cents>\d+)\s*cents?\s+(?:und|and)\s+(?P<euros>\d+)\s*(?:euros?|€)(?:{})?",
        PRICE_PER
    ))
    .expect("Cent and euro price pattern should be valid");

    /// "2 euro und 50 cent", optionally quoted per unit
    pub static ref EURO_CENT_PRICE_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?P<euros>\d+)\s*(?:euros?|€)\s+(?:und|and)\s+(?P<cents>\d+)\s*cents?(?:{})?",
        PRICE_PER
    ))
    .expect("Euro and cent price pattern should be valid");

    /// "3,50 euro pro kilo", "$4 per pound", "2 dollars", "3€/kg"
    pub static ref PRICE_REGEX: Regex = Regex::new(&format!(
        r"(?i)(?:\$\s*(?P<dollars>{num})|\b(?P<amount>{num})\s*(?P<currency>{cur}))(?:{per})?",
        num = NUMBER,
        cur = CURRENCY,
        per = PRICE_PER
    ))
    .expect("Price pattern should be valid");

    /// Text starting with a price: "2 euro ...", "50 cent ..."
    pub static ref PRICE_START_REGEX: Regex = Regex::new(&format!(
        r"(?i)^{}\s*(?:{})",
        NUMBER, CURRENCY
    ))
    .expect("Price start pattern should be valid");

    /// Candidate boundaries between ingredient segments
    pub static ref SEGMENT_SEPARATOR_REGEX: Regex =
        Regex::new(r"(?i)[,;]\s+|\s+(?:and|with|plus|und|mit|sowie)\s+")
            .expect("Segment separator pattern should be valid");

    /// "for 4 people", "für vier personen"
    pub static ref SERVINGS_FOR_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?:for|für)\s+(?P<count>\d+|{nw})\s+(?:people|persons?|personen|guests|gäste|portions?|portionen|servings?)\b",
        nw = *NUMBER_WORD_ALTERNATION
    ))
    .expect("Servings pattern should be valid");

    /// "serves 4", "ergibt 4"
    pub static ref SERVES_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?:serves|ergibt|reicht für)\s+(?P<count>\d+|{nw})\b",
        nw = *NUMBER_WORD_ALTERNATION
    ))
    .expect("Serves pattern should be valid");

    /// "4 portions", "4 portionen"
    pub static ref PORTIONS_REGEX: Regex = Regex::new(
        r"(?i)\b(?P<count>\d+)\s+(?:portions?|portionen|servings?|personen|people)\b"
    )
    .expect("Portions pattern should be valid");

    /// "20 minutes", "1.5 hours", "1 stunde"
    pub static ref PREP_TIME_REGEX: Regex = Regex::new(&format!(
        r"(?i)\b(?P<amount>{})\s*(?P<unit>minutes?|minuten|mins?|hours?|hrs?|stunden?|std)\b",
        NUMBER
    ))
    .expect("Preparation time pattern should be valid");

    /// Introductory phrases naming the dish
    pub static ref DISH_NAME_REGEX: Regex = Regex::new(
        r"(?i)\b(?:this is|here is|i'?m making|i am making|we'?re making|we are making|today we have|recipe for|das ist|hier ist|ich mache|wir machen|heute gibt es|rezept für)\s+(?:(?:a|an|the|ein|eine|einen|der|die|das)\s+)?(?P<dish>[^,.;!?]+?)(?:\s+(?:with|and|for|plus|mit|und|für|sowie)\b|[,.;!?]|$)"
    )
    .expect("Dish name pattern should be valid");
}

/// Value of a run of number words
///
/// Words add up, "hundred" and "dozen" multiply, and fraction words scale
/// the rest: "two hundred" is 200, "half a" is 0.5, "zwei halbe" is 1.
pub fn parse_number_words(words: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut current = 0.0;
    let mut fraction: Option<f64> = None;
    let mut seen = false;

    for word in words
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|word| !word.is_empty())
    {
        let lower = word.to_lowercase();
        let value = *NUMBER_WORD_MAP.get(lower.as_str())?;
        seen = true;
        match lower.as_str() {
            "hundred" | "hundert" | "dozen" | "dutzend" => current = f64::max(current, 1.0) * value,
            "thousand" | "tausend" => {
                total += f64::max(current, 1.0) * value;
                current = 0.0;
            }
            _ if value < 1.0 => fraction = Some(fraction.unwrap_or(1.0) * value),
            _ => current += value,
        }
    }

    if !seen {
        return None;
    }

    let whole = total + current;
    Some(match fraction {
        Some(fraction) if whole == 0.0 => fraction,
        Some(fraction) => whole * fraction,
        None => whole,
    })
}

/// Parse a spoken decimal, accepting a comma as decimal separator
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok()
}
