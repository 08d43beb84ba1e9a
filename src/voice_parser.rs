//! # Voice Recipe Parser
//!
//! Turns a dictated recipe ("This is a tomato soup with 500 gramm Tomaten
//! für 2 Euro pro Kilo, for 4 people") into a dish name, a list of priced
//! ingredients, a serving size, a preparation time and a suggested menu price.
//!
//! Parsing is heuristic. Each step degrades to a default instead of failing,
//! and the result carries a confidence score describing how complete it is.
//!
//! ## Usage
//!
//! ```rust
//! use menu_costing::voice_parser::parse_enhanced_voice_input;
//!
//! let result = parse_enhanced_voice_input("200g tomatoes at 3 euro per kilo");
//! let tomatoes = &result.ingredients[0];
//! assert_eq!(tomatoes.quantity, 200.0);
//! assert_eq!(tomatoes.unit, "grams");
//! assert_eq!(tomatoes.price_per_kilo, Some(3.0));
//! ```

use log::{debug, info, trace, warn};
use std::ops::Range;

use crate::config::ParserConfig;
use crate::cost_engine::{calculate_menu_price, round2};
use crate::measurement_patterns::{
    canonical_unit, kilogram_factor, parse_decimal, parse_number_words, BARE_NUMBER_REGEX,
    BARE_WORD_REGEX, CENT_EURO_PRICE_REGEX, DISH_NAME_REGEX, EURO_CENT_PRICE_REGEX,
    FRACTION_REGEX, GERMAN_TO_ENGLISH_MAP, KILOGRAMS_PER_POUND, MIXED_ADJECTIVES,
    MIXED_COMPOUND_MAP, MIXED_PREFIX, PORTIONS_REGEX, PREP_TIME_REGEX, PRICE_REGEX,
    PRICE_START_REGEX, QUANTITY_UNIT_REGEX, SEGMENT_SEPARATOR_REGEX, SERVES_REGEX,
    SERVINGS_FOR_REGEX, STOP_WORD_SET, WORD_UNIT_REGEX,
};
use crate::parser_types::{
    EnhancedVoiceParsingResult, ParsedIngredientWithCost, UNKNOWN_INGREDIENT_NAME,
};

const DEFAULT_SERVING_SIZE: u32 = 1;
const FALLBACK_DISH_WORDS: usize = 3;
const MIN_MIXED_REMAINDER: usize = 3;

// Ingredient confidence weights, in tenths
const BASE_CONFIDENCE: u32 = 5;
const NAME_CONFIDENCE: u32 = 2;
const QUANTITY_CONFIDENCE: u32 = 1;
const UNIT_CONFIDENCE: u32 = 1;
const PRICE_CONFIDENCE: u32 = 1;
const MAX_CONFIDENCE: u32 = 10;

// Overall confidence weights
const INGREDIENT_CONFIDENCE_WEIGHT: f64 = 0.8;
const TEMPLATE_DISH_BONUS: f64 = 0.2;
const FALLBACK_DISH_BONUS: f64 = 0.1;

/// What a spoken price refers to
#[derive(Debug, Clone, Copy, PartialEq)]
enum PriceBasis {
    PerKilo,
    PerUnit,
    /// The whole stated quantity
    Total,
}

#[derive(Debug, Clone, PartialEq)]
struct SpokenPrice {
    amount: f64,
    basis: PriceBasis,
    currency: String,
    span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
struct SpokenQuantity {
    amount: f64,
    unit: String,
    span: Range<usize>,
}

/// Parse a dictated recipe with the default configuration
pub fn parse_enhanced_voice_input(text: &str) -> EnhancedVoiceParsingResult {
    parse_enhanced_voice_input_with_config(text, &ParserConfig::default())
}

/// Parse a dictated recipe
///
/// Dish name, serving size and preparation time are read first and removed,
/// then the rest is split into ingredient segments. A segment counts as an
/// ingredient only if it states a quantity or a price.
pub fn parse_enhanced_voice_input_with_config(
    text: &str,
    config: &ParserConfig,
) -> EnhancedVoiceParsingResult {
    let normalized = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let (dish_name, dish_name_from_fallback) = extract_dish_name(&normalized);
    let serving_size = extract_serving_size(&normalized);
    let preparation_time = extract_preparation_time(&normalized);
    let body = remove_servings_and_time(&remove_dish_introduction(&normalized));

    let ingredients: Vec<ParsedIngredientWithCost> = split_segments(&body)
        .into_iter()
        .filter_map(|segment| parse_segment(segment, config))
        .map(validate_and_normalize_parsed_ingredient)
        .collect();

    let total_estimated_cost = round2(ingredients.iter().map(|i| i.estimated_cost).sum());
    let suggested_price = suggest_menu_price(total_estimated_cost, config.target_food_cost_percent);
    let confidence = overall_confidence(&ingredients, !dish_name_from_fallback);

    info!(
        "Parsed '{}': {} ingredients, total {:.2}, suggested {:.2}, confidence {:.2}",
        dish_name,
        ingredients.len(),
        total_estimated_cost,
        suggested_price,
        confidence
    );

    EnhancedVoiceParsingResult {
        dish_name,
        dish_name_from_fallback,
        ingredients,
        total_estimated_cost,
        suggested_price,
        serving_size,
        preparation_time,
        confidence,
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dish name from an introductory phrase, or the first words as a fallback
///
/// The flag is `true` when the fallback was used.
fn extract_dish_name(text: &str) -> (String, bool) {
    if let Some(dish) = DISH_NAME_REGEX
        .captures(text)
        .and_then(|caps| caps.name("dish"))
        .map(|dish| dish.as_str().trim())
        .filter(|dish| !dish.is_empty())
    {
        debug!("Dish name from introduction: '{}'", dish);
        return (capitalize_first(dish), false);
    }

    let fallback = text
        .split_whitespace()
        .take(FALLBACK_DISH_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    debug!("No dish introduction found, using '{}'", fallback);
    (capitalize_first(&fallback), true)
}

/// Drop the introductory phrase and the dish name it introduces
fn remove_dish_introduction(text: &str) -> String {
    let span = DISH_NAME_REGEX
        .captures(text)
        .and_then(|caps| Some(caps.get(0)?.start()..caps.name("dish")?.end()));
    match span {
        Some(span) => {
            trace!("Removing dish introduction '{}'", &text[span.clone()]);
            format!("{} {}", &text[..span.start], &text[span.end..])
        }
        None => text.to_string(),
    }
}

fn parse_count(text: &str) -> Option<u32> {
    let value = text
        .parse::<f64>()
        .ok()
        .or_else(|| parse_number_words(text))?;
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u32)
    } else {
        None
    }
}

fn extract_serving_size(text: &str) -> u32 {
    let count = [&*SERVINGS_FOR_REGEX, &*SERVES_REGEX, &*PORTIONS_REGEX]
        .iter()
        .find_map(|regex| regex.captures(text).and_then(|caps| parse_count(&caps["count"])));

    match count {
        Some(0) => {
            warn!("Serving size of 0 spoken, using {}", DEFAULT_SERVING_SIZE);
            DEFAULT_SERVING_SIZE
        }
        Some(count) => count,
        None => DEFAULT_SERVING_SIZE,
    }
}

/// Preparation time in minutes
fn extract_preparation_time(text: &str) -> Option<u32> {
    let caps = PREP_TIME_REGEX.captures(text)?;
    let amount = parse_decimal(&caps["amount"])?;
    let unit = caps["unit"].to_lowercase();
    let minutes = if unit.starts_with('h') || unit.starts_with("st") {
        amount * 60.0
    } else {
        amount
    };
    trace!("Preparation time '{}' = {} minutes", &caps[0], minutes);
    Some(minutes.round() as u32)
}

fn remove_servings_and_time(text: &str) -> String {
    let mut body = text.to_string();
    for regex in [
        &*SERVINGS_FOR_REGEX,
        &*SERVES_REGEX,
        &*PORTIONS_REGEX,
        &*PREP_TIME_REGEX,
    ] {
        body = regex.replace_all(&body, " ").into_owned();
    }
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split at separators that are followed by a number
///
/// A number that starts a price ("… 50 cent und 2 euro") belongs to the
/// segment before it.
fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for separator in SEGMENT_SEPARATOR_REGEX.find_iter(text) {
        let rest = &text[separator.end()..];
        let starts_with_number = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
        if starts_with_number && !PRICE_START_REGEX.is_match(rest) {
            segments.push(&text[start..separator.start()]);
            start = separator.end();
        }
    }
    segments.push(&text[start..]);

    let segments: Vec<&str> = segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    trace!("Segments: {:?}", segments);
    segments
}

fn price_basis(per: Option<&str>, amount: f64) -> (PriceBasis, f64) {
    let Some(per) = per else {
        return (PriceBasis::Total, amount);
    };
    let per = per.to_lowercase();

    if per.starts_with("100") {
        (PriceBasis::PerKilo, amount * 10.0)
    } else if per.starts_with("kilo") || per == "kg" {
        (PriceBasis::PerKilo, amount)
    } else if per.starts_with("lit") || per == "l" {
        // Liquids are priced like their weight in water
        (PriceBasis::PerKilo, amount)
    } else if per.starts_with("pound") || per.starts_with("lb") {
        (PriceBasis::PerKilo, amount / KILOGRAMS_PER_POUND)
    } else {
        (PriceBasis::PerUnit, amount)
    }
}

fn currency_code(word: &str, default_currency: &str) -> String {
    let word = word.to_lowercase();
    if word.starts_with("dollar") || word == "usd" || word == "$" {
        "USD".to_string()
    } else if word.starts_with("euro") || word == "eur" || word == "€" {
        "EUR".to_string()
    } else {
        default_currency.to_string()
    }
}

/// First price spoken in a segment
fn extract_price(text: &str, config: &ParserConfig) -> Option<SpokenPrice> {
    if let Some(caps) = CENT_EURO_PRICE_REGEX
        .captures(text)
        .or_else(|| EURO_CENT_PRICE_REGEX.captures(text))
    {
        let euros: f64 = caps["euros"].parse().ok()?;
        let cents: f64 = caps["cents"].parse().ok()?;
        let (basis, amount) = price_basis(caps.name("per").map(|m| m.as_str()), euros + cents / 100.0);
        trace!("Compound price '{}' = {} EUR ({:?})", &caps[0], amount, basis);
        return Some(SpokenPrice {
            amount,
            basis,
            currency: "EUR".to_string(),
            span: caps.get(0)?.range(),
        });
    }

    let caps = PRICE_REGEX.captures(text)?;
    let (amount, currency) = if let Some(dollars) = caps.name("dollars") {
        (parse_decimal(dollars.as_str())?, "USD".to_string())
    } else {
        let amount = parse_decimal(&caps["amount"])?;
        let currency_word = &caps["currency"];
        if currency_word.starts_with("cent") {
            (amount / 100.0, config.default_currency.clone())
        } else {
            (amount, currency_code(currency_word, &config.default_currency))
        }
    };

    let (basis, amount) = price_basis(caps.name("per").map(|m| m.as_str()), amount);
    trace!("Price '{}' = {} {} ({:?})", &caps[0], amount, currency, basis);
    Some(SpokenPrice {
        amount,
        basis,
        currency,
        span: caps.get(0)?.range(),
    })
}

fn unit_name(unit: Option<regex::Match>) -> String {
    unit.map(|unit| {
        let alias = unit.as_str().to_lowercase();
        canonical_unit(&alias).map(str::to_string).unwrap_or(alias)
    })
    .unwrap_or_default()
}

/// First quantity spoken in a segment, trying the most specific forms first
fn extract_quantity(text: &str) -> Option<SpokenQuantity> {
    if let Some(caps) = FRACTION_REGEX.captures(text) {
        let numerator: f64 = caps["num"].parse().ok()?;
        let denominator: f64 = caps["den"].parse().ok()?;
        if denominator > 0.0 {
            let whole: f64 = caps
                .name("whole")
                .and_then(|whole| whole.as_str().parse().ok())
                .unwrap_or(0.0);
            return Some(SpokenQuantity {
                amount: whole + numerator / denominator,
                unit: unit_name(caps.name("unit")),
                span: caps.get(0)?.range(),
            });
        }
    }

    if let Some(caps) = QUANTITY_UNIT_REGEX.captures(text) {
        return Some(SpokenQuantity {
            amount: parse_decimal(&caps["amount"])?,
            unit: unit_name(caps.name("unit")),
            span: caps.get(0)?.range(),
        });
    }

    if let Some(caps) = WORD_UNIT_REGEX.captures(text) {
        if let Some(amount) = parse_number_words(&caps["words"]) {
            return Some(SpokenQuantity {
                amount,
                unit: unit_name(caps.name("unit")),
                span: caps.get(0)?.range(),
            });
        }
    }

    if let Some(found) = BARE_NUMBER_REGEX.find(text) {
        return Some(SpokenQuantity {
            amount: parse_decimal(found.as_str())?,
            unit: String::new(),
            span: found.range(),
        });
    }

    let found = BARE_WORD_REGEX.find(text)?;
    Some(SpokenQuantity {
        amount: parse_number_words(found.as_str())?,
        unit: String::new(),
        span: found.range(),
    })
}

fn translate_mixed(rest: &str) -> String {
    MIXED_COMPOUND_MAP
        .get(rest)
        .or_else(|| GERMAN_TO_ENGLISH_MAP.get(rest))
        .map(|name| name.to_string())
        .unwrap_or_else(|| rest.to_string())
}

/// Translate German ingredient names to English
///
/// "bunt" compounds and "bunte …" phrases become "mixed …".
fn translate_name(name: &str) -> String {
    if let Some(english) = GERMAN_TO_ENGLISH_MAP.get(name) {
        return english.to_string();
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    let mut translated: Vec<String> = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        if MIXED_ADJECTIVES.contains(&word) {
            translated.push("mixed".to_string());
            if let Some(next) = words.get(i + 1) {
                translated.push(translate_mixed(next));
                i += 1;
            }
        } else if let Some(rest) = word
            .strip_prefix(MIXED_PREFIX)
            .filter(|rest| rest.chars().count() >= MIN_MIXED_REMAINDER)
        {
            translated.push(format!("mixed {}", translate_mixed(rest)));
        } else {
            translated.push(
                GERMAN_TO_ENGLISH_MAP
                    .get(word)
                    .map(|english| english.to_string())
                    .unwrap_or_else(|| word.to_string()),
            );
        }
        i += 1;
    }

    let result = translated.join(" ");
    if result != name {
        debug!("Translated ingredient name '{}' -> '{}'", name, result);
    }
    result
}

/// What is left of a segment once quantity and price are removed
fn residual_name(text: &str) -> Option<String> {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| {
            !word.is_empty()
                && !word.chars().any(|c| c.is_ascii_digit())
                && !STOP_WORD_SET.contains(word)
        })
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(translate_name(&words.join(" ")))
    }
}

fn parse_segment(segment: &str, config: &ParserConfig) -> Option<ParsedIngredientWithCost> {
    let mut remaining = segment.to_string();

    let price = extract_price(&remaining, config);
    if let Some(price) = &price {
        remaining.replace_range(price.span.clone(), " ");
    }

    let quantity = extract_quantity(&remaining);
    if let Some(quantity) = &quantity {
        remaining.replace_range(quantity.span.clone(), " ");
    }

    if price.is_none() && quantity.is_none() {
        trace!("Skipping segment without quantity or price: '{}'", segment);
        return None;
    }

    // A price on its own counts as one of something
    let (amount, unit) = quantity
        .map(|quantity| (quantity.amount, quantity.unit))
        .unwrap_or((1.0, String::new()));

    let name = residual_name(&remaining);
    let mut ingredient = ParsedIngredientWithCost::new(
        name.as_deref().unwrap_or(UNKNOWN_INGREDIENT_NAME),
        amount,
        &unit,
        &config.default_currency,
    )
    .with_original_text(segment);

    if name.is_none() {
        warn!("No ingredient name left in '{}'", segment);
        ingredient.used_fallback_name = true;
    }

    if let Some(price) = price {
        ingredient.currency = price.currency;
        ingredient = match price.basis {
            PriceBasis::PerKilo => ingredient.with_price_per_kilo(price.amount),
            PriceBasis::PerUnit => ingredient.with_price_per_unit(price.amount),
            PriceBasis::Total if amount > 0.0 => ingredient.with_price_per_unit(price.amount / amount),
            PriceBasis::Total => ingredient.with_price_per_unit(price.amount),
        };
    }

    ingredient.estimated_cost = estimate_ingredient_cost(&ingredient);
    debug!("Parsed segment '{}' -> {}", segment, ingredient);
    Some(ingredient)
}

/// Cost of the stated quantity
///
/// A per-kilo price applies to weight and volume units; otherwise the
/// per-unit price is used. Without a usable price the cost is 0.
pub fn estimate_ingredient_cost(ingredient: &ParsedIngredientWithCost) -> f64 {
    let by_weight = ingredient
        .price_per_kilo
        .zip(kilogram_factor(&ingredient.unit))
        .map(|(price, factor)| price * ingredient.quantity * factor);

    let cost = by_weight
        .or_else(|| ingredient.price_per_unit.map(|price| price * ingredient.quantity))
        .unwrap_or(0.0);

    round2(cost)
}

/// Clean up a parsed ingredient and score how complete it is
pub fn validate_and_normalize_parsed_ingredient(
    mut ingredient: ParsedIngredientWithCost,
) -> ParsedIngredientWithCost {
    let name = ingredient
        .name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let is_placeholder = name.is_empty() || name.eq_ignore_ascii_case(UNKNOWN_INGREDIENT_NAME);
    ingredient.name = if is_placeholder {
        UNKNOWN_INGREDIENT_NAME.to_string()
    } else {
        capitalize_first(&name)
    };
    ingredient.used_fallback_name = is_placeholder;

    if !ingredient.quantity.is_finite() || ingredient.quantity < 0.0 {
        ingredient.quantity = 0.0;
    }

    let unit = ingredient.unit.trim().to_lowercase();
    ingredient.unit = canonical_unit(&unit).map(str::to_string).unwrap_or(unit);

    let valid_price = |price: &f64| price.is_finite() && *price >= 0.0;
    ingredient.price_per_kilo = ingredient.price_per_kilo.filter(valid_price);
    ingredient.price_per_unit = ingredient.price_per_unit.filter(valid_price);

    let mut confidence = BASE_CONFIDENCE;
    if !is_placeholder {
        confidence += NAME_CONFIDENCE;
    }
    if ingredient.quantity > 0.0 {
        confidence += QUANTITY_CONFIDENCE;
    }
    if !ingredient.unit.is_empty() {
        confidence += UNIT_CONFIDENCE;
    }
    if ingredient.has_price() {
        confidence += PRICE_CONFIDENCE;
    }
    ingredient.confidence = f64::from(confidence.min(MAX_CONFIDENCE)) / 10.0;
    ingredient.estimated_cost = estimate_ingredient_cost(&ingredient);

    ingredient
}

/// Round a price to a menu-friendly ending: .00, .50, .90 or .95
///
/// # Examples
///
/// ```rust
/// use menu_costing::voice_parser::round_to_menu_price;
///
/// assert_eq!(round_to_menu_price(8.33), 8.5);
/// assert_eq!(round_to_menu_price(12.8), 12.9);
/// ```
pub fn round_to_menu_price(price: f64) -> f64 {
    if !price.is_finite() || price <= 0.0 {
        return 0.0;
    }

    let whole = price.floor();
    let fraction = price - whole;
    let ending = if fraction < 0.25 {
        0.0
    } else if fraction < 0.75 {
        0.5
    } else if fraction < 0.85 {
        0.9
    } else {
        0.95
    };

    round2(whole + ending)
}

fn suggest_menu_price(total_cost: f64, target_percent: f64) -> f64 {
    if total_cost <= 0.0 {
        return 0.0;
    }
    match calculate_menu_price(total_cost, target_percent) {
        Ok(price) => round_to_menu_price(price),
        Err(err) => {
            warn!("Cannot suggest a price: {}", err);
            0.0
        }
    }
}

fn overall_confidence(ingredients: &[ParsedIngredientWithCost], dish_from_template: bool) -> f64 {
    let dish_bonus = if dish_from_template {
        TEMPLATE_DISH_BONUS
    } else {
        FALLBACK_DISH_BONUS
    };

    if ingredients.is_empty() {
        return if dish_from_template { TEMPLATE_DISH_BONUS } else { 0.0 };
    }

    let mean = ingredients.iter().map(|i| i.confidence).sum::<f64>() / ingredients.len() as f64;
    (mean * INGREDIENT_CONFIDENCE_WEIGHT + dish_bonus).clamp(0.0, 1.0)
}
