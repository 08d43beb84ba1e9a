//! # Voice Costing Pipeline
//!
//! Prices a dictated recipe in one call: the transcript is cleaned, parsed
//! into ingredients, each ingredient is matched against the reference data,
//! and the resulting components are run through the cost engine.
//!
//! Ingredients found in the reference data are costed at their reference
//! price. The rest are costed from whatever price was spoken for them.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::ReferenceData;
use crate::config::{CostSettings, ParserConfig};
use crate::cost_engine::{calculate_cost, generate_cost_optimization_suggestions};
use crate::cost_model::{Component, CostSuggestion, Ingredient, PricingCalculation};
use crate::ingredient_matcher::{
    find_best_ingredient_match, suggest_ingredient_corrections, COMMON_INGREDIENTS,
};
use crate::measurement_patterns::convert_quantity;
use crate::parser_types::{EnhancedVoiceParsingResult, ParsedIngredientWithCost};
use crate::voice_normalizer::{clean_voice_input, CleanedVoiceInput};
use crate::voice_parser::parse_enhanced_voice_input_with_config;

const MAX_CORRECTIONS: usize = 3;
const DEFAULT_UNIT: &str = "pieces";

/// Where the cost of a component came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostSource {
    /// Matched a reference ingredient
    Reference,
    /// Priced from the spoken price
    Spoken,
    /// Neither matched nor priced; costed at zero
    Unpriced,
}

/// How one spoken ingredient was resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIngredient {
    pub spoken_name: String,
    /// Reference or canonical name the ingredient was costed under
    pub resolved_name: String,
    pub match_confidence: Option<f64>,
    pub source: CostSource,
    /// Close reference names, offered when nothing matched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub did_you_mean: Vec<String>,
}

/// Everything produced while pricing a dictated recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCostingResult {
    pub cleaned: CleanedVoiceInput,
    pub parsed: EnhancedVoiceParsingResult,
    pub resolved: Vec<ResolvedIngredient>,
    pub pricing: PricingCalculation,
    pub suggestions: Vec<CostSuggestion>,
}

/// Clean, parse, match and cost a dictated recipe
pub fn price_voice_recipe(
    text: &str,
    reference: &ReferenceData,
    settings: &CostSettings,
) -> Result<VoiceCostingResult> {
    let cleaned = clean_voice_input(text);
    let parsed =
        parse_enhanced_voice_input_with_config(&cleaned.cleaned_text, &ParserConfig::from(settings));

    let reference_names = reference.ingredient_names();
    let context = Some(parsed.dish_name.as_str());

    let mut components = Vec::with_capacity(parsed.ingredients.len());
    let mut resolved = Vec::with_capacity(parsed.ingredients.len());

    for (index, spoken) in parsed.ingredients.iter().enumerate() {
        let reference_match = find_best_ingredient_match(&spoken.name, &reference_names, context)
            .and_then(|found| {
                reference
                    .find_ingredient(&found.ingredient)
                    .map(|ingredient| (found, ingredient))
            });

        if let Some((found, ingredient)) = reference_match {
            let quantity = convert_quantity(spoken.quantity, &spoken.unit, &ingredient.unit)
                .unwrap_or_else(|| {
                    warn!(
                        "Cannot convert {} {} of '{}' to {}, using the spoken quantity",
                        spoken.quantity, spoken.unit, spoken.name, ingredient.unit
                    );
                    spoken.quantity
                });
            debug!(
                "'{}' costed as reference ingredient '{}' ({:.2})",
                spoken.name, ingredient.name, found.confidence
            );
            components.push(Component::ingredient(ingredient.clone(), quantity, &ingredient.unit));
            resolved.push(ResolvedIngredient {
                spoken_name: spoken.name.clone(),
                resolved_name: ingredient.name.clone(),
                match_confidence: Some(found.confidence),
                source: CostSource::Reference,
                did_you_mean: Vec::new(),
            });
            continue;
        }

        let canonical = find_best_ingredient_match(&spoken.name, COMMON_INGREDIENTS, context);
        let resolved_name = canonical
            .as_ref()
            .map(|found| found.ingredient.clone())
            .unwrap_or_else(|| spoken.name.clone());

        components.push(spoken_component(index, spoken, &resolved_name));
        resolved.push(ResolvedIngredient {
            spoken_name: spoken.name.clone(),
            resolved_name,
            match_confidence: canonical.map(|found| found.confidence),
            source: if spoken.estimated_cost > 0.0 {
                CostSource::Spoken
            } else {
                CostSource::Unpriced
            },
            did_you_mean: suggest_ingredient_corrections(&spoken.name, &reference_names, MAX_CORRECTIONS)
                .into_iter()
                .map(|suggestion| suggestion.ingredient)
                .collect(),
        });
    }

    let prep_minutes = parsed.preparation_time.map(f64::from).unwrap_or(0.0);
    let pricing = calculate_cost(&components, prep_minutes, parsed.serving_size, settings)
        .with_context(|| format!("Failed to cost '{}'", parsed.dish_name))?;
    let suggestions = generate_cost_optimization_suggestions(&pricing);

    info!(
        "Priced '{}': {} components, food cost {:.2}, {} suggestions",
        parsed.dish_name,
        components.len(),
        pricing.total_food_cost,
        suggestions.len()
    );

    Ok(VoiceCostingResult {
        cleaned,
        parsed,
        resolved,
        pricing,
        suggestions,
    })
}

/// Component for an ingredient costed from its spoken price
fn spoken_component(index: usize, spoken: &ParsedIngredientWithCost, name: &str) -> Component {
    let unit = if spoken.unit.is_empty() {
        DEFAULT_UNIT
    } else {
        spoken.unit.as_str()
    };
    let cost_per_unit = if spoken.quantity > 0.0 {
        spoken.estimated_cost / spoken.quantity
    } else {
        0.0
    };

    let ingredient = Ingredient::new(&format!("voice-{}", index + 1), name, unit, cost_per_unit);
    Component::ingredient(ingredient, spoken.quantity, unit)
}

/// Components costed purely from the spoken prices
pub fn components_from_parsed(ingredients: &[ParsedIngredientWithCost]) -> Vec<Component> {
    ingredients
        .iter()
        .enumerate()
        .map(|(index, spoken)| spoken_component(index, spoken, &spoken.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_model::ComponentKind;

    #[test]
    fn test_components_from_parsed() {
        let mut flour = ParsedIngredientWithCost::new("Flour", 500.0, "grams", "EUR")
            .with_price_per_kilo(1.2);
        flour.estimated_cost = 0.6;
        let eggs = ParsedIngredientWithCost::new("Eggs", 2.0, "", "EUR");

        let components = components_from_parsed(&[flour, eggs]);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].kind(), ComponentKind::Ingredient);
        assert_eq!(components[0].name(), "Flour");

        match &components[0] {
            Component::Ingredient { ingredient, unit, .. } => {
                assert!((ingredient.cost_per_unit - 0.0012).abs() < 1e-12);
                assert_eq!(unit, "grams");
                assert_eq!(ingredient.id, "voice-1");
            }
            Component::Prep { .. } => panic!("expected an ingredient"),
        }

        match &components[1] {
            Component::Ingredient { ingredient, unit, .. } => {
                assert_eq!(ingredient.cost_per_unit, 0.0);
                assert_eq!(unit, DEFAULT_UNIT);
            }
            Component::Prep { .. } => panic!("expected an ingredient"),
        }
    }
}
