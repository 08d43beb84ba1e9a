//! # Cost Engine
//!
//! Aggregates per-component costs into a full pricing breakdown with
//! suggested menu prices, profit margins and a short cost analysis.
//!
//! ## Features
//!
//! - Ingredient costs with wastage, prep costs from batch yields
//! - Labor and overhead on top of the food cost
//! - Suggested prices at 25, 30 and 35 % food cost
//! - Rule-based optimization suggestions
//!
//! ## Usage
//!
//! ```rust
//! use menu_costing::config::CostSettings;
//! use menu_costing::cost_engine::calculate_cost;
//! use menu_costing::cost_model::{Component, Ingredient};
//!
//! let settings = CostSettings { overhead_percent: 0.0, ..Default::default() };
//! let flour = Ingredient::new("ing-1", "Flour", "kg", 2.0);
//! let calculation = calculate_cost(&[Component::ingredient(flour, 5.0, "kg")], 0.0, 2, &settings)?;
//!
//! assert_eq!(calculation.total_food_cost, 10.0);
//! assert_eq!(calculation.cost_per_serving, 5.0);
//! # Ok::<(), menu_costing::cost_errors::CostError>(())
//! ```

use lazy_static::lazy_static;
use log::{debug, info, trace, warn};
use regex::Regex;

use crate::config::CostSettings;
use crate::cost_errors::CostError;
use crate::cost_model::{
    BatchYield, Component, ComponentKind, CostAnalysis, CostBreakdownItem, CostEfficiency,
    CostSuggestion, MostExpensiveComponent, PricePoint, PricingCalculation, SuggestionKind,
};

/// Food cost ratios at which suggested prices are computed
pub const FOOD_COST_TARGETS: [f64; 3] = [25.0, 30.0, 35.0];

// Efficiency tier upper bounds on the total food cost
const EXCELLENT_MAX_COST: f64 = 5.0;
const GOOD_MAX_COST: f64 = 10.0;
const MODERATE_MAX_COST: f64 = 15.0;

// Optimization rule thresholds and savings ratios
const PORTION_REDUCTION_THRESHOLD: f64 = 15.0;
const PORTION_REDUCTION_SAVINGS: f64 = 0.20;
const SUBSTITUTION_SHARE_THRESHOLD: f64 = 30.0;
const SUBSTITUTION_SAVINGS: f64 = 0.15;
const BATCHING_UTILIZATION_THRESHOLD: f64 = 50.0;
const BATCHING_SAVINGS: f64 = 0.10;

const FALLBACK_YIELD_UNIT: &str = "portion";

lazy_static! {
    static ref BATCH_YIELD_REGEX: Regex =
        Regex::new(r"(?i)^\s*(\d+(?:[.,]\d+)?)\s*(ml|g|kg|l|portions?|servings?)\s*$")
            .expect("Batch yield pattern should be valid");
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a free-text batch yield such as "500ml" or "12 portions"
///
/// Text that does not match, or a quantity that is not positive, yields
/// `1 portion` with `used_fallback` set.
///
/// # Examples
///
/// ```rust
/// use menu_costing::cost_engine::parse_batch_yield;
///
/// let parsed = parse_batch_yield("1,5 L");
/// assert_eq!(parsed.quantity, 1.5);
/// assert_eq!(parsed.unit, "l");
/// assert!(!parsed.used_fallback);
///
/// assert!(parse_batch_yield("one pot").used_fallback);
/// ```
pub fn parse_batch_yield(text: &str) -> BatchYield {
    let fallback = || BatchYield {
        quantity: 1.0,
        unit: FALLBACK_YIELD_UNIT.to_string(),
        used_fallback: true,
    };

    let Some(captures) = BATCH_YIELD_REGEX.captures(text) else {
        warn!("Unparseable batch yield '{}', assuming 1 {}", text, FALLBACK_YIELD_UNIT);
        return fallback();
    };

    let quantity: f64 = match captures[1].replace(',', ".").parse() {
        Ok(quantity) => quantity,
        Err(_) => {
            warn!("Invalid batch yield number in '{}', assuming 1 {}", text, FALLBACK_YIELD_UNIT);
            return fallback();
        }
    };

    if quantity <= 0.0 {
        warn!("Non-positive batch yield '{}', assuming 1 {}", text, FALLBACK_YIELD_UNIT);
        return fallback();
    }

    let unit = captures[2].to_lowercase();
    trace!("Parsed batch yield '{}' -> {} {}", text, quantity, unit);
    BatchYield {
        quantity,
        unit,
        used_fallback: false,
    }
}

fn check_quantity(name: &str, quantity: f64) -> Result<(), CostError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(CostError::InvalidQuantity {
            name: name.to_string(),
            quantity,
        });
    }
    Ok(())
}

fn check_cost(name: &str, cost: f64) -> Result<(), CostError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(CostError::InvalidCost {
            name: name.to_string(),
            cost,
        });
    }
    Ok(())
}

/// Cost a single component
///
/// The returned item has `percentage` set to 0; it is filled in once the
/// total food cost is known.
pub fn calculate_component_cost(
    component: &Component,
    settings: &CostSettings,
) -> Result<CostBreakdownItem, CostError> {
    match component {
        Component::Ingredient {
            ingredient,
            quantity,
            unit,
        } => {
            check_quantity(&ingredient.name, *quantity)?;
            check_cost(&ingredient.name, ingredient.cost_per_unit)?;

            let wastage = ingredient.wastage_percent.unwrap_or(settings.wastage_percent);
            if !wastage.is_finite() || wastage < 0.0 {
                return Err(CostError::InvalidSettings(format!(
                    "wastage for '{}' must be non-negative, got {}",
                    ingredient.name, wastage
                )));
            }

            let total_cost = ingredient.cost_per_unit * quantity * (1.0 + wastage / 100.0);
            trace!(
                "Ingredient '{}': {} x {} (+{}% wastage) = {}",
                ingredient.name,
                quantity,
                ingredient.cost_per_unit,
                wastage,
                total_cost
            );

            Ok(CostBreakdownItem {
                id: ingredient.id.clone(),
                name: ingredient.name.clone(),
                kind: ComponentKind::Ingredient,
                quantity: *quantity,
                unit: unit.clone(),
                unit_cost: ingredient.cost_per_unit,
                total_cost,
                percentage: 0.0,
                category: ingredient.category.clone(),
                batch_yield: None,
                used_fallback: false,
            })
        }
        Component::Prep {
            prep,
            quantity,
            unit,
        } => {
            check_quantity(&prep.name, *quantity)?;
            check_cost(&prep.name, prep.cost_per_batch)?;

            let batch_yield = parse_batch_yield(&prep.batch_yield);
            let unit_cost = prep.cost_per_batch / batch_yield.quantity;
            let total_cost = unit_cost * quantity;
            trace!(
                "Prep '{}': {} / {} {} = {} per unit, x {} = {}",
                prep.name,
                prep.cost_per_batch,
                batch_yield.quantity,
                batch_yield.unit,
                unit_cost,
                quantity,
                total_cost
            );

            Ok(CostBreakdownItem {
                id: prep.id.clone(),
                name: prep.name.clone(),
                kind: ComponentKind::Prep,
                quantity: *quantity,
                unit: unit.clone(),
                unit_cost,
                total_cost,
                percentage: 0.0,
                category: None,
                used_fallback: batch_yield.used_fallback,
                batch_yield: Some(batch_yield),
            })
        }
    }
}

/// Suggested menu price so that the food cost is `target_percent` of it
///
/// # Examples
///
/// ```rust
/// use menu_costing::cost_engine::calculate_menu_price;
///
/// assert_eq!(calculate_menu_price(5.0, 25.0)?, 20.0);
/// assert_eq!(calculate_menu_price(5.0, 30.0)?, 16.67);
/// # Ok::<(), menu_costing::cost_errors::CostError>(())
/// ```
pub fn calculate_menu_price(cost_per_serving: f64, target_percent: f64) -> Result<f64, CostError> {
    if !target_percent.is_finite() || target_percent <= 0.0 || target_percent > 100.0 {
        return Err(CostError::InvalidTargetPercentage(target_percent));
    }
    Ok(round2(cost_per_serving / (target_percent / 100.0)))
}

/// Efficiency tier for a total food cost
pub fn cost_efficiency(total_food_cost: f64) -> CostEfficiency {
    if total_food_cost <= EXCELLENT_MAX_COST {
        CostEfficiency::Excellent
    } else if total_food_cost <= GOOD_MAX_COST {
        CostEfficiency::Good
    } else if total_food_cost <= MODERATE_MAX_COST {
        CostEfficiency::Moderate
    } else {
        CostEfficiency::High
    }
}

fn share_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Calculate the full pricing of a dish
///
/// # Arguments
///
/// * `components` - Ingredients and preps used by the dish, may be empty
/// * `prep_minutes` - Labor time for the whole recipe
/// * `servings` - Number of servings the recipe yields; 0 is treated as 1
/// * `settings` - Labor rate, overhead and wastage settings
pub fn calculate_cost(
    components: &[Component],
    prep_minutes: f64,
    servings: u32,
    settings: &CostSettings,
) -> Result<PricingCalculation, CostError> {
    settings.validate()?;

    if !prep_minutes.is_finite() || prep_minutes < 0.0 {
        return Err(CostError::InvalidPrepTime(prep_minutes));
    }

    let servings = if servings == 0 {
        warn!("Servings of 0 requested, calculating for 1 serving");
        1
    } else {
        servings
    };

    debug!(
        "Calculating cost for {} components, {} minutes, {} servings",
        components.len(),
        prep_minutes,
        servings
    );

    let mut breakdown = components
        .iter()
        .map(|component| calculate_component_cost(component, settings))
        .collect::<Result<Vec<_>, _>>()?;

    let ingredient_cost: f64 = breakdown
        .iter()
        .filter(|item| item.kind == ComponentKind::Ingredient)
        .map(|item| item.total_cost)
        .sum();
    let prep_cost: f64 = breakdown
        .iter()
        .filter(|item| item.kind == ComponentKind::Prep)
        .map(|item| item.total_cost)
        .sum();
    let total_food_cost = ingredient_cost + prep_cost;

    // Percentages must still add up to 100 when everything is free
    let even_share = 100.0 / breakdown.len().max(1) as f64;
    for item in &mut breakdown {
        item.percentage = if total_food_cost > 0.0 {
            item.total_cost / total_food_cost * 100.0
        } else {
            even_share
        };
    }

    let labor_cost = prep_minutes / 60.0 * settings.labor_rate_per_hour;
    let overhead_cost = total_food_cost * settings.overhead_percent / 100.0;
    let total_cost = total_food_cost + labor_cost + overhead_cost;
    let cost_per_serving = total_cost / servings as f64;

    let suggested_prices = FOOD_COST_TARGETS
        .iter()
        .map(|&target| {
            let price = calculate_menu_price(cost_per_serving, target)?;
            Ok(PricePoint {
                target_food_cost_percent: target,
                price,
                profit_margin: round2(price - cost_per_serving),
            })
        })
        .collect::<Result<Vec<_>, CostError>>()?;

    // First strictly highest item wins
    let most_expensive = breakdown
        .iter()
        .fold(None::<&CostBreakdownItem>, |best, item| match best {
            Some(current) if current.total_cost >= item.total_cost => Some(current),
            _ => Some(item),
        })
        .map(|item| MostExpensiveComponent {
            name: item.name.clone(),
            cost: item.total_cost,
            percentage: item.percentage,
        });

    let analysis = CostAnalysis {
        most_expensive,
        efficiency: cost_efficiency(total_food_cost),
        prep_utilization: share_of(prep_cost, total_food_cost),
        ingredient_utilization: share_of(ingredient_cost, total_food_cost),
    };

    let used_fallback_yield = breakdown.iter().any(|item| item.used_fallback);
    if used_fallback_yield {
        warn!("Pricing relies on at least one assumed batch yield");
    }

    info!(
        "Calculated food cost {:.2}, total {:.2}, {:.2} per serving",
        total_food_cost, total_cost, cost_per_serving
    );

    Ok(PricingCalculation {
        total_food_cost,
        ingredient_cost,
        prep_cost,
        labor_cost,
        overhead_cost,
        total_cost,
        cost_per_serving,
        servings,
        suggested_prices,
        breakdown,
        analysis,
        used_fallback_yield,
    })
}

/// Rule-based suggestions for lowering a dish's cost
///
/// Each rule is evaluated independently:
/// - food cost above 15 suggests a smaller portion (saves 20 % of food cost)
/// - any component above 30 % of the food cost suggests a substitute (saves 15 % of its cost)
/// - prep utilization above 50 % suggests larger batches (saves 10 % of prep cost)
pub fn generate_cost_optimization_suggestions(calculation: &PricingCalculation) -> Vec<CostSuggestion> {
    let mut suggestions = Vec::new();

    if calculation.total_food_cost > PORTION_REDUCTION_THRESHOLD {
        suggestions.push(CostSuggestion {
            kind: SuggestionKind::PortionReduction,
            component: None,
            percentage: 100.0,
            base_cost: calculation.total_food_cost,
            potential_savings: round2(calculation.total_food_cost * PORTION_REDUCTION_SAVINGS),
        });
    }

    for item in &calculation.breakdown {
        if item.percentage > SUBSTITUTION_SHARE_THRESHOLD {
            suggestions.push(CostSuggestion {
                kind: SuggestionKind::IngredientSubstitution,
                component: Some(item.name.clone()),
                percentage: item.percentage,
                base_cost: item.total_cost,
                potential_savings: round2(item.total_cost * SUBSTITUTION_SAVINGS),
            });
        }
    }

    if calculation.analysis.prep_utilization > BATCHING_UTILIZATION_THRESHOLD {
        suggestions.push(CostSuggestion {
            kind: SuggestionKind::PrepBatching,
            component: None,
            percentage: calculation.analysis.prep_utilization,
            base_cost: calculation.prep_cost,
            potential_savings: round2(calculation.prep_cost * BATCHING_SAVINGS),
        });
    }

    debug!("Generated {} cost suggestions", suggestions.len());
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_model::{Ingredient, Prep};

    fn no_overhead() -> CostSettings {
        CostSettings {
            overhead_percent: 0.0,
            wastage_percent: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_batch_yield_variants() {
        let parsed = parse_batch_yield("500ml");
        assert_eq!((parsed.quantity, parsed.unit.as_str()), (500.0, "ml"));

        let parsed = parse_batch_yield("12 Portions");
        assert_eq!((parsed.quantity, parsed.unit.as_str()), (12.0, "portions"));

        let parsed = parse_batch_yield("2.5kg");
        assert_eq!(parsed.quantity, 2.5);
        assert!(!parsed.used_fallback);
    }

    #[test]
    fn test_parse_batch_yield_fallbacks() {
        for text in ["", "lots", "500 cups", "0 g", "ml 500"] {
            let parsed = parse_batch_yield(text);
            assert!(parsed.used_fallback, "expected fallback for '{}'", text);
            assert_eq!(parsed.quantity, 1.0);
            assert_eq!(parsed.unit, "portion");
        }
    }

    #[test]
    fn test_ingredient_cost_with_wastage() {
        let settings = CostSettings {
            wastage_percent: 10.0,
            ..no_overhead()
        };
        let component = Component::ingredient(Ingredient::new("i", "Beef", "kg", 20.0), 0.5, "kg");
        let item = calculate_component_cost(&component, &settings).unwrap();
        assert!((item.total_cost - 11.0).abs() < 1e-9);

        // Per-ingredient wastage wins over the default
        let component = Component::ingredient(
            Ingredient::new("i", "Beef", "kg", 20.0).with_wastage(0.0),
            0.5,
            "kg",
        );
        let item = calculate_component_cost(&component, &settings).unwrap();
        assert!((item.total_cost - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_prep_cost_from_yield() {
        let component = Component::prep(Prep::new("p", "Tomato sauce", "500ml", 4.0), 100.0, "ml");
        let item = calculate_component_cost(&component, &no_overhead()).unwrap();
        assert!((item.unit_cost - 0.008).abs() < 1e-12);
        assert!((item.total_cost - 0.8).abs() < 1e-9);
        assert!(!item.used_fallback);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let component = Component::ingredient(Ingredient::new("i", "Salt", "g", 0.01), -1.0, "g");
        let err = calculate_component_cost(&component, &no_overhead()).unwrap_err();
        assert!(matches!(err, CostError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_empty_components() {
        let calc = calculate_cost(&[], 0.0, 1, &no_overhead()).unwrap();
        assert_eq!(calc.total_food_cost, 0.0);
        assert!(calc.breakdown.is_empty());
        assert!(calc.analysis.most_expensive.is_none());
        assert_eq!(calc.analysis.prep_utilization, 0.0);
        assert_eq!(calc.analysis.efficiency, CostEfficiency::Excellent);
    }

    #[test]
    fn test_zero_servings_clamped() {
        let component = Component::ingredient(Ingredient::new("i", "Rice", "kg", 2.0), 1.0, "kg");
        let calc = calculate_cost(&[component], 0.0, 0, &no_overhead()).unwrap();
        assert_eq!(calc.servings, 1);
        assert_eq!(calc.cost_per_serving, 2.0);
    }

    #[test]
    fn test_negative_prep_time_rejected() {
        let err = calculate_cost(&[], -5.0, 1, &no_overhead()).unwrap_err();
        assert_eq!(err, CostError::InvalidPrepTime(-5.0));
    }

    #[test]
    fn test_efficiency_tiers() {
        assert_eq!(cost_efficiency(5.0), CostEfficiency::Excellent);
        assert_eq!(cost_efficiency(5.01), CostEfficiency::Good);
        assert_eq!(cost_efficiency(10.0), CostEfficiency::Good);
        assert_eq!(cost_efficiency(15.0), CostEfficiency::Moderate);
        assert_eq!(cost_efficiency(15.5), CostEfficiency::High);
    }

    #[test]
    fn test_menu_price_invalid_target() {
        assert!(calculate_menu_price(5.0, 0.0).is_err());
        assert!(calculate_menu_price(5.0, 120.0).is_err());
        assert_eq!(calculate_menu_price(5.0, 35.0).unwrap(), 14.29);
    }

    #[test]
    fn test_most_expensive_tie_keeps_first() {
        let components = vec![
            Component::ingredient(Ingredient::new("a", "Apples", "kg", 2.0), 1.0, "kg"),
            Component::ingredient(Ingredient::new("b", "Pears", "kg", 2.0), 1.0, "kg"),
        ];
        let calc = calculate_cost(&components, 0.0, 1, &no_overhead()).unwrap();
        assert_eq!(calc.analysis.most_expensive.unwrap().name, "Apples");
    }

    #[test]
    fn test_free_components_share_evenly() {
        let components = vec![
            Component::ingredient(Ingredient::new("a", "Water", "l", 0.0), 1.0, "l"),
            Component::ingredient(Ingredient::new("b", "Ice", "g", 0.0), 100.0, "g"),
        ];
        let calc = calculate_cost(&components, 0.0, 1, &no_overhead()).unwrap();
        let sum: f64 = calc.breakdown.iter().map(|i| i.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }
}
