//! # Cost Engine Tests
//!
//! Cost rollups, menu pricing and optimization suggestions through the
//! public API.

use menu_costing::config::CostSettings;
use menu_costing::cost_engine::{
    calculate_cost, calculate_menu_price, generate_cost_optimization_suggestions,
};
use menu_costing::cost_errors::CostError;
use menu_costing::cost_model::{Component, CostEfficiency, Ingredient, Prep, SuggestionKind};

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn plain_settings() -> CostSettings {
        CostSettings {
            labor_rate_per_hour: 15.0,
            overhead_percent: 0.0,
            wastage_percent: 0.0,
            target_food_cost_percent: 30.0,
        }
    }

    fn pizza_components() -> Vec<Component> {
        vec![
            Component::ingredient(Ingredient::new("flour", "Flour", "kg", 1.2), 0.25, "kg"),
            Component::ingredient(Ingredient::new("mozzarella", "Mozzarella", "kg", 11.0), 0.2, "kg"),
            Component::ingredient(Ingredient::new("basil", "Basil", "bunches", 1.5), 0.1, "bunches"),
            Component::prep(Prep::new("sauce", "Tomato sauce", "500ml", 4.0), 80.0, "ml"),
        ]
    }

    #[test]
    fn test_two_servings_single_ingredient() {
        let components = vec![Component::ingredient(
            Ingredient::new("ing-1", "Lentils", "kg", 2.0),
            5.0,
            "kg",
        )];

        let result = calculate_cost(&components, 0.0, 2, &plain_settings()).unwrap();

        assert!((result.total_food_cost - 10.0).abs() < EPSILON);
        assert!((result.cost_per_serving - 5.0).abs() < EPSILON);
        assert_eq!(result.labor_cost, 0.0);
        assert_eq!(result.overhead_cost, 0.0);
        assert_eq!(result.servings, 2);
    }

    #[test]
    fn test_percentages_sum_to_100() {
        let result = calculate_cost(&pizza_components(), 20.0, 1, &CostSettings::default()).unwrap();
        let sum: f64 = result.breakdown.iter().map(|item| item.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-6, "percentages sum to {}", sum);
    }

    #[test]
    fn test_percentages_sum_to_100_when_free() {
        let components = vec![
            Component::ingredient(Ingredient::new("water", "Water", "l", 0.0), 1.0, "l"),
            Component::ingredient(Ingredient::new("salt", "Salt", "g", 0.0), 5.0, "g"),
            Component::ingredient(Ingredient::new("ice", "Ice", "g", 0.0), 50.0, "g"),
        ];
        let result = calculate_cost(&components, 0.0, 1, &plain_settings()).unwrap();
        let sum: f64 = result.breakdown.iter().map(|item| item.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-6);
        assert_eq!(result.analysis.efficiency, CostEfficiency::Excellent);
    }

    #[test]
    fn test_menu_price_targets() {
        assert_eq!(calculate_menu_price(5.0, 25.0).unwrap(), 20.0);
        assert_eq!(calculate_menu_price(5.0, 30.0).unwrap(), 16.67);
        assert!(matches!(
            calculate_menu_price(5.0, 0.0),
            Err(CostError::InvalidTargetPercentage(_))
        ));
    }

    #[test]
    fn test_suggested_prices_at_every_target() {
        let result = calculate_cost(&pizza_components(), 0.0, 1, &plain_settings()).unwrap();
        let targets: Vec<f64> = result
            .suggested_prices
            .iter()
            .map(|point| point.target_food_cost_percent)
            .collect();
        assert_eq!(targets, vec![25.0, 30.0, 35.0]);

        // Higher food cost ratio means a lower price
        assert!(result.suggested_prices[0].price > result.suggested_prices[2].price);
        assert!(result.price_at(30.0).is_some());
    }

    #[test]
    fn test_prep_uses_batch_yield() {
        let result = calculate_cost(&pizza_components(), 0.0, 1, &plain_settings()).unwrap();
        let sauce = result
            .breakdown
            .iter()
            .find(|item| item.name == "Tomato sauce")
            .unwrap();

        // 4.00 per 500 ml
        assert!((sauce.unit_cost - 0.008).abs() < EPSILON);
        assert!((sauce.total_cost - 0.64).abs() < EPSILON);
        assert!(!result.used_fallback_yield);
    }

    #[test]
    fn test_labor_and_overhead() {
        let settings = CostSettings {
            labor_rate_per_hour: 18.0,
            overhead_percent: 10.0,
            ..plain_settings()
        };
        let components = vec![Component::ingredient(
            Ingredient::new("rice", "Rice", "kg", 2.0),
            1.0,
            "kg",
        )];

        let result = calculate_cost(&components, 30.0, 1, &settings).unwrap();
        assert!((result.labor_cost - 9.0).abs() < EPSILON);
        assert!((result.overhead_cost - 0.2).abs() < EPSILON);
        assert!((result.total_cost - 11.2).abs() < EPSILON);
    }

    #[test]
    fn test_zero_servings_clamped() {
        let components = vec![Component::ingredient(
            Ingredient::new("rice", "Rice", "kg", 2.0),
            1.0,
            "kg",
        )];
        let result = calculate_cost(&components, 0.0, 0, &plain_settings()).unwrap();
        assert_eq!(result.servings, 1);
        assert!((result.cost_per_serving - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let negative = vec![Component::ingredient(
            Ingredient::new("rice", "Rice", "kg", 2.0),
            -1.0,
            "kg",
        )];
        assert!(matches!(
            calculate_cost(&negative, 0.0, 1, &plain_settings()),
            Err(CostError::InvalidQuantity { .. })
        ));

        assert!(matches!(
            calculate_cost(&[], -5.0, 1, &plain_settings()),
            Err(CostError::InvalidPrepTime(_))
        ));
    }

    #[test]
    fn test_empty_components() {
        let result = calculate_cost(&[], 0.0, 1, &plain_settings()).unwrap();
        assert!(result.breakdown.is_empty());
        assert!(result.analysis.most_expensive.is_none());
        assert_eq!(result.total_food_cost, 0.0);
    }

    #[test]
    fn test_most_expensive_component() {
        let result = calculate_cost(&pizza_components(), 0.0, 1, &plain_settings()).unwrap();
        let most_expensive = result.analysis.most_expensive.unwrap();
        assert_eq!(most_expensive.name, "Mozzarella");
        assert!((most_expensive.cost - 2.2).abs() < EPSILON);
    }

    #[test]
    fn test_suggestions_fire_independently() {
        let components = vec![
            Component::ingredient(Ingredient::new("beef", "Wagyu", "kg", 120.0), 0.2, "kg"),
            Component::prep(Prep::new("jus", "Jus", "1l", 3.0), 0.1, "l"),
        ];
        let result = calculate_cost(&components, 0.0, 1, &plain_settings()).unwrap();
        let suggestions = generate_cost_optimization_suggestions(&result);

        let kinds: Vec<SuggestionKind> = suggestions.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&SuggestionKind::PortionReduction));
        assert!(kinds.contains(&SuggestionKind::IngredientSubstitution));
        assert!(!kinds.contains(&SuggestionKind::PrepBatching));

        let substitution = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::IngredientSubstitution)
            .unwrap();
        assert_eq!(substitution.component.as_deref(), Some("Wagyu"));
        assert!((substitution.potential_savings - 3.6).abs() < EPSILON);
    }

    #[test]
    fn test_prep_heavy_dish_suggests_batching() {
        let components = vec![
            Component::ingredient(Ingredient::new("bread", "Bread", "piece", 0.5), 1.0, "piece"),
            Component::prep(Prep::new("hummus", "Hummus", "10 portions", 20.0), 1.0, "portion"),
        ];
        let result = calculate_cost(&components, 0.0, 1, &plain_settings()).unwrap();
        let suggestions = generate_cost_optimization_suggestions(&result);
        assert!(suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::PrepBatching));
    }
}
