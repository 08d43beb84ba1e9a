//! # Voice Parser Tests
//!
//! Parsing dictated recipes into priced ingredients, servings and a
//! suggested menu price.

use menu_costing::config::ParserConfig;
use menu_costing::voice_parser::{
    estimate_ingredient_cost, parse_enhanced_voice_input, parse_enhanced_voice_input_with_config,
};
use menu_costing::parser_types::ParsedIngredientWithCost;

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_single_priced_ingredient() {
        let result = parse_enhanced_voice_input("200g tomatoes at 3 euro per kilo");

        assert_eq!(result.ingredients.len(), 1);
        let tomatoes = &result.ingredients[0];
        assert_eq!(tomatoes.name, "Tomatoes");
        assert_eq!(tomatoes.quantity, 200.0);
        assert_eq!(tomatoes.unit, "grams");
        assert_eq!(tomatoes.price_per_kilo, Some(3.0));
        assert_eq!(tomatoes.currency, "EUR");
        assert!((tomatoes.estimated_cost - 0.6).abs() < EPSILON);
        assert_eq!(tomatoes.confidence, 1.0);
    }

    #[test]
    fn test_german_tomato_soup() {
        let result = parse_enhanced_voice_input(
            "Ich mache eine Tomatensuppe mit 500 gramm Tomaten für 2 euro pro kilo \
             und 200 ml Sahne für 50 cent und 1 euro, für 4 Personen",
        );

        assert_eq!(result.dish_name, "Tomatensuppe");
        assert!(!result.dish_name_from_fallback);
        assert_eq!(result.serving_size, 4);
        assert_eq!(result.preparation_time, None);

        let names: Vec<&str> = result.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Tomatoes", "Cream"]);

        let tomatoes = &result.ingredients[0];
        assert_eq!(tomatoes.quantity, 500.0);
        assert_eq!(tomatoes.price_per_kilo, Some(2.0));
        assert!((tomatoes.estimated_cost - 1.0).abs() < EPSILON);

        let cream = &result.ingredients[1];
        assert_eq!(cream.quantity, 200.0);
        assert_eq!(cream.unit, "milliliters");
        assert!((cream.estimated_cost - 1.5).abs() < EPSILON);

        assert!((result.total_estimated_cost - 2.5).abs() < EPSILON);
        // 2.50 at 30 % is 8.33, rounded to a menu ending
        assert_eq!(result.suggested_price, 8.5);
    }

    #[test]
    fn test_dish_introduction_not_in_ingredient_names() {
        let result = parse_enhanced_voice_input(
            "ich mache einen salat mit zwei tomaten, 100 gramm buntpaprika für 3 euro pro kilo",
        );

        assert_eq!(result.dish_name, "Salat");
        let names: Vec<&str> = result.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Tomatoes", "Mixed bell peppers"]);
        assert_eq!(result.ingredients[0].quantity, 2.0);
        assert!((result.ingredients[1].estimated_cost - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_preparation_time() {
        let result = parse_enhanced_voice_input(
            "this is pasta with 200g spaghetti for 2 people, 25 minutes",
        );
        assert_eq!(result.preparation_time, Some(25));
        assert_eq!(result.serving_size, 2);
        assert_eq!(result.ingredients.len(), 1);
        assert_eq!(result.ingredients[0].name, "Spaghetti");

        let result = parse_enhanced_voice_input("this is a stew with 1 kg beef, takes 1.5 hours");
        assert_eq!(result.preparation_time, Some(90));
        assert_eq!(result.ingredients.len(), 1);
    }

    #[test]
    fn test_fallback_dish_name() {
        let result = parse_enhanced_voice_input("200g tomatoes at 3 euro per kilo");
        assert_eq!(result.dish_name, "200g tomatoes at");
        assert!(result.dish_name_from_fallback);
        assert!((result.confidence - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_dollars_per_pound() {
        let result = parse_enhanced_voice_input("this is a steak with 2 lb beef for $4 per pound");
        assert_eq!(result.dish_name, "Steak");

        let beef = &result.ingredients[0];
        assert_eq!(beef.name, "Beef");
        assert_eq!(beef.unit, "pounds");
        assert_eq!(beef.currency, "USD");
        assert!((beef.estimated_cost - 8.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_transcript() {
        let result = parse_enhanced_voice_input("");
        assert!(result.ingredients.is_empty());
        assert_eq!(result.serving_size, 1);
        assert_eq!(result.total_estimated_cost, 0.0);
        assert_eq!(result.suggested_price, 0.0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_confidence_in_range() {
        let inputs = [
            "this is a pizza with 250g flour, 200g mozzarella for 2 euro and basil",
            "ähm das ist ein salat mit 3 tomaten",
            "saffron for 5 euro",
            "two onions",
            "nothing to see here",
        ];
        for input in inputs {
            let result = parse_enhanced_voice_input(input);
            assert!(
                (0.0..=1.0).contains(&result.confidence),
                "confidence {} for '{}'",
                result.confidence,
                input
            );
            for ingredient in &result.ingredients {
                assert!((0.0..=1.0).contains(&ingredient.confidence));
                assert!(ingredient.estimated_cost >= 0.0);
            }
        }
    }

    #[test]
    fn test_custom_target_changes_suggested_price() {
        let config = ParserConfig {
            target_food_cost_percent: 25.0,
            ..ParserConfig::default()
        };
        let result = parse_enhanced_voice_input_with_config("1 kg flour for 5 euro", &config);
        assert!((result.total_estimated_cost - 5.0).abs() < EPSILON);
        assert_eq!(result.suggested_price, 20.0);
    }

    #[test]
    fn test_estimate_without_price_is_zero() {
        let ingredient = ParsedIngredientWithCost::new("Salt", 5.0, "grams", "EUR");
        assert_eq!(estimate_ingredient_cost(&ingredient), 0.0);

        // Per-kilo prices do not apply to counted units
        let eggs = ParsedIngredientWithCost::new("Eggs", 3.0, "pieces", "EUR").with_price_per_kilo(4.0);
        assert_eq!(estimate_ingredient_cost(&eggs), 0.0);
    }
}
