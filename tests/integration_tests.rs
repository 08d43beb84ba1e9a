//! # Integration Tests
//!
//! End-to-end pricing of dictated recipes against reference data loaded
//! from disk, with settings read from a key lookup.

use menu_costing::catalog::ReferenceData;
use menu_costing::config::{CostSettings, ENV_OVERHEAD_PERCENT, ENV_TARGET_FOOD_COST};
use menu_costing::cost_model::{Ingredient, Prep};
use menu_costing::voice_costing::{price_voice_recipe, CostSource};
use std::io::Write;
use tempfile::NamedTempFile;

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn reference_data() -> ReferenceData {
        ReferenceData::new(
            vec![
                Ingredient::new("ing-mozzarella", "Mozzarella", "kg", 11.0).with_category("dairy"),
                Ingredient::new("ing-basil", "Basil", "bunches", 1.5)
                    .with_localized_names("Basil", "Basilikum"),
            ],
            vec![Prep::new("prep-sauce", "Tomato sauce", "500ml", 4.0)],
        )
    }

    #[test]
    fn test_reference_data_file_round_trip() {
        let data = reference_data();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data.to_json_string().unwrap().as_bytes()).unwrap();

        let loaded = ReferenceData::load_from_path(file.path()).unwrap();
        assert_eq!(loaded, data);
        assert_eq!(loaded.find_ingredient("basilikum").unwrap().id, "ing-basil");
    }

    #[test]
    fn test_invalid_reference_file_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"ingredients": [{"id": "", "name": "Salt", "unit": "g", "costPerUnit": -1.0}]}"#,
        )
        .unwrap();

        let err = ReferenceData::load_from_path(file.path()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("empty id"));
        assert!(chain.contains("invalid cost"));

        assert!(ReferenceData::load_from_path("/nonexistent/reference.json").is_err());
    }

    #[test]
    fn test_settings_from_lookup() {
        let settings = CostSettings::from_lookup(|key| match key {
            ENV_OVERHEAD_PERCENT => Some("0".to_string()),
            ENV_TARGET_FOOD_COST => Some("25".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.overhead_percent, 0.0);
        assert_eq!(settings.target_food_cost_percent, 25.0);

        let bad = CostSettings::from_lookup(|key| match key {
            ENV_TARGET_FOOD_COST => Some("lots".to_string()),
            _ => None,
        });
        assert!(bad.is_err());

        let out_of_range = CostSettings::from_lookup(|key| match key {
            ENV_TARGET_FOOD_COST => Some("150".to_string()),
            _ => None,
        });
        assert!(out_of_range.is_err());
    }

    #[test]
    fn test_price_dictated_pizza() {
        let settings = CostSettings::default();
        let result = price_voice_recipe(
            "This is a pizza with 200g mozzarella and 300g flour for 40 cent and 2 tomatoes, for 2 people",
            &reference_data(),
            &settings,
        )
        .unwrap();

        assert_eq!(result.parsed.dish_name, "Pizza");
        assert_eq!(result.parsed.serving_size, 2);
        assert_eq!(result.resolved.len(), 3);

        let mozzarella = &result.resolved[0];
        assert_eq!(mozzarella.resolved_name, "Mozzarella");
        assert_eq!(mozzarella.source, CostSource::Reference);
        assert_eq!(mozzarella.match_confidence, Some(1.0));

        let flour = &result.resolved[1];
        assert_eq!(flour.source, CostSource::Spoken);
        assert_eq!(flour.resolved_name, "flour");

        let tomatoes = &result.resolved[2];
        assert_eq!(tomatoes.source, CostSource::Unpriced);

        // 0.2 kg at 11.00 plus the spoken 0.40, then 10 % overhead over 2 servings
        assert!((result.pricing.total_food_cost - 2.6).abs() < 1e-6);
        assert!((result.pricing.cost_per_serving - 1.43).abs() < 1e-6);
        assert_eq!(result.pricing.servings, 2);
        assert!(result.pricing.overhead_cost > 0.0);

        let most_expensive = result.pricing.analysis.most_expensive.as_ref().unwrap();
        assert_eq!(most_expensive.name, "Mozzarella");
    }

    #[test]
    fn test_price_without_reference_data() {
        let result = price_voice_recipe(
            "ähm ich mache eine Suppe mit 1 kg Kartoffeln für 2 euro",
            &ReferenceData::default(),
            &CostSettings::default(),
        )
        .unwrap();

        assert_eq!(result.resolved.len(), 1);
        assert_eq!(result.resolved[0].source, CostSource::Spoken);
        assert!(result.resolved[0].did_you_mean.is_empty());
        assert!((result.pricing.total_food_cost - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_transcript_prices_to_zero() {
        let result =
            price_voice_recipe("", &reference_data(), &CostSettings::default()).unwrap();
        assert!(result.resolved.is_empty());
        assert_eq!(result.pricing.total_food_cost, 0.0);
        assert!(result.suggestions.is_empty());
    }
}
