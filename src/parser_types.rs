//! # Parser Types Module
//!
//! Structured results produced from dictated recipes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used when nothing of an ingredient name is left after parsing
pub const UNKNOWN_INGREDIENT_NAME: &str = "Unknown ingredient";

/// One ingredient parsed from speech, with whatever price was spoken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIngredientWithCost {
    pub name: String,
    pub quantity: f64,
    /// Canonical long unit name ("grams", "pieces"), empty when none was given
    pub unit: String,
    pub price_per_kilo: Option<f64>,
    /// Price of one `unit`
    pub price_per_unit: Option<f64>,
    pub currency: String,
    pub confidence: f64,
    /// Segment of the transcript this ingredient was parsed from
    pub original_text: String,
    pub estimated_cost: f64,
    /// The name is the "Unknown ingredient" placeholder
    #[serde(default)]
    pub used_fallback_name: bool,
}

impl ParsedIngredientWithCost {
    pub fn new(name: &str, quantity: f64, unit: &str, currency: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            price_per_kilo: None,
            price_per_unit: None,
            currency: currency.to_string(),
            confidence: 0.0,
            original_text: String::new(),
            estimated_cost: 0.0,
            used_fallback_name: false,
        }
    }

    pub fn with_price_per_kilo(mut self, price: f64) -> Self {
        self.price_per_kilo = Some(price);
        self
    }

    pub fn with_price_per_unit(mut self, price: f64) -> Self {
        self.price_per_unit = Some(price);
        self
    }

    pub fn with_original_text(mut self, text: &str) -> Self {
        self.original_text = text.to_string();
        self
    }

    pub fn has_price(&self) -> bool {
        self.price_per_kilo.is_some() || self.price_per_unit.is_some()
    }
}

/// Everything extracted from one dictated recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedVoiceParsingResult {
    pub dish_name: String,
    /// The dish name is the first words of the transcript, not a recognised phrase
    pub dish_name_from_fallback: bool,
    pub ingredients: Vec<ParsedIngredientWithCost>,
    pub total_estimated_cost: f64,
    pub suggested_price: f64,
    pub serving_size: u32,
    /// Minutes
    pub preparation_time: Option<u32>,
    pub confidence: f64,
}

impl fmt::Display for ParsedIngredientWithCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} {}", self.quantity, self.name)?;
        } else {
            write!(f, "{} {} {}", self.quantity, self.unit, self.name)?;
        }
        if self.estimated_cost > 0.0 {
            write!(f, " ({:.2} {})", self.estimated_cost, self.currency)?;
        }
        Ok(())
    }
}

impl fmt::Display for EnhancedVoiceParsingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (serves {})", self.dish_name, self.serving_size)?;
        for ingredient in &self.ingredients {
            writeln!(f, "  - {}", ingredient)?;
        }
        write!(
            f,
            "Total {:.2}, suggested price {:.2}",
            self.total_estimated_cost, self.suggested_price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_display() {
        let mut ingredient = ParsedIngredientWithCost::new("Tomatoes", 200.0, "grams", "EUR");
        assert_eq!(ingredient.to_string(), "200 grams Tomatoes");

        ingredient.estimated_cost = 0.6;
        assert_eq!(ingredient.to_string(), "200 grams Tomatoes (0.60 EUR)");

        let eggs = ParsedIngredientWithCost::new("Eggs", 3.0, "", "EUR");
        assert_eq!(eggs.to_string(), "3 Eggs");
    }

    #[test]
    fn test_has_price() {
        let ingredient = ParsedIngredientWithCost::new("Flour", 1.0, "kilograms", "EUR");
        assert!(!ingredient.has_price());
        assert!(ingredient.with_price_per_kilo(0.9).has_price());
    }

    #[test]
    fn test_serialize_camel_case() {
        let ingredient = ParsedIngredientWithCost::new("Flour", 1.0, "kilograms", "EUR")
            .with_price_per_kilo(0.9);
        let json = serde_json::to_string(&ingredient).unwrap();
        assert!(json.contains("\"pricePerKilo\":0.9"));
        assert!(json.contains("\"usedFallbackName\":false"));
    }
}
