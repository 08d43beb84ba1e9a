//! # Menu Costing Data Model
//!
//! This module defines the reference data (ingredients and preps), the
//! components a dish is built from, and the pricing results produced by the
//! cost engine.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: purchased raw material with a cost per unit
//! - **Prep**: a sub-recipe produced in batches (sauces, doughs, pastes)
//! - **Component**: one line item of a dish, either an ingredient or a prep
//! - **PricingCalculation**: the full cost rollup with suggested prices
//!
//! ## Usage
//!
//! ```rust
//! use menu_costing::cost_model::{Component, Ingredient, Prep};
//!
//! let tomato = Ingredient::new("ing-1", "Tomatoes", "kg", 3.0);
//! let sauce = Prep::new("prep-1", "Tomato sauce", "500ml", 4.0);
//!
//! let components = vec![
//!     Component::ingredient(tomato, 0.2, "kg"),
//!     Component::prep(sauce, 50.0, "ml"),
//! ];
//! assert_eq!(components.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::voice_normalizer::Language;

/// A purchased ingredient as supplied by the host application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    /// Display name
    pub name: String,
    /// English display name, if it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    /// German display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_de: Option<String>,
    /// Unit the cost refers to (e.g. "kg", "piece")
    pub unit: String,
    /// Cost of one `unit`, currency-agnostic
    pub cost_per_unit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Wastage override in percent; the settings default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wastage_percent: Option<f64>,
}

/// A sub-recipe produced in batches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prep {
    pub id: String,
    pub name: String,
    /// Free-text batch output, e.g. "500ml" or "12 portions"
    pub batch_yield: String,
    /// Cost of producing one batch
    pub cost_per_batch: f64,
}

/// One line item consumed by a dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Component {
    Ingredient {
        ingredient: Ingredient,
        quantity: f64,
        unit: String,
    },
    Prep {
        prep: Prep,
        quantity: f64,
        unit: String,
    },
}

/// Discriminant of a [`Component`], carried into the breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Ingredient,
    Prep,
}

/// Parsed batch yield of a prep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchYield {
    pub quantity: f64,
    pub unit: String,
    /// True when the yield text could not be parsed and `1 portion` was assumed
    pub used_fallback: bool,
}

/// Cost of one component within a calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdownItem {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub total_cost: f64,
    /// Share of the total food cost, 0-100
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_yield: Option<BatchYield>,
    pub used_fallback: bool,
}

/// Suggested menu price at one food cost target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub target_food_cost_percent: f64,
    pub price: f64,
    pub profit_margin: f64,
}

/// Efficiency tier of a dish's total food cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostEfficiency {
    Excellent,
    Good,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostExpensiveComponent {
    pub name: String,
    pub cost: f64,
    pub percentage: f64,
}

/// Summary statistics over the breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAnalysis {
    /// `None` when the dish has no components
    pub most_expensive: Option<MostExpensiveComponent>,
    pub efficiency: CostEfficiency,
    /// Prep share of the food cost, 0-100
    pub prep_utilization: f64,
    /// Ingredient share of the food cost, 0-100
    pub ingredient_utilization: f64,
}

/// Full pricing result for one dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculation {
    pub total_food_cost: f64,
    pub ingredient_cost: f64,
    pub prep_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
    pub cost_per_serving: f64,
    pub servings: u32,
    pub suggested_prices: Vec<PricePoint>,
    pub breakdown: Vec<CostBreakdownItem>,
    pub analysis: CostAnalysis,
    /// True when any prep in the breakdown used the batch yield fallback
    pub used_fallback_yield: bool,
}

/// Kind of cost optimization suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    PortionReduction,
    IngredientSubstitution,
    PrepBatching,
}

/// A rule-based hint for lowering a dish's cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSuggestion {
    pub kind: SuggestionKind,
    /// Component the suggestion is about, for substitutions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// The percentage that triggered the rule (component share or prep utilization)
    pub percentage: f64,
    /// Cost the savings are taken from: food cost, component cost or prep cost
    pub base_cost: f64,
    pub potential_savings: f64,
}

impl Ingredient {
    /// Create an ingredient with the required fields
    pub fn new(id: &str, name: &str, unit: &str, cost_per_unit: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            name_en: None,
            name_de: None,
            unit: unit.to_string(),
            cost_per_unit,
            category: None,
            wastage_percent: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_wastage(mut self, wastage_percent: f64) -> Self {
        self.wastage_percent = Some(wastage_percent);
        self
    }

    pub fn with_localized_names(mut self, name_en: &str, name_de: &str) -> Self {
        self.name_en = Some(name_en.to_string());
        self.name_de = Some(name_de.to_string());
        self
    }

    /// Display name in the requested language, falling back to `name`
    pub fn localized_name(&self, language: Language) -> &str {
        let localized = match language {
            Language::English => self.name_en.as_deref(),
            Language::German => self.name_de.as_deref(),
            Language::Unknown => None,
        };
        localized.unwrap_or(&self.name)
    }
}

impl Prep {
    pub fn new(id: &str, name: &str, batch_yield: &str, cost_per_batch: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            batch_yield: batch_yield.to_string(),
            cost_per_batch,
        }
    }

    /// Cost of one unit of the batch yield
    pub fn cost_per_unit(&self) -> f64 {
        let batch_yield = crate::cost_engine::parse_batch_yield(&self.batch_yield);
        self.cost_per_batch / batch_yield.quantity
    }
}

impl Component {
    pub fn ingredient(ingredient: Ingredient, quantity: f64, unit: &str) -> Self {
        Component::Ingredient {
            ingredient,
            quantity,
            unit: unit.to_string(),
        }
    }

    pub fn prep(prep: Prep, quantity: f64, unit: &str) -> Self {
        Component::Prep {
            prep,
            quantity,
            unit: unit.to_string(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Ingredient { .. } => ComponentKind::Ingredient,
            Component::Prep { .. } => ComponentKind::Prep,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Ingredient { ingredient, .. } => &ingredient.name,
            Component::Prep { prep, .. } => &prep.name,
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            Component::Ingredient { quantity, .. } | Component::Prep { quantity, .. } => *quantity,
        }
    }
}

impl CostEfficiency {
    /// Message key used by the localization bundles
    pub fn message_key(&self) -> &'static str {
        match self {
            CostEfficiency::Excellent => "efficiency-excellent",
            CostEfficiency::Good => "efficiency-good",
            CostEfficiency::Moderate => "efficiency-moderate",
            CostEfficiency::High => "efficiency-high",
        }
    }
}

impl PricingCalculation {
    /// Suggested price at the given target, if it is one of the computed targets
    pub fn price_at(&self, target_food_cost_percent: f64) -> Option<&PricePoint> {
        self.suggested_prices
            .iter()
            .find(|p| (p.target_food_cost_percent - target_food_cost_percent).abs() < f64::EPSILON)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Ingredient => write!(f, "ingredient"),
            ComponentKind::Prep => write!(f, "prep"),
        }
    }
}

impl fmt::Display for CostBreakdownItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({}): {:.2} ({:.1}%)",
            self.quantity, self.unit, self.name, self.kind, self.total_cost, self.percentage
        )?;
        if self.used_fallback {
            write!(f, " [yield assumed]")?;
        }
        Ok(())
    }
}

impl fmt::Display for PricingCalculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pricing ({} servings, {:.2} per serving):",
            self.servings, self.cost_per_serving
        )?;

        for item in &self.breakdown {
            writeln!(f, "  • {}", item)?;
        }

        writeln!(
            f,
            "Food {:.2} + labor {:.2} + overhead {:.2} = {:.2}",
            self.total_food_cost, self.labor_cost, self.overhead_cost, self.total_cost
        )?;

        for point in &self.suggested_prices {
            writeln!(
                f,
                "  {}% food cost → {:.2} (margin {:.2})",
                point.target_food_cost_percent, point.price, point.profit_margin
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_builder() {
        let ingredient = Ingredient::new("ing-1", "Basil", "bunch", 1.2)
            .with_category("herbs")
            .with_wastage(10.0)
            .with_localized_names("Basil", "Basilikum");

        assert_eq!(ingredient.category.as_deref(), Some("herbs"));
        assert_eq!(ingredient.wastage_percent, Some(10.0));
        assert_eq!(ingredient.localized_name(Language::German), "Basilikum");
        assert_eq!(ingredient.localized_name(Language::Unknown), "Basil");
    }

    #[test]
    fn test_component_accessors() {
        let component = Component::prep(Prep::new("p-1", "Pesto", "250g", 5.0), 25.0, "g");
        assert_eq!(component.kind(), ComponentKind::Prep);
        assert_eq!(component.name(), "Pesto");
        assert_eq!(component.quantity(), 25.0);
    }

    #[test]
    fn test_prep_cost_per_unit() {
        let prep = Prep::new("p-1", "Pesto", "250g", 5.0);
        assert!((prep.cost_per_unit() - 0.02).abs() < 1e-9);

        // Unparseable yields are priced as one portion
        let prep = Prep::new("p-2", "Mystery sauce", "a big pot", 8.0);
        assert_eq!(prep.cost_per_unit(), 8.0);
    }

    #[test]
    fn test_component_json_shape() {
        let component = Component::ingredient(Ingredient::new("i", "Salt", "g", 0.001), 5.0, "g");
        let json = serde_json::to_value(&component).unwrap();
        assert_eq!(json["type"], "ingredient");
        assert_eq!(json["ingredient"]["costPerUnit"], 0.001);

        let back: Component = serde_json::from_value(json).unwrap();
        assert_eq!(back, component);
    }
}
