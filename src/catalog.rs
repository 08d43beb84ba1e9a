//! # Reference Data Module
//!
//! Ingredients and preps supplied by the host application, loaded from JSON.
//!
//! ```json
//! {
//!   "ingredients": [
//!     { "id": "ing-1", "name": "Tomatoes", "unit": "kg", "costPerUnit": 3.0 }
//!   ],
//!   "preps": [
//!     { "id": "prep-1", "name": "Tomato sauce", "batchYield": "500ml", "costPerBatch": 4.0 }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::cost_model::{Ingredient, Prep};

/// Ingredient and prep records available for costing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub preps: Vec<Prep>,
}

impl ReferenceData {
    pub fn new(ingredients: Vec<Ingredient>, preps: Vec<Prep>) -> Self {
        Self { ingredients, preps }
    }

    /// Parse and validate reference data from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json).context("Invalid reference data JSON")?;
        data.validate()?;
        debug!(
            "Parsed reference data: {} ingredients, {} preps",
            data.ingredients.len(),
            data.preps.len()
        );
        Ok(data)
    }

    /// Load and validate reference data from a JSON file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference data from {}", path.display()))?;
        let data = Self::from_json_str(&json)
            .with_context(|| format!("Failed to load reference data from {}", path.display()))?;
        info!(
            "Loaded {} ingredients and {} preps from {}",
            data.ingredients.len(),
            data.preps.len(),
            path.display()
        );
        Ok(data)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize reference data")
    }

    /// Find an ingredient by id, or by any of its names ignoring case
    pub fn find_ingredient(&self, id_or_name: &str) -> Option<&Ingredient> {
        let needle = id_or_name.trim();
        self.ingredients
            .iter()
            .find(|ingredient| ingredient.id == needle)
            .or_else(|| {
                self.ingredients.iter().find(|ingredient| {
                    ingredient_names(ingredient).any(|name| name.eq_ignore_ascii_case(needle))
                })
            })
    }

    /// Find a prep by id or by name ignoring case
    pub fn find_prep(&self, id_or_name: &str) -> Option<&Prep> {
        let needle = id_or_name.trim();
        self.preps
            .iter()
            .find(|prep| prep.id == needle)
            .or_else(|| self.preps.iter().find(|prep| prep.name.eq_ignore_ascii_case(needle)))
    }

    /// Every ingredient name, localized variants included, for fuzzy matching
    pub fn ingredient_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.ingredients
            .iter()
            .flat_map(ingredient_names)
            .filter(|name| seen.insert(name.to_lowercase()))
            .collect()
    }

    /// Reject negative costs, empty ids and duplicate ids
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        let mut ids = HashSet::new();

        for ingredient in &self.ingredients {
            if ingredient.id.trim().is_empty() {
                problems.push(format!("ingredient '{}' has an empty id", ingredient.name));
            }
            if !ids.insert(ingredient.id.as_str()) {
                problems.push(format!("duplicate id '{}'", ingredient.id));
            }
            if !ingredient.cost_per_unit.is_finite() || ingredient.cost_per_unit < 0.0 {
                problems.push(format!(
                    "ingredient '{}' has invalid cost {}",
                    ingredient.name, ingredient.cost_per_unit
                ));
            }
            if let Some(wastage) = ingredient.wastage_percent {
                if !wastage.is_finite() || wastage < 0.0 {
                    problems.push(format!(
                        "ingredient '{}' has invalid wastage {}",
                        ingredient.name, wastage
                    ));
                }
            }
        }

        for prep in &self.preps {
            if prep.id.trim().is_empty() {
                problems.push(format!("prep '{}' has an empty id", prep.name));
            }
            if !ids.insert(prep.id.as_str()) {
                problems.push(format!("duplicate id '{}'", prep.id));
            }
            if !prep.cost_per_batch.is_finite() || prep.cost_per_batch < 0.0 {
                problems.push(format!(
                    "prep '{}' has invalid batch cost {}",
                    prep.name, prep.cost_per_batch
                ));
            }
        }

        if !problems.is_empty() {
            bail!("Invalid reference data: {}", problems.join("; "));
        }
        Ok(())
    }
}

fn ingredient_names(ingredient: &Ingredient) -> impl Iterator<Item = &str> {
    std::iter::once(ingredient.name.as_str())
        .chain(ingredient.name_en.as_deref())
        .chain(ingredient.name_de.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceData {
        ReferenceData::new(
            vec![
                Ingredient::new("ing-1", "Tomatoes", "kg", 3.0)
                    .with_localized_names("Tomatoes", "Tomaten"),
                Ingredient::new("ing-2", "Basil", "bunches", 1.5),
            ],
            vec![Prep::new("prep-1", "Tomato sauce", "500ml", 4.0)],
        )
    }

    #[test]
    fn test_find_by_id_and_name() {
        let data = sample();
        assert_eq!(data.find_ingredient("ing-2").unwrap().name, "Basil");
        assert_eq!(data.find_ingredient("tomaten").unwrap().id, "ing-1");
        assert_eq!(data.find_prep("TOMATO SAUCE").unwrap().id, "prep-1");
        assert!(data.find_ingredient("saffron").is_none());
    }

    #[test]
    fn test_ingredient_names_deduplicated() {
        let data = sample();
        assert_eq!(data.ingredient_names(), vec!["Tomatoes", "Tomaten", "Basil"]);
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut data = sample();
        data.ingredients.push(Ingredient::new("ing-1", "Saffron", "g", -2.0));
        let err = data.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate id 'ing-1'"));
        assert!(err.contains("invalid cost -2"));
    }

    #[test]
    fn test_json_defaults() {
        let data = ReferenceData::from_json_str(r#"{"ingredients": []}"#).unwrap();
        assert!(data.preps.is_empty());
        assert!(ReferenceData::from_json_str("not json").is_err());
    }
}
