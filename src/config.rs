//! # Costing Configuration Module
//!
//! This module defines the settings used by the cost engine and the speech
//! parser, their defaults, and how they are overridden from the environment.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;

use crate::cost_errors::CostError;

// Constants for cost configuration
pub const DEFAULT_LABOR_RATE_PER_HOUR: f64 = 15.0;
pub const DEFAULT_OVERHEAD_PERCENT: f64 = 10.0;
pub const DEFAULT_WASTAGE_PERCENT: f64 = 0.0;
pub const DEFAULT_TARGET_FOOD_COST_PERCENT: f64 = 30.0;
pub const DEFAULT_CURRENCY: &str = "EUR";

// Environment variable names
pub const ENV_LABOR_RATE: &str = "MENU_LABOR_RATE_PER_HOUR";
pub const ENV_OVERHEAD_PERCENT: &str = "MENU_OVERHEAD_PERCENT";
pub const ENV_WASTAGE_PERCENT: &str = "MENU_WASTAGE_PERCENT";
pub const ENV_TARGET_FOOD_COST: &str = "MENU_TARGET_FOOD_COST_PERCENT";

/// Settings applied to every cost calculation
///
/// Percentages are expressed in percent, so `15.0` means 15 %.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSettings {
    /// Kitchen labor cost per hour of preparation
    pub labor_rate_per_hour: f64,
    /// Overhead charged on top of the food cost
    pub overhead_percent: f64,
    /// Default wastage applied to ingredients without their own value
    pub wastage_percent: f64,
    /// Food cost ratio used when a single suggested price is needed
    pub target_food_cost_percent: f64,
}

impl Default for CostSettings {
    fn default() -> Self {
        Self {
            labor_rate_per_hour: DEFAULT_LABOR_RATE_PER_HOUR,
            overhead_percent: DEFAULT_OVERHEAD_PERCENT,
            wastage_percent: DEFAULT_WASTAGE_PERCENT,
            target_food_cost_percent: DEFAULT_TARGET_FOOD_COST_PERCENT,
        }
    }
}

impl CostSettings {
    /// Load settings from the process environment
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let settings = Self::from_lookup(|key| env::var(key).ok())?;
        info!(
            "Loaded cost settings: labor={}/h, overhead={}%, wastage={}%, target={}%",
            settings.labor_rate_per_hour,
            settings.overhead_percent,
            settings.wastage_percent,
            settings.target_food_cost_percent
        );
        Ok(settings)
    }

    /// Build settings from a key lookup, starting from the defaults
    ///
    /// # Examples
    ///
    /// ```rust
    /// use menu_costing::config::CostSettings;
    ///
    /// let settings = CostSettings::from_lookup(|key| match key {
    ///     "MENU_OVERHEAD_PERCENT" => Some("12.5".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(settings.overhead_percent, 12.5);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        let read = |key: &str, target: &mut f64| -> Result<()> {
            if let Some(raw) = lookup(key) {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} must be a number, got '{raw}'"))?;
                debug!("Overriding {} with {}", key, value);
                *target = value;
            }
            Ok(())
        };

        read(ENV_LABOR_RATE, &mut settings.labor_rate_per_hour)?;
        read(ENV_OVERHEAD_PERCENT, &mut settings.overhead_percent)?;
        read(ENV_WASTAGE_PERCENT, &mut settings.wastage_percent)?;
        read(ENV_TARGET_FOOD_COST, &mut settings.target_food_cost_percent)?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check that every setting is finite and within range
    pub fn validate(&self) -> Result<(), CostError> {
        let fields = [
            ("labor rate", self.labor_rate_per_hour),
            ("overhead percent", self.overhead_percent),
            ("wastage percent", self.wastage_percent),
        ];
        for (label, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CostError::InvalidSettings(format!(
                    "{label} must be a non-negative number, got {value}"
                )));
            }
        }

        let target = self.target_food_cost_percent;
        if !target.is_finite() || target <= 0.0 || target > 100.0 {
            return Err(CostError::InvalidSettings(format!(
                "target food cost must be within (0, 100], got {target}"
            )));
        }

        Ok(())
    }
}

/// Configuration options for the speech parser
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Food cost ratio used to derive the suggested menu price
    pub target_food_cost_percent: f64,
    /// Currency assumed when none is spoken
    pub default_currency: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            target_food_cost_percent: DEFAULT_TARGET_FOOD_COST_PERCENT,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl From<&CostSettings> for ParserConfig {
    fn from(settings: &CostSettings) -> Self {
        Self {
            target_food_cost_percent: settings.target_food_cost_percent,
            ..Default::default()
        }
    }
}
