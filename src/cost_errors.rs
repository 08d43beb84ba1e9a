//! # Cost Error Types Module
//!
//! This module defines the error type returned by the cost engine when its
//! inputs cannot be priced. Data-quality problems that can be recovered from
//! (unparseable batch yields, zero servings) are not errors; they are logged
//! and flagged on the result instead.

use thiserror::Error;

/// Errors raised by cost calculations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    /// Preparation time was negative or not a finite number
    #[error("Invalid preparation time: {0} minutes")]
    InvalidPrepTime(f64),

    /// A component quantity was negative or not a finite number
    #[error("Invalid quantity {quantity} for component '{name}'")]
    InvalidQuantity { name: String, quantity: f64 },

    /// A unit or batch cost was negative or not a finite number
    #[error("Invalid cost {cost} for component '{name}'")]
    InvalidCost { name: String, cost: f64 },

    /// Cost settings failed validation
    #[error("Invalid cost settings: {0}")]
    InvalidSettings(String),

    /// A food cost target outside (0, 100]
    #[error("Invalid target food cost percentage: {0}")]
    InvalidTargetPercentage(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CostError::InvalidQuantity {
            name: "Tomatoes".to_string(),
            quantity: -2.0,
        };
        assert_eq!(err.to_string(), "Invalid quantity -2 for component 'Tomatoes'");

        let err = CostError::InvalidTargetPercentage(0.0);
        assert!(err.to_string().contains("target food cost"));
    }
}
