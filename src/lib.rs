//! # Menu Costing
//!
//! Recipe costing and menu pricing from dictated recipes.
//!
//! A spoken transcript is cleaned of fillers and stutters, parsed into
//! priced ingredients, matched against a reference ingredient catalog, and
//! rolled up into food cost, labor, overhead and suggested menu prices.
//! English and German input is supported.

pub mod catalog;
pub mod config;
pub mod cost_engine;
pub mod cost_errors;
pub mod cost_model;
pub mod ingredient_matcher;
pub mod localization;
pub mod measurement_patterns;
pub mod parser_types;
pub mod voice_costing;
pub mod voice_normalizer;
pub mod voice_parser;
pub mod voice_patterns;
