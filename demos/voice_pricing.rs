//! Price a dictated recipe from the command line.
//!
//! ```text
//! RUST_LOG=debug cargo run --example voice_pricing -- "this is a pizza margherita with ..." [reference.json]
//! ```

use anyhow::Result;
use log::info;
use std::env;

use menu_costing::catalog::ReferenceData;
use menu_costing::config::CostSettings;
use menu_costing::cost_model::{Ingredient, Prep};
use menu_costing::localization::LocalizationManager;
use menu_costing::voice_costing::price_voice_recipe;

const SAMPLE_TRANSCRIPT: &str = "Um, this is a pizza margherita with 250g flour for 40 cent, \
    200g mozarella at 9 euro per kilo and 150 gramm Tomaten für 3 euro pro kilo, \
    2 tablespoons olive oyl, for 2 people, 25 minutes";

fn sample_reference_data() -> ReferenceData {
    ReferenceData::new(
        vec![
            Ingredient::new("ing-flour", "Flour", "kg", 1.2).with_category("dry goods"),
            Ingredient::new("ing-mozzarella", "Mozzarella", "kg", 11.0)
                .with_category("dairy")
                .with_wastage(5.0),
            Ingredient::new("ing-basil", "Basil", "bunches", 1.5)
                .with_localized_names("Basil", "Basilikum"),
        ],
        vec![Prep::new("prep-sauce", "Tomato sauce", "500ml", 4.0)],
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let transcript = args.next().unwrap_or_else(|| SAMPLE_TRANSCRIPT.to_string());
    let reference = match args.next() {
        Some(path) => ReferenceData::load_from_path(path)?,
        None => sample_reference_data(),
    };

    let settings = CostSettings::from_env()?;
    let localization = LocalizationManager::new()?;

    info!("Pricing transcript: {}", transcript);
    let result = price_voice_recipe(&transcript, &reference, &settings)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    println!();
    println!("{}", result.parsed);
    println!("{}", result.pricing);

    let language = result.cleaned.detected_language;
    let unnamed = result
        .parsed
        .ingredients
        .iter()
        .filter(|ingredient| ingredient.used_fallback_name)
        .count();
    if unnamed > 0 {
        println!(
            "{} x {}",
            unnamed,
            localization.get_for_language("unknown-ingredient", language, &[])
        );
    }
    for item in result.pricing.breakdown.iter().filter(|item| item.used_fallback) {
        println!(
            "{}",
            localization.get_for_language("yield-assumed", language, &[("prep", item.name.as_str())])
        );
    }

    println!(
        "{}",
        result.pricing.analysis.efficiency.label(&localization, language)
    );
    for suggestion in &result.suggestions {
        println!("- {}", suggestion.message(&localization, language));
    }

    Ok(())
}
