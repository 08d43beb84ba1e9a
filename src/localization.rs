//! # Localization Module
//!
//! English and German messages for cost suggestions and efficiency tiers,
//! backed by Fluent bundles embedded at compile time.

use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use log::{debug, warn};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

use crate::cost_model::{CostEfficiency, CostSuggestion, SuggestionKind};
use crate::voice_normalizer::Language;

const DEFAULT_LANGUAGE: &str = "en";

const RESOURCES: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en/main.ftl")),
    ("de", include_str!("../locales/de/main.ftl")),
];

/// Localization manager for cost messages
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every embedded language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (code, source) in RESOURCES {
            let locale: LanguageIdentifier = code.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(code.to_string(), bundle);
        }

        debug!("Loaded {} localization bundles", bundles.len());
        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Plain text output, no Unicode isolation marks around arguments
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid Fluent resource for {}: {:?}", locale, errors))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Conflicting Fluent messages for {}: {:?}", locale, errors))?;

        Ok(bundle)
    }

    /// Get a localized message in a specific language
    ///
    /// Unsupported languages fall back to English.
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!("Errors while formatting '{}' in {}: {:?}", key, language, errors);
        }

        value.into_owned()
    }

    /// Get an English message
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, DEFAULT_LANGUAGE, args)
    }

    /// Get an English message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, Some(&args_map))
    }

    /// Get a message in the language detected from voice input
    pub fn get_for_language(&self, key: &str, language: Language, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language.code(), Some(&args_map))
    }
}

impl CostSuggestion {
    /// Human-readable description of this suggestion
    pub fn message(&self, manager: &LocalizationManager, language: Language) -> String {
        let savings = format!("{:.2}", self.potential_savings);
        let percentage = format!("{:.0}", self.percentage);

        match self.kind {
            SuggestionKind::PortionReduction => {
                let cost = format!("{:.2}", self.base_cost);
                manager.get_for_language(
                    "suggestion-portion-reduction",
                    language,
                    &[("cost", &cost), ("savings", &savings)],
                )
            }
            SuggestionKind::IngredientSubstitution => {
                let component = self.component.as_deref().unwrap_or_default();
                manager.get_for_language(
                    "suggestion-ingredient-substitution",
                    language,
                    &[
                        ("component", component),
                        ("percentage", &percentage),
                        ("savings", &savings),
                    ],
                )
            }
            SuggestionKind::PrepBatching => manager.get_for_language(
                "suggestion-prep-batching",
                language,
                &[("percentage", &percentage), ("savings", &savings)],
            ),
        }
    }
}

impl CostEfficiency {
    /// Localized label for this tier
    pub fn label(&self, manager: &LocalizationManager, language: Language) -> String {
        manager.get_for_language(self.message_key(), language, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_languages_loaded() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(manager.get_message("efficiency-good", None), "Good cost efficiency");
        assert_eq!(
            manager.get_message_in_language("efficiency-good", "de", None),
            "Gute Kosteneffizienz"
        );
    }

    #[test]
    fn test_unknown_language_uses_english() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(
            manager.get_for_language("unknown-ingredient", Language::Unknown, &[]),
            "Unknown ingredient"
        );
    }

    #[test]
    fn test_suggestion_message() {
        let manager = LocalizationManager::new().unwrap();
        let suggestion = CostSuggestion {
            kind: SuggestionKind::IngredientSubstitution,
            component: Some("Saffron".to_string()),
            percentage: 62.4,
            base_cost: 10.0,
            potential_savings: 1.5,
        };

        let english = suggestion.message(&manager, Language::English);
        assert!(english.contains("Saffron makes up 62%"));
        assert!(english.contains("1.50"));

        let german = suggestion.message(&manager, Language::German);
        assert!(german.contains("Ersatz"));
    }
}
