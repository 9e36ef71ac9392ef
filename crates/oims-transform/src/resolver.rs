//! Mapper resolution from the (mapping, classification, schema) identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::RegistryConfig;

/// The identifier triple describing a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperIds {
    pub mapping_id: String,
    pub classification_id: String,
    pub schema_id: String,
}

impl MapperIds {
    pub fn new(
        mapping_id: impl Into<String>,
        classification_id: impl Into<String>,
        schema_id: impl Into<String>,
    ) -> Self {
        Self {
            mapping_id: mapping_id.into(),
            classification_id: classification_id.into(),
            schema_id: schema_id.into(),
        }
    }
}

/// Which precedence rule selected the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionRule {
    /// The mapping id is registered.
    KnownMapping,
    /// Classification and schema are known and their pair is registered.
    Combination,
    /// Classification and schema are known but their pair is not.
    UnregisteredCombination,
    /// Classification or schema is unknown.
    Fallback,
}

impl ResolutionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionRule::KnownMapping => "known_mapping",
            ResolutionRule::Combination => "combination",
            ResolutionRule::UnregisteredCombination => "unregistered_combination",
            ResolutionRule::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ResolutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving an identifier triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub strategy: String,
    pub rule: ResolutionRule,
    /// Set when any of the three identifiers is not recognized.
    pub generic_conversion: bool,
}

/// Selects a strategy name from an identifier triple.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: RegistryConfig,
}

impl Resolver {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Resolve a strategy name. First match wins:
    ///
    /// 1. a registered mapping id
    /// 2. a registered (classification, schema) pair when both are known,
    ///    else the fallback
    /// 3. the fallback
    pub fn resolve(&self, ids: &MapperIds) -> Resolution {
        let config = &self.config;
        let mapping_known = config.mapping_strategy(&ids.mapping_id).is_some();
        let classification_known = config.is_known_classification(&ids.classification_id);
        let schema_known = config.is_known_schema(&ids.schema_id);
        let generic_conversion = !(mapping_known && classification_known && schema_known);

        let (strategy, rule) = if let Some(strategy) = config.mapping_strategy(&ids.mapping_id) {
            (strategy, ResolutionRule::KnownMapping)
        } else if classification_known && schema_known {
            match config.combination_strategy(&ids.classification_id, &ids.schema_id) {
                Some(strategy) => (strategy, ResolutionRule::Combination),
                None => (
                    config.fallback.as_str(),
                    ResolutionRule::UnregisteredCombination,
                ),
            }
        } else {
            (config.fallback.as_str(), ResolutionRule::Fallback)
        };

        if generic_conversion {
            tracing::info!(
                mapping_id = %ids.mapping_id,
                classification_id = %ids.classification_id,
                schema_id = %ids.schema_id,
                mapping_known,
                classification_known,
                schema_known,
                "Identifier not recognized, generic conversion"
            );
        }
        tracing::debug!(strategy, rule = %rule, "Resolved mapper");

        Resolution {
            strategy: strategy.to_string(),
            rule,
            generic_conversion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{
        EXTENDED_GENERIC_MAPPER, FORESIGHT_SCHEMA, GENERIC_MAPPER, GENNOVATE_MAPPER,
        STANDARD_FORESIGHT_MAPPER,
    };

    fn resolve(mapping: &str, classification: &str, schema: &str) -> Resolution {
        Resolver::default().resolve(&MapperIds::new(mapping, classification, schema))
    }

    #[test]
    fn known_mapping_wins_regardless_of_other_ids() {
        for (classification, schema) in [
            ("EXCEL_TO_OIMS_MAPPING_001", FORESIGHT_SCHEMA),
            ("unknown", "unknown"),
            ("EXCEL_TO_OIMS_MAPPING_BASE", "Other schema"),
        ] {
            let resolution = resolve("GENNOVATE_001", classification, schema);
            assert_eq!(resolution.strategy, GENNOVATE_MAPPER);
            assert_eq!(resolution.rule, ResolutionRule::KnownMapping);
        }
    }

    #[test]
    fn all_unknown_falls_back_with_generic_flag() {
        let resolution = resolve("unknown", "unknown", "unknown");
        assert_eq!(resolution.strategy, GENERIC_MAPPER);
        assert_eq!(resolution.rule, ResolutionRule::Fallback);
        assert!(resolution.generic_conversion);
        assert_eq!(resolution, resolve("unknown", "unknown", "unknown"));
    }

    #[test]
    fn registered_combination_is_used() {
        let resolution = resolve("MY_MAPPING", "EXCEL_TO_OIMS_MAPPING_001", FORESIGHT_SCHEMA);
        assert_eq!(resolution.strategy, STANDARD_FORESIGHT_MAPPER);
        assert_eq!(resolution.rule, ResolutionRule::Combination);
        // Unknown mapping id still marks the run as generic.
        assert!(resolution.generic_conversion);

        let resolution = resolve(
            "MY_MAPPING",
            "EXCEL_TO_OIMS_MAPPING_BASE_Ext_001",
            FORESIGHT_SCHEMA,
        );
        assert_eq!(resolution.strategy, EXTENDED_GENERIC_MAPPER);
    }

    #[test]
    fn one_unknown_member_skips_combinations() {
        let resolution = resolve("MY_MAPPING", "EXCEL_TO_OIMS_MAPPING_001", "Other schema");
        assert_eq!(resolution.rule, ResolutionRule::Fallback);
        assert_eq!(resolution.strategy, GENERIC_MAPPER);
    }

    #[test]
    fn known_pair_without_combination_uses_fallback() {
        let mut config = RegistryConfig::default();
        config.combinations.clear();
        config.fallback = EXTENDED_GENERIC_MAPPER.to_string();
        let resolution = Resolver::new(config).resolve(&MapperIds::new(
            "GENNOVATE_002",
            "EXCEL_TO_OIMS_MAPPING_BASE",
            FORESIGHT_SCHEMA,
        ));
        assert_eq!(resolution.strategy, EXTENDED_GENERIC_MAPPER);
        assert_eq!(resolution.rule, ResolutionRule::UnregisteredCombination);
    }

    #[test]
    fn fully_known_triple_is_not_generic() {
        let resolution = resolve("GENNOVATE_001", "EXCEL_TO_OIMS_MAPPING_BASE", FORESIGHT_SCHEMA);
        assert!(!resolution.generic_conversion);
    }
}
