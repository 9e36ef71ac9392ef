//! Known identifiers and the strategies they select.
//!
//! The built-in registry can be replaced by a TOML file:
//!
//! ```toml
//! fallback = "GenericMapper"
//! known_classifications = ["EXCEL_TO_OIMS_MAPPING_BASE"]
//! known_schemas = ["Foresight data metametadata"]
//!
//! [known_mappings]
//! GENNOVATE_001 = "GennovateMapper"
//!
//! [[combinations]]
//! classification_id = "EXCEL_TO_OIMS_MAPPING_BASE"
//! schema_id = "Foresight data metametadata"
//! strategy = "GenericMapper"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};

pub const FORESIGHT_SCHEMA: &str = "Foresight data metametadata";
pub const GENERIC_MAPPER: &str = "GenericMapper";
pub const EXTENDED_GENERIC_MAPPER: &str = "ExtendedGenericMapper";
pub const STANDARD_FORESIGHT_MAPPER: &str = "StandardForesightMapper";
pub const GENNOVATE_MAPPER: &str = "GennovateMapper";

/// A (classification, schema) pair and the strategy registered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub classification_id: String,
    pub schema_id: String,
    pub strategy: String,
}

impl Combination {
    pub fn new(
        classification_id: impl Into<String>,
        schema_id: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            classification_id: classification_id.into(),
            schema_id: schema_id.into(),
            strategy: strategy.into(),
        }
    }
}

/// Immutable resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub known_classifications: Vec<String>,
    /// Mapping id → strategy name. Checked before anything else.
    #[serde(default)]
    pub known_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub known_schemas: Vec<String>,
    #[serde(default)]
    pub combinations: Vec<Combination>,
    /// Strategy used whenever no rule matches.
    pub fallback: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let classification_001 = "EXCEL_TO_OIMS_MAPPING_001";
        let classification_base = "EXCEL_TO_OIMS_MAPPING_BASE";
        let classification_ext = "EXCEL_TO_OIMS_MAPPING_BASE_Ext_001";
        Self {
            known_classifications: vec![
                classification_001.to_string(),
                classification_base.to_string(),
                classification_ext.to_string(),
            ],
            known_mappings: BTreeMap::from([(
                "GENNOVATE_001".to_string(),
                GENNOVATE_MAPPER.to_string(),
            )]),
            known_schemas: vec![FORESIGHT_SCHEMA.to_string()],
            combinations: vec![
                Combination::new(
                    classification_001,
                    FORESIGHT_SCHEMA,
                    STANDARD_FORESIGHT_MAPPER,
                ),
                Combination::new(classification_base, FORESIGHT_SCHEMA, GENERIC_MAPPER),
                Combination::new(classification_ext, FORESIGHT_SCHEMA, EXTENDED_GENERIC_MAPPER),
            ],
            fallback: GENERIC_MAPPER.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Load a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TransformError::configuration(format!(
                "failed to read registry {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            TransformError::Configuration { message } => {
                TransformError::configuration(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            mappings = config.known_mappings.len(),
            combinations = config.combinations.len(),
            "Loaded mapper registry"
        );
        Ok(config)
    }

    /// Parse and validate a TOML registry.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| TransformError::configuration(format!("invalid registry TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.fallback.trim().is_empty() {
            return Err(TransformError::configuration(
                "fallback strategy name is empty",
            ));
        }
        Ok(())
    }

    pub fn is_known_classification(&self, id: &str) -> bool {
        self.known_classifications.iter().any(|c| c == id)
    }

    pub fn is_known_schema(&self, id: &str) -> bool {
        self.known_schemas.iter().any(|s| s == id)
    }

    pub fn mapping_strategy(&self, mapping_id: &str) -> Option<&str> {
        self.known_mappings.get(mapping_id).map(String::as_str)
    }

    pub fn combination_strategy(&self, classification_id: &str, schema_id: &str) -> Option<&str> {
        self.combinations
            .iter()
            .find(|c| c.classification_id == classification_id && c.schema_id == schema_id)
            .map(|c| c.strategy.as_str())
    }

    /// Every strategy name the configuration can resolve to, sorted.
    pub fn strategy_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .known_mappings
            .values()
            .map(String::as_str)
            .chain(self.combinations.iter().map(|c| c.strategy.as_str()))
            .chain(std::iter::once(self.fallback.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
