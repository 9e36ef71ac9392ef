//! Transformation strategies and their registry.
//!
//! A strategy turns a validated workbook, mapping document and schema into an
//! [`OutputDocument`]. Strategies are looked up by the name the
//! [`Resolver`](crate::Resolver) produces.
//!
//! # Example
//!
//! ```ignore
//! use oims_transform::{default_registry, GENERIC_MAPPER};
//!
//! let strategy = default_registry().get(GENERIC_MAPPER)?;
//! let output = strategy.map(&workbook, &mapping, &schema)?;
//! ```

mod engine;
mod foresight;
mod generic;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use oims_ingest::Workbook;
use oims_model::{MappingDocument, OutputDocument, SchemaDocument};

use crate::error::{Result, TransformError};

pub use engine::CONVERTER_TOOL_NAME;
pub use foresight::{GennovateMapper, StandardForesightMapper};
pub use generic::{ExtendedGenericMapper, GenericMapper};

/// A field-extraction strategy.
pub trait MappingStrategy: Send + Sync {
    /// Registry name, e.g. `"GenericMapper"`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "Mapping strategy"
    }

    /// Build the output document.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidLocation`] when a value start cell
    /// cannot be resolved.
    fn map(
        &self,
        workbook: &Workbook,
        mapping: &MappingDocument,
        schema: &SchemaDocument,
    ) -> Result<OutputDocument>;
}

/// Strategies indexed by name.
pub struct StrategyRegistry {
    strategies: BTreeMap<&'static str, Box<dyn MappingStrategy>>,
}

impl StrategyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Registers a strategy under its name, replacing any previous one.
    pub fn register(&mut self, strategy: Box<dyn MappingStrategy>) {
        self.strategies.insert(strategy.name(), strategy);
    }

    /// Strategy registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedMapper`] when nothing is
    /// registered under that name.
    pub fn get(&self, name: &str) -> Result<&dyn MappingStrategy> {
        self.strategies
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| TransformError::UnsupportedMapper {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.keys().copied()
    }

    /// Registered strategies in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn MappingStrategy> + '_ {
        self.strategies.values().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        build_default_registry()
    }
}

static DEFAULT_REGISTRY: OnceLock<StrategyRegistry> = OnceLock::new();

/// Registry with every built-in strategy, built on first access.
pub fn default_registry() -> &'static StrategyRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    registry.register(Box::new(GenericMapper));
    registry.register(Box::new(ExtendedGenericMapper));
    registry.register(Box::new(StandardForesightMapper));
    registry.register(Box::new(GennovateMapper));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryConfig;

    #[test]
    fn default_registry_covers_default_config() {
        let registry = default_registry();
        assert_eq!(registry.len(), 4);
        for name in RegistryConfig::default().strategy_names() {
            assert!(registry.contains(name), "{name} not registered");
        }
    }

    #[test]
    fn unknown_name_is_unsupported() {
        let err = default_registry()
            .get("Excel2OimsMapper_001")
            .err()
            .unwrap();
        match err {
            TransformError::UnsupportedMapper { name, available } => {
                assert_eq!(name, "Excel2OimsMapper_001");
                assert_eq!(
                    available,
                    vec![
                        "ExtendedGenericMapper",
                        "GenericMapper",
                        "GennovateMapper",
                        "StandardForesightMapper"
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn register_replaces_by_name() {
        let mut registry = StrategyRegistry::new();
        assert!(registry.is_empty());
        registry.register(Box::new(GenericMapper));
        registry.register(Box::new(GenericMapper));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("GenericMapper").unwrap().name(), "GenericMapper");
    }
}
