//! Mapper resolution and transformation strategies.
//!
//! - [`registry`]: known classifications, mappings, schemas and combinations
//! - [`resolver`]: picks a strategy name from the identifier triple
//! - [`strategy`]: the [`MappingStrategy`] trait, built-in strategies and the
//!   [`StrategyRegistry`]

mod error;
pub mod registry;
pub mod resolver;
pub mod strategy;

pub use error::{Result, TransformError};
pub use registry::{
    Combination, EXTENDED_GENERIC_MAPPER, FORESIGHT_SCHEMA, GENERIC_MAPPER, GENNOVATE_MAPPER,
    RegistryConfig, STANDARD_FORESIGHT_MAPPER,
};
pub use resolver::{MapperIds, Resolution, ResolutionRule, Resolver};
pub use strategy::{
    CONVERTER_TOOL_NAME, ExtendedGenericMapper, GenericMapper, GennovateMapper, MappingStrategy,
    StandardForesightMapper, StrategyRegistry, default_registry,
};

/// Resolve the identifier triple and look up its implementation.
///
/// Runs before any workbook is read so an unimplemented strategy fails fast.
///
/// # Errors
///
/// Returns [`TransformError::UnsupportedMapper`] when the resolved name has
/// no registered implementation.
pub fn select_strategy<'r>(
    resolver: &Resolver,
    strategies: &'r StrategyRegistry,
    ids: &MapperIds,
) -> Result<(Resolution, &'r dyn MappingStrategy)> {
    let resolution = resolver.resolve(ids);
    let strategy = strategies.get(&resolution.strategy)?;
    Ok((resolution, strategy))
}
