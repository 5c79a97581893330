//! Data-driven content definitions and loaders.
//!
//! This crate turns designer-authored data files into tactics-core values:
//! - Unit definitions with level growth (RON)
//! - Named weighted pools (RON)
//! - Roguelike effect catalogs (RON)
//! - Combat configuration (TOML)
//!
//! All loaders use tactics-core types directly with serde for RON/TOML
//! deserialization.

pub mod units;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use units::{LevelGrowth, UnitDefinition};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EffectCatalog, EffectEntry, EffectLoader, PoolCatalog,
    PoolDefinition, PoolLoader, UnitLoader,
};
