//! Content loaders for reading game data from files.
//!
//! Each loader parses one file format into tactics-core values;
//! [`ContentFactory`] resolves the standard file names under a data directory.

pub mod config;
pub mod effects;
pub mod factory;
pub mod pools;
pub mod units;

pub use config::ConfigLoader;
pub use effects::{EffectCatalog, EffectEntry, EffectLoader};
pub use factory::ContentFactory;
pub use pools::{PoolCatalog, PoolDefinition, PoolLoader};
pub use units::UnitLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
