//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use tactics_core::CombatConfig;

use crate::loaders::{
    ConfigLoader, EffectCatalog, EffectLoader, LoadResult, PoolCatalog, PoolLoader, UnitLoader,
};
use crate::units::UnitDefinition;

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── units.ron
/// ├── pools.ron
/// └── effects.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load unit definitions from `units.ron`.
    pub fn load_units(&self) -> LoadResult<Vec<UnitDefinition>> {
        let path = self.data_dir.join("units.ron");
        UnitLoader::load(&path)
    }

    /// Load named pools from `pools.ron`.
    pub fn load_pools(&self) -> LoadResult<PoolCatalog> {
        let path = self.data_dir.join("pools.ron");
        PoolLoader::load(&path)
    }

    /// Load the roguelike effect catalog from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<EffectCatalog> {
        let path = self.data_dir.join("effects.ron");
        EffectLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), CombatConfig::default());
    }

    #[test]
    fn missing_units_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_units().unwrap_err();
        assert!(err.to_string().contains("units.ron"));
    }
}
