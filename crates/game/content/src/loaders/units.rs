//! Unit catalog loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::units::UnitDefinition;

/// Unit catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub units: Vec<UnitDefinition>,
}

/// Loader for unit definitions from RON files.
pub struct UnitLoader;

impl UnitLoader {
    /// Load unit definitions from a RON file.
    ///
    /// Unit ids must be unique within the file.
    pub fn load(path: &Path) -> LoadResult<Vec<UnitDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<UnitDefinition>> {
        let catalog: UnitCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        if let Some(dup) = catalog.units.iter().find(|unit| !seen.insert(unit.id.as_str())) {
            anyhow::bail!("Duplicate unit id in catalog: {}", dup.id);
        }

        Ok(catalog.units)
    }
}
