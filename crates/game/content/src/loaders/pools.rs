//! Named weighted pool loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{CombatConfig, WeightedSelector};

use crate::loaders::{LoadResult, read_file};

/// One pool item. A missing weight uses the configured default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub item: String,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// A named pool of string items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDefinition {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<PoolEntry>,
}

impl PoolDefinition {
    /// Builds a selector. Repeated items merge their weights.
    pub fn to_selector(&self, config: &CombatConfig) -> WeightedSelector<String> {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.item.clone(),
                    entry.weight.unwrap_or(config.default_pool_weight),
                )
            })
            .collect()
    }
}

/// Pool catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolCatalog {
    pub pools: Vec<PoolDefinition>,
}

impl PoolCatalog {
    pub fn get(&self, name: &str) -> Option<&PoolDefinition> {
        self.pools.iter().find(|pool| pool.name == name)
    }
}

/// Loader for weighted pools from RON files.
pub struct PoolLoader;

impl PoolLoader {
    pub fn load(path: &Path) -> LoadResult<PoolCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PoolCatalog> {
        let catalog: PoolCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse pool catalog RON: {}", e))?;

        for pool in &catalog.pools {
            if let Some(entry) = pool
                .entries
                .iter()
                .find(|entry| entry.weight.is_some_and(|w| !w.is_finite() || w < 0.0))
            {
                anyhow::bail!(
                    "Pool '{}' has invalid weight for '{}': {:?}",
                    pool.name,
                    entry.item,
                    entry.weight
                );
            }
        }

        Ok(catalog)
    }
}
