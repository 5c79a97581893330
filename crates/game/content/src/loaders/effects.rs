//! Roguelike effect catalog loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{CombatConfig, DrawMode, RogueEffect, RoguelikePool, Tier};

use crate::loaders::{LoadResult, read_file};

/// One effect plus its draw weight within its tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    pub effect: RogueEffect,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Effect catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectCatalog {
    #[serde(default)]
    pub mode: DrawMode,
    #[serde(default)]
    pub tier_weights: Vec<(Tier, f64)>,
    pub effects: Vec<EffectEntry>,
}

impl EffectCatalog {
    /// Builds a fresh pool (all use counts as authored).
    ///
    /// A zero `limit` takes `config.default_effect_limit`; a missing weight
    /// takes `config.default_pool_weight`.
    pub fn build_pool(&self, config: &CombatConfig) -> RoguelikePool {
        let mut pool = RoguelikePool::new(self.mode, self.tier_weights.clone(), config);
        for entry in &self.effects {
            let mut effect = entry.effect.clone();
            if effect.limit == 0 {
                effect.limit = config.default_effect_limit;
            }
            pool.add_effect(effect, entry.weight.unwrap_or(config.default_pool_weight));
        }
        pool
    }
}

/// Loader for roguelike effects from RON files.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EffectCatalog> {
        let catalog: EffectCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for entry in &catalog.effects {
            if !seen.insert(entry.effect.id.as_str()) {
                anyhow::bail!("Duplicate effect id in catalog: {}", entry.effect.id);
            }
            if entry.effect.effects.is_empty() {
                anyhow::bail!("Effect '{}' grants no stat changes", entry.effect.id);
            }
        }

        Ok(catalog)
    }
}
