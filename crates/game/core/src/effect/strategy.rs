//! Strategies turning effect specs into stat contributions.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use crate::stats::{StatBlock, StatKind};

use super::EffectError;
use super::model::{EffectCategory, EffectSpec, RogueEffect};

/// Applies one [`EffectCategory`] to a unit's stats.
pub trait EffectStrategy: Send + Sync {
    fn category(&self) -> EffectCategory;

    /// Writes the contribution for `spec` at `uses` stacks under `id`,
    /// replacing the previous stack count.
    fn apply(&self, stats: &mut StatBlock, id: &str, spec: &EffectSpec, uses: u32);

    /// Removes the contribution written under `id`.
    fn revoke(&self, stats: &mut StatBlock, id: &str) -> bool;
}

/// Strategy that routes a category to a single stat ledger.
#[derive(Clone, Copy, Debug)]
pub struct StatEffect {
    category: EffectCategory,
    stat: StatKind,
}

impl StatEffect {
    pub const fn new(category: EffectCategory, stat: StatKind) -> Self {
        Self { category, stat }
    }

    pub const fn stat(&self) -> StatKind {
        self.stat
    }
}

impl EffectStrategy for StatEffect {
    fn category(&self) -> EffectCategory {
        self.category
    }

    fn apply(&self, stats: &mut StatBlock, id: &str, spec: &EffectSpec, uses: u32) {
        let value = spec.stacked_value(uses);
        stats.add(self.stat, id, value, spec.kind);
        trace!(
            target: "tactics_core::effect",
            stat = %self.stat,
            id,
            value,
            uses,
            "effect contribution written"
        );
    }

    fn revoke(&self, stats: &mut StatBlock, id: &str) -> bool {
        stats.remove(self.stat, id)
    }
}

/// Category → strategy lookup.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    strategies: BTreeMap<EffectCategory, Arc<dyn EffectStrategy>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Damage, attack speed, and move speed mapped to their stat ledgers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StatEffect::new(EffectCategory::Damage, StatKind::Damage)));
        registry.register(Arc::new(StatEffect::new(
            EffectCategory::AttackSpeed,
            StatKind::AttackSpeed,
        )));
        registry.register(Arc::new(StatEffect::new(
            EffectCategory::MoveSpeed,
            StatKind::MoveSpeed,
        )));
        registry
    }

    /// Registers a strategy, replacing any previous one for its category.
    pub fn register(&mut self, strategy: Arc<dyn EffectStrategy>) -> &mut Self {
        self.strategies.insert(strategy.category(), strategy);
        self
    }

    pub fn get(&self, category: EffectCategory) -> Option<&Arc<dyn EffectStrategy>> {
        self.strategies.get(&category)
    }

    /// Fails on the first spec whose category has no strategy.
    pub fn ensure_supported(&self, effect: &RogueEffect) -> Result<(), EffectError> {
        match effect
            .effects
            .iter()
            .find(|spec| !self.strategies.contains_key(&spec.category))
        {
            Some(spec) => Err(EffectError::MissingStrategy {
                effect: effect.id.clone(),
                category: spec.category,
            }),
            None => Ok(()),
        }
    }

    /// Writes every spec of `effect` at its current use count.
    pub fn apply(&self, effect: &RogueEffect, stats: &mut StatBlock) -> Result<(), EffectError> {
        self.ensure_supported(effect)?;
        for (index, spec) in effect.effects.iter().enumerate() {
            if let Some(strategy) = self.strategies.get(&spec.category) {
                strategy.apply(stats, &effect.contribution_id(index), spec, effect.uses);
            }
        }
        Ok(())
    }

    /// Removes every contribution `effect` wrote. Returns the number removed.
    pub fn revoke(&self, effect: &RogueEffect, stats: &mut StatBlock) -> usize {
        let mut removed = 0;
        for (index, spec) in effect.effects.iter().enumerate() {
            let Some(strategy) = self.strategies.get(&spec.category) else {
                continue;
            };
            if strategy.revoke(stats, &effect.contribution_id(index)) {
                removed += 1;
            }
        }
        removed
    }
}

impl core::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.strategies.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gacha::Tier;
    use crate::stats::{BaseStats, OperatorKind};

    fn stats() -> StatBlock {
        StatBlock::from_base(&BaseStats {
            damage: 10.0,
            max_hp: 100.0,
            attack_speed: 1.0,
            move_speed: 2.0,
        })
    }

    #[test]
    fn apply_and_revoke_route_to_stat_ledgers() {
        let mut effect = RogueEffect::new("edge", "Edge", Tier::Common)
            .with_effect(EffectSpec::new(EffectCategory::Damage, 5.0, OperatorKind::Add))
            .with_effect(EffectSpec::new(EffectCategory::MoveSpeed, 1.5, OperatorKind::Multiply));
        effect.uses = 2;

        let registry = EffectRegistry::with_defaults();
        let mut block = stats();
        registry.apply(&effect, &mut block).unwrap();

        assert_eq!(block.damage(), 20.0);
        assert_eq!(block.move_speed(), 4.5);
        assert!(block.ledger(StatKind::Damage).has_formula("rogue:edge:0"));

        assert_eq!(registry.revoke(&effect, &mut block), 2);
        assert_eq!(block.damage(), 10.0);
        assert_eq!(block.move_speed(), 2.0);
    }

    #[test]
    fn missing_strategy_is_reported_before_any_write() {
        let mut registry = EffectRegistry::new();
        registry.register(Arc::new(StatEffect::new(EffectCategory::Damage, StatKind::Damage)));

        let mut effect = RogueEffect::new("mixed", "Mixed", Tier::Rare)
            .with_effect(EffectSpec::new(EffectCategory::Damage, 5.0, OperatorKind::Add))
            .with_effect(EffectSpec::new(EffectCategory::AttackSpeed, 10.0, OperatorKind::AddPercent));
        effect.uses = 1;

        let mut block = stats();
        let err = registry.apply(&effect, &mut block).unwrap_err();
        assert_eq!(
            err,
            EffectError::MissingStrategy {
                effect: "mixed".into(),
                category: EffectCategory::AttackSpeed
            }
        );
        assert_eq!(block.damage(), 10.0);
    }
}
