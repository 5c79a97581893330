//! Roguelike reward pool: tiered draws over effects that retire once used up.

use rand::Rng;
use tracing::debug;

use crate::config::CombatConfig;
use crate::gacha::{DrawMode, Tier, TieredPool};
use crate::stats::StatBlock;

use super::EffectError;
use super::activation::ActivationOutcome;
use super::constraint::ConstraintOracle;
use super::model::RogueEffect;
use super::strategy::EffectRegistry;

#[derive(Clone, Debug)]
struct Slot {
    effect: RogueEffect,
    weight: f64,
}

/// Offers random effect choices and applies the chosen one.
///
/// The pool owns its own copy of every effect (use counts are per run).
/// Draws are keyed by effect id; exhausted effects are removed from the
/// draw pool but stay queryable through [`get`](Self::get).
#[derive(Clone, Debug)]
pub struct RoguelikePool {
    slots: Vec<Slot>,
    draws: TieredPool<String>,
    tier_weights: Vec<(Tier, f64)>,
    choice_count: usize,
}

impl RoguelikePool {
    pub fn new(mode: DrawMode, tier_weights: Vec<(Tier, f64)>, config: &CombatConfig) -> Self {
        Self {
            slots: Vec::new(),
            draws: TieredPool::new(mode).with_tier_weights(tier_weights.iter().copied()),
            tier_weights,
            choice_count: config.choice_count,
        }
    }

    /// Adds (or replaces) an effect with draw weight `weight`.
    pub fn add_effect(&mut self, effect: RogueEffect, weight: f64) {
        if let Some(index) = self.slots.iter().position(|slot| slot.effect.id == effect.id) {
            let old = self.slots.remove(index);
            self.draws.remove(&old.effect.id, old.effect.tier);
        }
        if !effect.is_exhausted() {
            self.draws.insert(effect.id.clone(), effect.tier, weight);
        }
        self.slots.push(Slot { effect, weight });
    }

    /// Removes an effect entirely. Returns false if unknown.
    pub fn remove_effect(&mut self, id: &str) -> bool {
        let Some(index) = self.slots.iter().position(|slot| slot.effect.id == id) else {
            return false;
        };
        let slot = self.slots.remove(index);
        self.draws.remove(&slot.effect.id, slot.effect.tier);
        true
    }

    /// Draws the configured number of choices.
    pub fn offer<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<&RogueEffect> {
        self.offer_n(self.choice_count, rng)
    }

    /// Draws up to `count` choices.
    pub fn offer_n<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<&RogueEffect> {
        let ids = self.draws.draw(count, rng);
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Activates the chosen effect and retires it from draws once exhausted.
    pub fn select(
        &mut self,
        id: &str,
        oracle: &mut dyn ConstraintOracle,
        registry: &EffectRegistry,
        stats: &mut StatBlock,
    ) -> Result<ActivationOutcome, EffectError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.effect.id == id)
            .ok_or_else(|| EffectError::UnknownEffect { id: id.to_owned() })?;

        let outcome = slot.effect.activate(oracle, registry, stats)?;
        if let ActivationOutcome::Applied {
            exhausted: true, ..
        } = outcome
        {
            self.draws.remove(&slot.effect.id, slot.effect.tier);
            debug!(target: "tactics_core::effect", effect = id, "effect retired from pool");
        }
        Ok(outcome)
    }

    /// Switches tier rolling on or off, re-bucketing every live effect.
    pub fn set_use_tiers(&mut self, use_tiers: bool) {
        let mut mode = self.draws.mode();
        if mode.use_tiers == use_tiers {
            return;
        }
        mode.use_tiers = use_tiers;
        self.rebuild(mode);
    }

    pub fn set_each_tier(&mut self, each_tier: bool) {
        self.draws.set_each_tier(each_tier);
    }

    pub fn set_allow_duplicates(&mut self, allow_duplicates: bool) {
        self.draws.set_allow_duplicates(allow_duplicates);
    }

    pub fn get(&self, id: &str) -> Option<&RogueEffect> {
        self.slots
            .iter()
            .find(|slot| slot.effect.id == id)
            .map(|slot| &slot.effect)
    }

    pub fn effects(&self) -> impl Iterator<Item = &RogueEffect> {
        self.slots.iter().map(|slot| &slot.effect)
    }

    /// Effects still eligible for draws.
    pub fn available(&self) -> usize {
        self.draws.len()
    }

    pub fn attempts(&self) -> u64 {
        self.draws.attempts()
    }

    pub fn mode(&self) -> DrawMode {
        self.draws.mode()
    }

    fn rebuild(&mut self, mode: DrawMode) {
        let attempts = self.draws.attempts();
        let mut draws =
            TieredPool::new(mode).with_tier_weights(self.tier_weights.iter().copied());
        for slot in self.slots.iter().filter(|slot| !slot.effect.is_exhausted()) {
            draws.insert(slot.effect.id.clone(), slot.effect.tier, slot.weight);
        }
        draws.restore_attempts(attempts);
        self.draws = draws;
    }
}
