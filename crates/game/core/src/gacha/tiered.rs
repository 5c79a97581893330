//! Rarity-tiered draw pools.

use std::collections::BTreeMap;

use rand::Rng;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use super::selector::WeightedSelector;

/// Rarity bucket.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tier {
    #[default]
    Common,
    Rare,
    Unique,
}

/// How a [`TieredPool`] turns one request into draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawMode {
    /// Roll a tier first. When off, everything lives in (and is drawn from)
    /// [`Tier::Common`].
    pub use_tiers: bool,
    /// Roll a tier per requested slot instead of once per request.
    pub each_tier: bool,
    pub allow_duplicates: bool,
}

impl Default for DrawMode {
    fn default() -> Self {
        Self {
            use_tiers: true,
            each_tier: false,
            allow_duplicates: false,
        }
    }
}

/// A tier selector plus one weighted pool per tier.
#[derive(Clone, Debug)]
pub struct TieredPool<T> {
    tiers: WeightedSelector<Tier>,
    pools: BTreeMap<Tier, WeightedSelector<T>>,
    mode: DrawMode,
    attempts: u64,
}

impl<T: PartialEq + Clone> TieredPool<T> {
    pub fn new(mode: DrawMode) -> Self {
        Self {
            tiers: WeightedSelector::new(),
            pools: Tier::iter().map(|tier| (tier, WeightedSelector::new())).collect(),
            mode,
            attempts: 0,
        }
    }

    /// Sets the tier selector's weights, e.g. `[(Common, 70.0), (Rare, 25.0), (Unique, 5.0)]`.
    pub fn with_tier_weights(mut self, weights: impl IntoIterator<Item = (Tier, f64)>) -> Self {
        self.tiers = weights.into_iter().collect();
        self
    }

    /// Adds `item` to its tier's pool (to `Common` when tiers are off).
    pub fn insert(&mut self, item: T, tier: Tier, weight: f64) {
        let tier = self.bucket(tier);
        self.pools.entry(tier).or_default().add(item, weight);
    }

    /// Removes `item` from its tier's pool. Returns false if absent.
    pub fn remove(&mut self, item: &T, tier: Tier) -> bool {
        let tier = self.bucket(tier);
        self.pools
            .get_mut(&tier)
            .is_some_and(|pool| pool.remove(item))
    }

    /// Draws up to `count` items according to the pool's [`DrawMode`].
    ///
    /// Every call counts as one attempt, even if nothing could be drawn.
    pub fn draw<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<T> {
        self.attempts += 1;
        let DrawMode {
            use_tiers,
            each_tier,
            allow_duplicates,
        } = self.mode;

        if !use_tiers {
            return self.draw_from(Tier::Common, count, allow_duplicates, rng);
        }

        if !each_tier {
            let Some(tier) = self.tiers.pick_one(rng).copied() else {
                warn!(target: "tactics_core::gacha", "tier selector is empty");
                return Vec::new();
            };
            return self.draw_from(tier, count, allow_duplicates, rng);
        }

        // Tally slots per tier, keeping first-rolled order.
        let mut slots: Vec<(Tier, usize)> = Vec::new();
        for _ in 0..count {
            let Some(&tier) = self.tiers.pick_one(rng) else {
                warn!(target: "tactics_core::gacha", "tier selector is empty");
                return Vec::new();
            };
            match slots.iter_mut().find(|(rolled, _)| *rolled == tier) {
                Some((_, n)) => *n += 1,
                None => slots.push((tier, 1)),
            }
        }

        slots
            .into_iter()
            .flat_map(|(tier, n)| self.draw_from(tier, n, allow_duplicates, rng))
            .collect()
    }

    fn draw_from<R: Rng + ?Sized>(
        &self,
        tier: Tier,
        count: usize,
        allow_duplicates: bool,
        rng: &mut R,
    ) -> Vec<T> {
        let picks = self
            .pools
            .get(&tier)
            .map(|pool| pool.pick_many(count, allow_duplicates, rng))
            .unwrap_or_default();
        debug!(
            target: "tactics_core::gacha",
            %tier,
            requested = count,
            drawn = picks.len(),
            "tier draw"
        );
        picks
    }

    fn bucket(&self, tier: Tier) -> Tier {
        if self.mode.use_tiers { tier } else { Tier::Common }
    }
}

impl<T> TieredPool<T> {
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_each_tier(&mut self, each_tier: bool) {
        self.mode.each_tier = each_tier;
    }

    pub fn set_allow_duplicates(&mut self, allow_duplicates: bool) {
        self.mode.allow_duplicates = allow_duplicates;
    }

    /// Number of [`draw`](TieredPool::draw) calls so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Carries an attempt count over into a rebuilt pool.
    pub fn restore_attempts(&mut self, attempts: u64) {
        self.attempts = attempts;
    }

    pub fn tier_selector(&self) -> &WeightedSelector<Tier> {
        &self.tiers
    }

    pub fn pool(&self, tier: Tier) -> Option<&WeightedSelector<T>> {
        self.pools.get(&tier)
    }

    /// Total number of entries across all tiers.
    pub fn len(&self) -> usize {
        self.pools.values().map(WeightedSelector::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(WeightedSelector::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    fn stocked(mode: DrawMode) -> TieredPool<&'static str> {
        let mut pool = TieredPool::new(mode)
            .with_tier_weights([(Tier::Common, 1.0), (Tier::Rare, 0.0), (Tier::Unique, 0.0)]);
        pool.insert("sharpen", Tier::Common, 1.0);
        pool.insert("haste", Tier::Common, 1.0);
        pool.insert("crown", Tier::Unique, 1.0);
        pool
    }

    #[test]
    fn tier_roll_restricts_draw_to_one_tier() {
        let mut pool = stocked(DrawMode::default());
        let mut rng = PcgRng::new(4);

        let mut picks = pool.draw(5, &mut rng);
        picks.sort();
        assert_eq!(picks, ["haste", "sharpen"]);
        assert_eq!(pool.attempts(), 1);
    }

    #[test]
    fn tiers_off_buckets_everything_as_common() {
        let mut pool = stocked(DrawMode {
            use_tiers: false,
            ..DrawMode::default()
        });
        let mut rng = PcgRng::new(8);

        assert_eq!(pool.pool(Tier::Unique).map(WeightedSelector::len), Some(0));
        assert_eq!(pool.draw(5, &mut rng).len(), 3);
        assert!(pool.remove(&"crown", Tier::Unique));
    }

    #[test]
    fn each_tier_groups_slots_per_rolled_tier() {
        let mut pool = TieredPool::new(DrawMode {
            each_tier: true,
            allow_duplicates: true,
            ..DrawMode::default()
        })
        .with_tier_weights([(Tier::Rare, 1.0)]);
        pool.insert("shield", Tier::Rare, 1.0);
        let mut rng = PcgRng::new(15);

        assert_eq!(pool.draw(3, &mut rng), ["shield", "shield", "shield"]);
    }

    #[test]
    fn empty_tier_selector_draws_nothing() {
        let mut pool = TieredPool::new(DrawMode::default());
        pool.insert(1u8, Tier::Common, 1.0);
        let mut rng = PcgRng::new(2);

        assert!(pool.draw(2, &mut rng).is_empty());
        assert_eq!(pool.attempts(), 1);
        assert_eq!(pool.len(), 1);
    }
}
