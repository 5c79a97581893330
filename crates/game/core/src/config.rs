/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Number of roguelike effects offered per draw.
    pub choice_count: usize,
    /// Use limit assigned to effects that do not declare one.
    pub default_effect_limit: u32,
    /// Ticks a dead unit lingers before it reports itself despawned.
    pub despawn_delay_ticks: u32,
    /// Weight used when pool seed data omits one.
    pub default_pool_weight: f64,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Tolerance for neutral-element detection in formula ledgers.
    pub const NEUTRAL_EPSILON: f64 = 1e-4;
    /// Contribution id used for a ledger's seeded base value.
    pub const BASE_CONTRIBUTION_ID: &'static str = "base";
    /// Contribution id used for level growth.
    pub const LEVEL_CONTRIBUTION_ID: &'static str = "level";

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CHOICE_COUNT: usize = 3;
    pub const DEFAULT_EFFECT_LIMIT: u32 = 99;
    pub const DEFAULT_DESPAWN_DELAY_TICKS: u32 = 2;
    pub const DEFAULT_POOL_WEIGHT: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            choice_count: Self::DEFAULT_CHOICE_COUNT,
            default_effect_limit: Self::DEFAULT_EFFECT_LIMIT,
            despawn_delay_ticks: Self::DEFAULT_DESPAWN_DELAY_TICKS,
            default_pool_weight: Self::DEFAULT_POOL_WEIGHT,
        }
    }

    pub fn with_despawn_delay(mut self, ticks: u32) -> Self {
        self.despawn_delay_ticks = ticks;
        self
    }

    pub fn with_choice_count(mut self, count: usize) -> Self {
        self.choice_count = count;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
