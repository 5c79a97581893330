//! Unit definitions: archetype, base stats, and per-level growth.

use tactics_core::{
    Archetype, BaseStats, CombatActor, CombatConfig, OperatorKind, StatBlock, StatKind, Team,
    UnitHost, UnitId,
};

/// Multiplicative growth per level above 1 (1.0 = no growth).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelGrowth {
    pub damage: f64,
    pub max_hp: f64,
    pub attack_speed: f64,
}

impl Default for LevelGrowth {
    fn default() -> Self {
        Self {
            damage: 1.0,
            max_hp: 1.0,
            attack_speed: 1.0,
        }
    }
}

impl LevelGrowth {
    /// Growth rate for `kind`. Move speed never grows.
    pub fn rate(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Damage => self.damage,
            StatKind::MaxHp => self.max_hp,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::MoveSpeed => 1.0,
        }
    }

    /// Initial-percent bonus at `level`: `(rate^(level-1) - 1) * 100`.
    pub fn percent_bonus(&self, kind: StatKind, level: u32) -> f64 {
        if level <= 1 {
            return 0.0;
        }
        let exponent = i32::try_from(level - 1).unwrap_or(i32::MAX);
        (self.rate(kind).powi(exponent) - 1.0) * 100.0
    }
}

/// Designer-authored unit template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub archetype: Archetype,
    pub base: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub growth: LevelGrowth,
}

impl UnitDefinition {
    /// Seeds a stat block for `level`.
    ///
    /// Each ledger gets the base value under `"base"` and, above level 1, an
    /// `AddInitialPercent` contribution under `"level"`.
    pub fn stat_block(&self, level: u32) -> StatBlock {
        let mut stats = StatBlock::from_base(&self.base);
        for kind in [StatKind::Damage, StatKind::MaxHp, StatKind::AttackSpeed] {
            stats.add(
                kind,
                CombatConfig::LEVEL_CONTRIBUTION_ID,
                self.growth.percent_bonus(kind, level),
                OperatorKind::AddInitialPercent,
            );
        }
        stats
    }

    /// Builds an (uninitialized) actor of this unit at `level`.
    pub fn spawn<H: UnitHost>(
        &self,
        id: UnitId,
        team: Team,
        level: u32,
        host: H,
        config: &CombatConfig,
    ) -> CombatActor<H> {
        CombatActor::new(id, team, self.archetype, self.stat_block(level), host, config)
    }
}
