//! Roguelike effect records.

use core::fmt;

use crate::config::CombatConfig;
use crate::gacha::Tier;
use crate::stats::OperatorKind;

/// Stat family an effect modifies.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum EffectCategory {
    Damage,
    AttackSpeed,
    MoveSpeed,
}

/// One stat change granted per use of an effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub category: EffectCategory,
    pub value: f64,
    pub kind: OperatorKind,
}

impl EffectSpec {
    pub fn new(category: EffectCategory, value: f64, kind: OperatorKind) -> Self {
        Self {
            category,
            value,
            kind,
        }
    }

    /// Contribution value after `uses` stacks.
    ///
    /// Multipliers compound; every other kind scales linearly.
    pub fn stacked_value(&self, uses: u32) -> f64 {
        match self.kind {
            OperatorKind::Multiply => self.value.powi(i32::try_from(uses).unwrap_or(i32::MAX)),
            _ => self.value * f64::from(uses),
        }
    }
}

impl fmt::Display for EffectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OperatorKind::Multiply => write!(f, "{} x{}", self.category, self.value),
            OperatorKind::AddInitialPercent | OperatorKind::AddPercent => {
                write!(f, "{} {:+}% ({})", self.category, self.value, self.kind)
            }
            OperatorKind::AddInitial | OperatorKind::Add => {
                write!(f, "{} {:+} ({})", self.category, self.value, self.kind)
            }
        }
    }
}

/// Kind of precondition an effect carries.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConstraintKind {
    /// Requires (and spends) `amount` of the named currency.
    Currency,
    /// Requires the player level to be at least `amount`.
    Level,
    /// Requires owning at least `amount` units of the named kind.
    Unit,
}

/// A precondition checked before an effect activates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub name: String,
    pub amount: u32,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, name: impl Into<String>, amount: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            amount,
        }
    }

    pub fn currency(name: impl Into<String>, amount: u32) -> Self {
        Self::new(ConstraintKind::Currency, name, amount)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} >= {}", self.kind, self.name, self.amount)
    }
}

/// A roguelike reward: stat changes gated by constraints, usable up to
/// `limit` times.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RogueEffect {
    pub id: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: Tier,
    pub effects: Vec<EffectSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,
    #[cfg_attr(feature = "serde", serde(default = "default_limit"))]
    pub limit: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub uses: u32,
}

#[cfg(feature = "serde")]
fn default_limit() -> u32 {
    CombatConfig::DEFAULT_EFFECT_LIMIT
}

impl RogueEffect {
    pub const CONTRIBUTION_PREFIX: &'static str = "rogue";

    pub fn new(id: impl Into<String>, title: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tier,
            effects: Vec::new(),
            constraints: Vec::new(),
            limit: CombatConfig::DEFAULT_EFFECT_LIMIT,
            uses: 0,
        }
    }

    pub fn with_effect(mut self, spec: EffectSpec) -> Self {
        self.effects.push(spec);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the use limit; 0 falls back to the default limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = if limit == 0 {
            CombatConfig::DEFAULT_EFFECT_LIMIT
        } else {
            limit
        };
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.uses >= self.limit
    }

    pub fn remaining_uses(&self) -> u32 {
        self.limit.saturating_sub(self.uses)
    }

    /// Ledger id of the contribution granted by `effects[index]`.
    pub fn contribution_id(&self, index: usize) -> String {
        format!("{}:{}:{index}", Self::CONTRIBUTION_PREFIX, self.id)
    }

    /// Prefix shared by every contribution this effect grants.
    pub fn contribution_prefix(&self) -> String {
        format!("{}:{}:", Self::CONTRIBUTION_PREFIX, self.id)
    }

    /// One line per granted stat change.
    pub fn description(&self) -> String {
        self.effects
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
