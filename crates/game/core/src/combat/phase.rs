//! Execution phases for modifier ordering.
//!
//! Phases are coarse buckets; priorities order modifiers within a phase
//! (higher first).

/// Phase of a damage modifier.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamagePhase {
    /// Outgoing amplification (rage, crits).
    #[default]
    PreHit = 0,

    /// Armor, shields, damage reduction.
    Mitigation = 1,

    /// On-hit effects (lifesteal, thorns, procs).
    PostHit = 2,
}

/// Phase of a heal modifier.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HealPhase {
    PreHeal = 0,

    /// Blessings, healing-received bonuses, anti-heal.
    #[default]
    Amplification = 1,

    PostHeal = 2,
}
