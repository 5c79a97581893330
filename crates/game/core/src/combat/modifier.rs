//! Modifier trait and the stock modifiers used by buffs and gear.

use core::fmt;
use std::sync::Arc;

use super::event::{CombatEvent, Heal, Hit};
use super::phase::{DamagePhase, HealPhase};

/// A transform applied to a combat event in (phase, priority) order.
///
/// Modifiers are owned by an actor or a buff lifetime and shared with the
/// pipeline as `Arc` handles; removal is by handle identity.
pub trait Modifier<E: CombatEvent>: Send + Sync {
    /// Display name (e.g. "Rage").
    fn name(&self) -> &str;

    /// Grouping tag (e.g. "Buff:Rage"), used for bulk removal.
    fn tag(&self) -> &str;

    /// Ordering within a phase; higher values apply first.
    fn priority(&self) -> i32 {
        0
    }

    fn phase(&self) -> E::Phase;

    /// Folds this modifier into the event.
    fn apply(&self, event: E) -> E;
}

/// Damage modifier handle.
pub type HitModifier = Arc<dyn Modifier<Hit>>;

/// Heal modifier handle.
pub type HealModifier = Arc<dyn Modifier<Heal>>;

/// Outgoing damage multiplier.
#[derive(Clone, Debug)]
pub struct RageBuff {
    multiplier: f64,
}

impl RageBuff {
    pub const PRIORITY: i32 = 100;

    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }
}

impl Modifier<Hit> for RageBuff {
    fn name(&self) -> &str {
        "Rage"
    }

    fn tag(&self) -> &str {
        "Buff:Rage"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn phase(&self) -> DamagePhase {
        DamagePhase::PreHit
    }

    fn apply(&self, mut hit: Hit) -> Hit {
        hit.final_damage *= self.multiplier;
        hit
    }
}

/// Flat damage reduction applied during mitigation.
#[derive(Clone, Debug)]
pub struct ArmorModifier {
    armor: f64,
}

impl ArmorModifier {
    pub fn new(armor: f64) -> Self {
        Self { armor }
    }
}

impl Modifier<Hit> for ArmorModifier {
    fn name(&self) -> &str {
        "Armor"
    }

    fn tag(&self) -> &str {
        "Gear:Armor"
    }

    fn phase(&self) -> DamagePhase {
        DamagePhase::Mitigation
    }

    fn apply(&self, mut hit: Hit) -> Hit {
        hit.final_damage -= self.armor;
        hit
    }
}

/// Healing-received multiplier.
#[derive(Clone, Debug)]
pub struct BlessingBuff {
    multiplier: f64,
}

impl BlessingBuff {
    pub const PRIORITY: i32 = 100;

    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }
}

impl Modifier<Heal> for BlessingBuff {
    fn name(&self) -> &str {
        "Blessing"
    }

    fn tag(&self) -> &str {
        "Buff:Blessing"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn phase(&self) -> HealPhase {
        HealPhase::Amplification
    }

    fn apply(&self, mut heal: Heal) -> Heal {
        heal.final_amount *= self.multiplier;
        heal
    }
}

/// Closure-backed modifier for scripted effects.
///
/// # Example
/// ```
/// # use tactics_core::combat::{DamagePhase, FnModifier, Hit, Modifier};
/// # use tactics_core::UnitId;
/// let execute = FnModifier::new("Execute", "Skill:Execute", DamagePhase::PostHit, |mut hit: Hit| {
///     hit.final_damage += 10.0;
///     hit
/// })
/// .with_priority(5);
///
/// let hit = execute.apply(Hit::new(UnitId(1), UnitId(2), 1.0));
/// assert_eq!(hit.final_damage, 11.0);
/// ```
pub struct FnModifier<E: CombatEvent, F> {
    name: String,
    tag: String,
    priority: i32,
    phase: E::Phase,
    apply: F,
}

impl<E, F> FnModifier<E, F>
where
    E: CombatEvent,
    F: Fn(E) -> E + Send + Sync,
{
    pub fn new(name: impl Into<String>, tag: impl Into<String>, phase: E::Phase, apply: F) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            priority: 0,
            phase,
            apply,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<E, F> Modifier<E> for FnModifier<E, F>
where
    E: CombatEvent,
    F: Fn(E) -> E + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn phase(&self) -> E::Phase {
        self.phase
    }

    fn apply(&self, event: E) -> E {
        (self.apply)(event)
    }
}

impl<E: CombatEvent, F> fmt::Debug for FnModifier<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModifier")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("priority", &self.priority)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnitId;

    #[test]
    fn stock_modifiers() {
        let hit = Hit::new(UnitId(1), UnitId(2), 10.0);
        let hit = RageBuff::new(1.5).apply(hit);
        assert_eq!(hit.final_damage, 15.0);
        let hit = ArmorModifier::new(4.0).apply(hit);
        assert_eq!(hit.final_damage, 11.0);
        assert_eq!(hit.base_damage, 10.0);

        let heal = BlessingBuff::new(2.0).apply(Heal::new(UnitId(1), UnitId(1), 3.0));
        assert_eq!(heal.final_amount, 6.0);
    }
}
