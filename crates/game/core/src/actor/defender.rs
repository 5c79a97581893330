//! Defensive half of a combat actor: hit points and incoming pipelines.

use tracing::{debug, trace};

use crate::combat::{Heal, HealModifier, Hit, HitModifier, ModifierPipeline};
use crate::observer::{Observers, SubscriptionId};
use crate::stats::nearly_equal;
use crate::types::UnitId;

/// Result of committing a hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// Folded damage was ≤ 0; nothing changed and no callbacks ran.
    Mitigated,
    Damaged { amount: f64, remaining_hp: f64 },
    /// This hit brought HP to 0.
    Killed { amount: f64 },
    /// The defender was already dead; the hit was dropped unfolded.
    TargetDead,
}

impl DamageOutcome {
    pub fn is_kill(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }

    /// Damage committed to HP (0 unless the hit landed).
    pub fn amount(&self) -> f64 {
        match self {
            Self::Damaged { amount, .. } | Self::Killed { amount } => *amount,
            Self::Mitigated | Self::TargetDead => 0.0,
        }
    }
}

/// Result of committing a heal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HealOutcome {
    /// Folded amount was ≤ 0; nothing changed and no callbacks ran.
    Nullified,
    Healed { amount: f64, current_hp: f64 },
    TargetDead,
}

/// Hit points plus the defense and healing pipelines of one unit.
///
/// Max HP is owned by the unit's stat ledger; the owner pushes changes in
/// with [`set_max_hp`](Self::set_max_hp).
#[derive(Debug, Default)]
pub struct Defender {
    current_hp: f64,
    max_hp: f64,
    dead: bool,
    defense: ModifierPipeline<Hit>,
    healing: ModifierPipeline<Heal>,
    on_hp_changed: Observers<f64>,
    on_max_hp_changed: Observers<f64>,
    on_death: Observers<UnitId>,
}

impl Defender {
    /// Creates a defender at full health.
    pub fn new(max_hp: f64) -> Self {
        Self {
            current_hp: max_hp.max(0.0),
            max_hp: max_hp.max(0.0),
            ..Self::default()
        }
    }

    /// Folds the defense pipeline over `hit` and commits the result.
    ///
    /// HP is clamped at 0. Post-callbacks run after HP changes and before
    /// death observers fire.
    pub fn receive_hit(&mut self, hit: Hit) -> DamageOutcome {
        if self.dead {
            trace!(target: "tactics_core::actor", defender = %hit.defender, "hit on dead defender dropped");
            return DamageOutcome::TargetDead;
        }

        let hit = self.defense.apply(hit);
        if hit.final_damage <= 0.0 {
            trace!(
                target: "tactics_core::actor",
                attacker = %hit.attacker,
                defender = %hit.defender,
                final_damage = hit.final_damage,
                "hit fully mitigated"
            );
            return DamageOutcome::Mitigated;
        }

        let amount = hit.final_damage;
        self.current_hp = (self.current_hp - amount).max(0.0);
        self.on_hp_changed.notify(&self.current_hp);
        hit.post_callbacks.run();

        if self.current_hp > 0.0 {
            return DamageOutcome::Damaged {
                amount,
                remaining_hp: self.current_hp,
            };
        }

        self.dead = true;
        debug!(
            target: "tactics_core::actor",
            attacker = %hit.attacker,
            defender = %hit.defender,
            amount,
            "defender killed"
        );
        self.on_death.notify(&hit.defender);
        DamageOutcome::Killed { amount }
    }

    /// Folds the healing pipeline over `heal` and commits the result.
    ///
    /// HP is clamped at max HP. Dead defenders cannot be healed.
    pub fn receive_heal(&mut self, heal: Heal) -> HealOutcome {
        if self.dead {
            return HealOutcome::TargetDead;
        }

        let heal = self.healing.apply(heal);
        if heal.final_amount <= 0.0 {
            return HealOutcome::Nullified;
        }

        let amount = heal.final_amount;
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
        self.on_hp_changed.notify(&self.current_hp);
        heal.post_callbacks.run();

        HealOutcome::Healed {
            amount,
            current_hp: self.current_hp,
        }
    }

    /// Restores full HP and clears the dead flag.
    pub fn reset_hp(&mut self) {
        self.current_hp = self.max_hp;
        self.dead = false;
        self.on_max_hp_changed.notify(&self.max_hp);
        self.on_hp_changed.notify(&self.current_hp);
    }

    /// Updates max HP, clamping current HP down if needed.
    pub fn set_max_hp(&mut self, max_hp: f64) {
        let max_hp = max_hp.max(0.0);
        if nearly_equal(max_hp, self.max_hp) {
            return;
        }

        self.max_hp = max_hp;
        self.on_max_hp_changed.notify(&self.max_hp);
        if self.current_hp > max_hp {
            self.current_hp = max_hp;
            self.on_hp_changed.notify(&self.current_hp);
        }
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn max_hp(&self) -> f64 {
        self.max_hp
    }

    /// `current / max`, or 0 when max HP is 0.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp > 0.0 {
            self.current_hp / self.max_hp
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn add_defense_modifier(&mut self, modifier: HitModifier) {
        self.defense.add(modifier);
    }

    pub fn remove_defense_modifier(&mut self, modifier: &HitModifier) -> bool {
        self.defense.remove(modifier)
    }

    pub fn clear_defense_modifiers(&mut self) {
        self.defense.clear();
    }

    pub fn add_heal_modifier(&mut self, modifier: HealModifier) {
        self.healing.add(modifier);
    }

    pub fn remove_heal_modifier(&mut self, modifier: &HealModifier) -> bool {
        self.healing.remove(modifier)
    }

    pub fn clear_heal_modifiers(&mut self) {
        self.healing.clear();
    }

    pub fn defense_modifiers(&self) -> &ModifierPipeline<Hit> {
        &self.defense
    }

    pub fn heal_modifiers(&self) -> &ModifierPipeline<Heal> {
        &self.healing
    }

    pub fn subscribe_hp_changed(
        &mut self,
        callback: impl FnMut(&f64) + Send + 'static,
    ) -> SubscriptionId {
        self.on_hp_changed.subscribe(callback)
    }

    pub fn unsubscribe_hp_changed(&mut self, id: SubscriptionId) -> bool {
        self.on_hp_changed.unsubscribe(id)
    }

    pub fn subscribe_max_hp_changed(
        &mut self,
        callback: impl FnMut(&f64) + Send + 'static,
    ) -> SubscriptionId {
        self.on_max_hp_changed.subscribe(callback)
    }

    pub fn unsubscribe_max_hp_changed(&mut self, id: SubscriptionId) -> bool {
        self.on_max_hp_changed.unsubscribe(id)
    }

    pub fn subscribe_death(
        &mut self,
        callback: impl FnMut(&UnitId) + Send + 'static,
    ) -> SubscriptionId {
        self.on_death.subscribe(callback)
    }

    pub fn unsubscribe_death(&mut self, id: SubscriptionId) -> bool {
        self.on_death.unsubscribe(id)
    }

    /// Drops every HP, max HP, and death subscription.
    pub fn clear_subscriptions(&mut self) {
        self.on_hp_changed.clear();
        self.on_max_hp_changed.clear();
        self.on_death.clear();
    }
}
