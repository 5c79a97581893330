use crate::combat::{Hit, HitModifier, ModifierPipeline};
use crate::types::UnitId;

/// Offensive half of a combat actor: folds outgoing hits through the
/// offense pipeline before they reach the target's defender.
#[derive(Debug, Default)]
pub struct Attacker {
    offense: ModifierPipeline<Hit>,
}

impl Attacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hit for `damage` and folds the offense modifiers over it.
    pub fn strike(&mut self, source: UnitId, target: UnitId, damage: f64) -> Hit {
        self.offense.apply(Hit::new(source, target, damage))
    }

    pub fn add_modifier(&mut self, modifier: HitModifier) {
        self.offense.add(modifier);
    }

    pub fn remove_modifier(&mut self, modifier: &HitModifier) -> bool {
        self.offense.remove(modifier)
    }

    pub fn clear_modifiers(&mut self) {
        self.offense.clear();
    }

    pub fn modifiers(&self) -> &ModifierPipeline<Hit> {
        &self.offense
    }
}
