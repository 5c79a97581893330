//! Ordered modifier pipeline.
//!
//! This module coordinates the fold of registered modifiers over one event:
//! 1. Sort modifiers by phase (ascending) and priority (descending)
//! 2. Pass the event by value through each modifier in order
//! 3. Return the folded event to the consumer
//!
//! ## Design Principles
//!
//! - **Deterministic**: Ties on (phase, priority) keep registration order
//! - **Lazy ordering**: The sorted order is rebuilt only after `add`/`remove`/`clear`
//! - **Pure transform**: The pipeline never commits amounts or runs callbacks;
//!   the consumer does, and only for amounts > 0

use std::sync::Arc;

use tracing::trace;

use super::event::CombatEvent;
use super::modifier::Modifier;

/// Registered modifiers for one event kind, with a cached application order.
pub struct ModifierPipeline<E: CombatEvent> {
    modifiers: Vec<Arc<dyn Modifier<E>>>,
    sorted: Vec<Arc<dyn Modifier<E>>>,
    dirty: bool,
}

impl<E: CombatEvent> ModifierPipeline<E> {
    pub fn new() -> Self {
        Self {
            modifiers: Vec::new(),
            sorted: Vec::new(),
            dirty: false,
        }
    }

    /// Registers a modifier. The same handle may be registered more than once.
    pub fn add(&mut self, modifier: Arc<dyn Modifier<E>>) {
        trace!(
            target: "tactics_core::pipeline",
            name = modifier.name(),
            phase = %modifier.phase(),
            priority = modifier.priority(),
            "modifier added"
        );
        self.modifiers.push(modifier);
        self.dirty = true;
    }

    /// Removes the first registration of `modifier` (by handle identity).
    ///
    /// Returns false if the handle was not registered.
    pub fn remove(&mut self, modifier: &Arc<dyn Modifier<E>>) -> bool {
        let Some(index) = self
            .modifiers
            .iter()
            .position(|registered| same_handle(registered, modifier))
        else {
            return false;
        };

        self.modifiers.remove(index);
        self.dirty = true;
        true
    }

    /// Removes every modifier carrying `tag`. Returns the number removed.
    pub fn remove_by_tag(&mut self, tag: &str) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|modifier| modifier.tag() != tag);
        let removed = before - self.modifiers.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
        self.sorted.clear();
        self.dirty = false;
    }

    /// Folds every modifier over `event` in (phase ↑, priority ↓) order.
    pub fn apply(&mut self, event: E) -> E {
        self.refresh_order();
        self.sorted
            .iter()
            .fold(event, |event, modifier| modifier.apply(event))
    }

    /// Modifiers in application order.
    pub fn ordered(&mut self) -> &[Arc<dyn Modifier<E>>] {
        self.refresh_order();
        &self.sorted
    }

    /// Modifiers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Modifier<E>>> {
        self.modifiers.iter()
    }

    pub fn contains(&self, modifier: &Arc<dyn Modifier<E>>) -> bool {
        self.modifiers
            .iter()
            .any(|registered| same_handle(registered, modifier))
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    fn refresh_order(&mut self) {
        if !self.dirty {
            return;
        }

        let mut sorted = self.modifiers.clone();
        // `sort_by` is stable: equal (phase, priority) keep registration order.
        sorted.sort_by(|a, b| {
            a.phase()
                .cmp(&b.phase())
                .then_with(|| b.priority().cmp(&a.priority()))
        });
        self.sorted = sorted;
        self.dirty = false;

        trace!(
            target: "tactics_core::pipeline",
            modifiers = self.sorted.len(),
            "modifier order rebuilt"
        );
    }
}

impl<E: CombatEvent> Default for ModifierPipeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CombatEvent> core::fmt::Debug for ModifierPipeline<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(
                self.modifiers
                    .iter()
                    .map(|m| (m.name(), m.phase(), m.priority())),
            )
            .finish()
    }
}

fn same_handle<E: CombatEvent>(a: &Arc<dyn Modifier<E>>, b: &Arc<dyn Modifier<E>>) -> bool {
    // Compare data pointers only; vtable pointers are not guaranteed unique.
    core::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{
        ArmorModifier, BlessingBuff, DamagePhase, FnModifier, Heal, HealPhase, Hit, RageBuff,
    };
    use crate::types::UnitId;

    fn hit(damage: f64) -> Hit {
        Hit::new(UnitId(1), UnitId(2), damage)
    }

    fn shared<M: Modifier<Hit> + 'static>(modifier: M) -> Arc<dyn Modifier<Hit>> {
        Arc::new(modifier)
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let mut pipeline = ModifierPipeline::<Hit>::new();
        assert_eq!(pipeline.apply(hit(7.0)).final_damage, 7.0);
    }

    #[test]
    fn phases_apply_in_order_regardless_of_registration() {
        let mut pipeline = ModifierPipeline::new();
        pipeline.add(shared(ArmorModifier::new(5.0)));
        pipeline.add(shared(RageBuff::new(2.0)));

        // PreHit rage first: 10 × 2 − 5
        assert_eq!(pipeline.apply(hit(10.0)).final_damage, 15.0);
    }

    #[test]
    fn higher_priority_applies_first_within_phase() {
        let add_three = FnModifier::new("add", "t", DamagePhase::PreHit, |mut h: Hit| {
            h.final_damage += 3.0;
            h
        })
        .with_priority(1);
        let double = FnModifier::new("double", "t", DamagePhase::PreHit, |mut h: Hit| {
            h.final_damage *= 2.0;
            h
        })
        .with_priority(10);

        let mut pipeline = ModifierPipeline::new();
        pipeline.add(shared(add_three));
        pipeline.add(shared(double));

        // double (10) before add (1): 1 × 2 + 3
        assert_eq!(pipeline.apply(hit(1.0)).final_damage, 5.0);
    }

    #[test]
    fn ties_keep_registration_order() {
        let mut pipeline = ModifierPipeline::new();
        for name in ["first", "second", "third"] {
            pipeline.add(shared(FnModifier::new(
                name,
                "tie",
                DamagePhase::Mitigation,
                |h: Hit| h,
            )));
        }
        let names: Vec<_> = pipeline.ordered().iter().map(|m| m.name().to_owned()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn remove_is_by_identity() {
        let rage_a = shared(RageBuff::new(2.0));
        let rage_b = shared(RageBuff::new(2.0));

        let mut pipeline = ModifierPipeline::new();
        pipeline.add(Arc::clone(&rage_a));
        assert!(!pipeline.remove(&rage_b));
        assert!(pipeline.contains(&rage_a));
        assert!(pipeline.remove(&rage_a));
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(hit(4.0)).final_damage, 4.0);
    }

    #[test]
    fn order_is_rebuilt_after_mutation() {
        let mut pipeline = ModifierPipeline::new();
        pipeline.add(shared(RageBuff::new(3.0)));
        assert_eq!(pipeline.apply(hit(2.0)).final_damage, 6.0);

        let armor = shared(ArmorModifier::new(1.0));
        pipeline.add(Arc::clone(&armor));
        assert_eq!(pipeline.apply(hit(2.0)).final_damage, 5.0);

        pipeline.remove(&armor);
        assert_eq!(pipeline.apply(hit(2.0)).final_damage, 6.0);
    }

    #[test]
    fn remove_by_tag_drops_all_matches() {
        let mut pipeline = ModifierPipeline::new();
        pipeline.add(shared(RageBuff::new(2.0)));
        pipeline.add(shared(RageBuff::new(3.0)));
        pipeline.add(shared(ArmorModifier::new(1.0)));

        assert_eq!(pipeline.remove_by_tag("Buff:Rage"), 2);
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline.apply(hit(5.0)).final_damage, 4.0);
    }

    #[test]
    fn heal_pipeline_uses_heal_phases() {
        let mut pipeline = ModifierPipeline::<Heal>::new();
        pipeline.add(Arc::new(FnModifier::new(
            "flat",
            "t",
            HealPhase::PostHeal,
            |mut h: Heal| {
                h.final_amount += 1.0;
                h
            },
        )));
        pipeline.add(Arc::new(BlessingBuff::new(2.0)));

        let heal = pipeline.apply(Heal::new(UnitId(1), UnitId(1), 10.0));
        assert_eq!(heal.final_amount, 21.0);
    }

    #[test]
    fn modifiers_can_attach_callbacks() {
        let mut pipeline = ModifierPipeline::new();
        pipeline.add(shared(FnModifier::new(
            "thorns",
            "Buff:Thorns",
            DamagePhase::PostHit,
            |mut h: Hit| {
                h.post_callbacks.push(|| {});
                h
            },
        )));

        let folded = pipeline.apply(hit(3.0));
        assert_eq!(folded.post_callbacks.len(), 1);
    }
}
