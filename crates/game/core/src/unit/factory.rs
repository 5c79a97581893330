//! Archetype-keyed state set factories.

use std::collections::BTreeMap;
use std::sync::Arc;

use strum::IntoEnumIterator;

use super::behavior::{AttackState, DeathState, IdleState, MoveState, StateBehavior};
use super::state::{Archetype, UnitState};

/// Shared handle to a state behavior.
pub type StateHandle = Arc<dyn StateBehavior>;

/// Supplies the state behaviors a unit of a given archetype registers.
pub trait StateFactory {
    fn create_states(&self, archetype: Archetype) -> Vec<StateHandle>;
}

/// The standard Idle/Attack/Move/Death set, for every archetype.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStateFactory;

impl DefaultStateFactory {
    pub fn standard_states() -> Vec<StateHandle> {
        vec![
            Arc::new(IdleState),
            Arc::new(AttackState),
            Arc::new(MoveState),
            Arc::new(DeathState),
        ]
    }
}

impl StateFactory for DefaultStateFactory {
    fn create_states(&self, _archetype: Archetype) -> Vec<StateHandle> {
        Self::standard_states()
    }
}

/// Registry of per-archetype state sets.
///
/// Archetypes with special behavior (e.g. a boss with its own death
/// sequence) register replacement behaviors here instead of subclassing the
/// machine. Archetypes never registered produce an empty set.
#[derive(Clone, Default)]
pub struct ArchetypeStates {
    sets: BTreeMap<Archetype, BTreeMap<UnitState, StateHandle>>,
}

impl ArchetypeStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every archetype mapped to the standard four-state set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for archetype in Archetype::iter() {
            for state in DefaultStateFactory::standard_states() {
                registry.register(archetype, state);
            }
        }
        registry
    }

    /// Registers (or replaces) the behavior for its state within `archetype`.
    pub fn register(&mut self, archetype: Archetype, behavior: StateHandle) -> &mut Self {
        self.sets
            .entry(archetype)
            .or_default()
            .insert(behavior.state(), behavior);
        self
    }

    /// Drops every behavior registered for `archetype`.
    pub fn unregister(&mut self, archetype: Archetype) -> bool {
        self.sets.remove(&archetype).is_some()
    }

    pub fn contains(&self, archetype: Archetype) -> bool {
        self.sets.get(&archetype).is_some_and(|set| !set.is_empty())
    }
}

impl StateFactory for ArchetypeStates {
    fn create_states(&self, archetype: Archetype) -> Vec<StateHandle> {
        self.sets
            .get(&archetype)
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl core::fmt::Debug for ArchetypeStates {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(
                self.sets
                    .iter()
                    .map(|(archetype, set)| (archetype, set.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::host::UnitHost;
    use crate::unit::state::StateSet;

    struct LingeringDeath;

    impl StateBehavior for LingeringDeath {
        fn state(&self) -> UnitState {
            UnitState::Death
        }

        fn allowed_transitions(&self) -> StateSet {
            StateSet::empty()
        }

        fn is_terminal(&self) -> bool {
            true
        }

        fn on_enter(&self, host: &mut dyn UnitHost) {
            host.stop_movement();
        }
    }

    #[test]
    fn default_factory_covers_every_archetype() {
        for archetype in Archetype::iter() {
            let states: Vec<_> = DefaultStateFactory
                .create_states(archetype)
                .iter()
                .map(|s| s.state())
                .collect();
            assert_eq!(
                states,
                [UnitState::Idle, UnitState::Attack, UnitState::Move, UnitState::Death]
            );
        }
    }

    #[test]
    fn register_replaces_behavior_for_one_archetype() {
        let mut registry = ArchetypeStates::with_defaults();
        registry.register(Archetype::Boss, Arc::new(LingeringDeath));

        assert_eq!(registry.create_states(Archetype::Boss).len(), 4);
        assert!(registry.contains(Archetype::Boss));
    }

    #[test]
    fn unregistered_archetype_is_empty() {
        let mut registry = ArchetypeStates::new();
        registry.register(Archetype::Melee, Arc::new(IdleState));

        assert!(registry.create_states(Archetype::Ranged).is_empty());
        assert!(registry.unregister(Archetype::Melee));
        assert!(!registry.contains(Archetype::Melee));
    }
}
