//! The unit state machine.

use std::collections::BTreeMap;

use tracing::{debug, error, trace, warn};

use crate::error::{CombatError, ErrorSeverity};
use crate::observer::{Observers, SubscriptionId};

use super::behavior::StateBehavior;
use super::factory::{StateFactory, StateHandle};
use super::host::UnitHost;
use super::state::{Archetype, StateTransition, UnitState};

/// Configuration errors raised by [`UnitStateMachine`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    #[error("state {state} is not registered")]
    StateNotRegistered { state: UnitState },

    #[error("archetype {archetype} has no registered states")]
    EmptyArchetype { archetype: Archetype },

    #[error("archetype {archetype} does not register the initial {initial} state")]
    MissingInitialState {
        archetype: Archetype,
        initial: UnitState,
    },
}

impl CombatError for StateMachineError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::StateNotRegistered { .. } => "FSM_STATE_NOT_REGISTERED",
            Self::EmptyArchetype { .. } => "FSM_EMPTY_ARCHETYPE",
            Self::MissingInitialState { .. } => "FSM_MISSING_INITIAL_STATE",
        }
    }
}

/// Finite state machine over a unit's registered [`StateBehavior`]s.
///
/// # Lifecycle
///
/// 1. [`initialize`](Self::initialize) registers an archetype's states and
///    enters `Idle` without validation
/// 2. [`change_state`](Self::change_state) performs validated transitions
/// 3. [`tick`](Self::tick) dispatches the current state's update hook
/// 4. [`shutdown`](Self::shutdown) drops every transition subscription
///
/// `Death` is reachable from every non-terminal state; terminal states
/// refuse every transition, including forced ones.
#[derive(Default)]
pub struct UnitStateMachine {
    archetype: Option<Archetype>,
    states: BTreeMap<UnitState, StateHandle>,
    current: Option<StateHandle>,
    on_transition: Observers<StateTransition>,
}

impl UnitStateMachine {
    pub const INITIAL_STATE: UnitState = UnitState::Idle;

    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `archetype`'s states from `factory` and enters `Idle`.
    ///
    /// Re-initializing replaces the registered states. Duplicate states in
    /// the factory output are logged and ignored (first one wins).
    pub fn initialize(
        &mut self,
        archetype: Archetype,
        factory: &dyn StateFactory,
        host: &mut dyn UnitHost,
    ) -> Result<(), StateMachineError> {
        let behaviors = factory.create_states(archetype);
        if behaviors.is_empty() {
            let err = StateMachineError::EmptyArchetype { archetype };
            error!(target: "tactics_core::fsm", unit = host.name(), error = %err, "initialize failed");
            return Err(err);
        }

        let mut states = BTreeMap::new();
        for behavior in behaviors {
            let state = behavior.state();
            if states.contains_key(&state) {
                warn!(
                    target: "tactics_core::fsm",
                    unit = host.name(),
                    %state,
                    "state already registered; ignoring duplicate"
                );
                continue;
            }
            states.insert(state, behavior);
        }

        let Some(initial) = states.get(&Self::INITIAL_STATE).cloned() else {
            let err = StateMachineError::MissingInitialState {
                archetype,
                initial: Self::INITIAL_STATE,
            };
            error!(target: "tactics_core::fsm", unit = host.name(), error = %err, "initialize failed");
            return Err(err);
        };

        self.archetype = Some(archetype);
        self.states = states;
        self.current = Some(initial.clone());
        initial.enter(host);

        debug!(
            target: "tactics_core::fsm",
            unit = host.name(),
            %archetype,
            states = self.states.len(),
            "state machine initialized"
        );
        self.on_transition.notify(&StateTransition {
            previous: None,
            next: Self::INITIAL_STATE,
        });
        Ok(())
    }

    /// Attempts a transition into `target`.
    ///
    /// Returns `Ok(true)` if the transition happened, `Ok(false)` if it was
    /// refused (same state, disallowed without `force`, or terminal current
    /// state), and `Err` if `target` is not registered.
    pub fn change_state(
        &mut self,
        target: UnitState,
        force: bool,
        host: &mut dyn UnitHost,
    ) -> Result<bool, StateMachineError> {
        // Before `initialize` nothing is registered, so `current` is only
        // absent together with every target.
        let (Some(current), Some(next)) =
            (self.current.clone(), self.states.get(&target).cloned())
        else {
            let err = StateMachineError::StateNotRegistered { state: target };
            error!(target: "tactics_core::fsm", unit = host.name(), error = %err, "transition failed");
            return Err(err);
        };

        let previous = current.state();
        if previous == target {
            return Ok(false);
        }

        if current.is_terminal() {
            debug!(
                target: "tactics_core::fsm",
                unit = host.name(),
                from = %previous,
                to = %target,
                force,
                "terminal state refuses transition"
            );
            return Ok(false);
        }

        if !force && !Self::permits(current.as_ref(), target) {
            warn!(
                target: "tactics_core::fsm",
                unit = host.name(),
                from = %previous,
                to = %target,
                "transition not allowed"
            );
            return Ok(false);
        }

        current.on_exit(host);
        self.current = Some(next.clone());
        next.enter(host);

        trace!(
            target: "tactics_core::fsm",
            unit = host.name(),
            from = %previous,
            to = %target,
            force,
            "state changed"
        );
        self.on_transition.notify(&StateTransition {
            previous: Some(previous),
            next: target,
        });
        Ok(true)
    }

    /// Runs the current state's update hook once.
    pub fn tick(&mut self, host: &mut dyn UnitHost) {
        if let Some(current) = &self.current {
            current.on_update(host);
        }
    }

    /// Drops every transition subscription. The current state is kept.
    pub fn shutdown(&mut self) {
        self.on_transition.clear();
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&StateTransition) + Send + 'static,
    ) -> SubscriptionId {
        self.on_transition.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.on_transition.unsubscribe(id)
    }

    pub fn current_state(&self) -> Option<UnitState> {
        self.current.as_ref().map(|state| state.state())
    }

    pub fn is_in_state(&self, state: UnitState) -> bool {
        self.current_state() == Some(state)
    }

    /// Whether an unforced transition into `target` would be allowed.
    pub fn can_transition_to(&self, target: UnitState) -> bool {
        self.states.contains_key(&target)
            && self
                .current
                .as_ref()
                .is_some_and(|current| Self::permits(current.as_ref(), target))
    }

    /// Unforced transition rule: `Death` is reachable from any non-terminal
    /// state regardless of the behavior's allow-set.
    fn permits(current: &dyn StateBehavior, target: UnitState) -> bool {
        if target == UnitState::Death {
            !current.is_terminal()
        } else {
            current.can_transition_to(target)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.is_terminal())
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    pub fn archetype(&self) -> Option<Archetype> {
        self.archetype
    }

    pub fn registered_states(&self) -> impl Iterator<Item = UnitState> + '_ {
        self.states.keys().copied()
    }
}

impl core::fmt::Debug for UnitStateMachine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UnitStateMachine")
            .field("archetype", &self.archetype)
            .field("current", &self.current_state())
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("observers", &self.on_transition.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::behavior::{DeathState, IdleState, MoveState};
    use crate::unit::state::StateSet;
    use crate::unit::factory::{ArchetypeStates, DefaultStateFactory};
    use crate::unit::host::RecordingHost;
    use std::sync::{Arc, Mutex};

    fn ready() -> (UnitStateMachine, RecordingHost) {
        let mut host = RecordingHost::new("grunt");
        let mut machine = UnitStateMachine::new();
        machine
            .initialize(Archetype::Melee, &DefaultStateFactory, &mut host)
            .unwrap();
        (machine, host)
    }

    #[test]
    fn initialize_enters_idle() {
        let (machine, host) = ready();
        assert_eq!(machine.current_state(), Some(UnitState::Idle));
        assert_eq!(machine.archetype(), Some(Archetype::Melee));
        assert_eq!(host.triggers, ["Idle"]);
    }

    #[test]
    fn allowed_transition_runs_hooks_and_notifies() {
        let (mut machine, mut host) = ready();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        machine.subscribe(move |t| sink.lock().unwrap().push(*t));

        assert_eq!(machine.change_state(UnitState::Attack, false, &mut host), Ok(true));
        assert_eq!(host.triggers, ["Idle", "Attack"]);
        assert_eq!(
            *seen.lock().unwrap(),
            [StateTransition {
                previous: Some(UnitState::Idle),
                next: UnitState::Attack
            }]
        );
    }

    #[test]
    fn same_state_is_a_no_op() {
        let (mut machine, mut host) = ready();
        assert_eq!(machine.change_state(UnitState::Idle, true, &mut host), Ok(false));
        assert_eq!(host.triggers, ["Idle"]);
    }

    #[test]
    fn death_is_terminal_even_when_forced() {
        let (mut machine, mut host) = ready();
        assert_eq!(machine.change_state(UnitState::Death, false, &mut host), Ok(true));
        assert!(host.collision_disabled);
        assert!(host.movement_stopped);

        for target in [UnitState::Idle, UnitState::Attack, UnitState::Move] {
            assert_eq!(machine.change_state(target, false, &mut host), Ok(false));
            assert_eq!(machine.change_state(target, true, &mut host), Ok(false));
        }
        assert!(machine.is_terminal());
        assert_eq!(host.triggers, ["Idle", "Death"]);
    }

    /// An idle behavior whose allow-set leaves out `Death`, and which also
    /// overrides the transition check.
    struct Unyielding;

    impl StateBehavior for Unyielding {
        fn state(&self) -> UnitState {
            UnitState::Idle
        }

        fn allowed_transitions(&self) -> StateSet {
            StateSet::ATTACK | StateSet::MOVE
        }

        fn can_transition_to(&self, next: UnitState) -> bool {
            self.allowed_transitions().allows(next)
        }
    }

    #[test]
    fn death_is_reachable_from_any_custom_state() {
        let mut registry = ArchetypeStates::new();
        registry.register(Archetype::Boss, Arc::new(Unyielding));
        registry.register(Archetype::Boss, Arc::new(MoveState));
        registry.register(Archetype::Boss, Arc::new(DeathState));

        let mut host = RecordingHost::new("warlord");
        let mut machine = UnitStateMachine::new();
        machine
            .initialize(Archetype::Boss, &registry, &mut host)
            .unwrap();

        assert!(machine.can_transition_to(UnitState::Death));
        assert_eq!(machine.change_state(UnitState::Death, false, &mut host), Ok(true));
        assert_eq!(machine.current_state(), Some(UnitState::Death));
        assert!(host.collision_disabled);
    }

    #[test]
    fn uninitialized_machine_reports_unregistered_target() {
        let mut host = RecordingHost::new("ghost");
        let mut machine = UnitStateMachine::new();

        assert_eq!(
            machine.change_state(UnitState::Idle, false, &mut host),
            Err(StateMachineError::StateNotRegistered {
                state: UnitState::Idle
            })
        );
        assert!(!machine.can_transition_to(UnitState::Idle));
        assert!(host.triggers.is_empty());
    }

    #[test]
    fn unregistered_target_is_a_configuration_error() {
        let mut registry = ArchetypeStates::new();
        registry.register(Archetype::Support, Arc::new(IdleState));
        registry.register(Archetype::Support, Arc::new(MoveState));

        let mut host = RecordingHost::new("medic");
        let mut machine = UnitStateMachine::new();
        machine
            .initialize(Archetype::Support, &registry, &mut host)
            .unwrap();

        let err = machine
            .change_state(UnitState::Attack, false, &mut host)
            .unwrap_err();
        assert_eq!(
            err,
            StateMachineError::StateNotRegistered {
                state: UnitState::Attack
            }
        );
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(!machine.can_transition_to(UnitState::Attack));
        assert_eq!(machine.current_state(), Some(UnitState::Idle));
    }

    #[test]
    fn empty_or_idle_less_archetype_fails_initialize() {
        let mut host = RecordingHost::new("ghost");
        let mut machine = UnitStateMachine::new();

        let err = machine
            .initialize(Archetype::Boss, &ArchetypeStates::new(), &mut host)
            .unwrap_err();
        assert_eq!(err, StateMachineError::EmptyArchetype { archetype: Archetype::Boss });

        let mut registry = ArchetypeStates::new();
        registry.register(Archetype::Boss, Arc::new(MoveState));
        let err = machine
            .initialize(Archetype::Boss, &registry, &mut host)
            .unwrap_err();
        assert!(matches!(err, StateMachineError::MissingInitialState { .. }));
        assert!(!machine.is_initialized());
        assert!(host.triggers.is_empty());
    }

    #[test]
    fn unsubscribe_and_shutdown_stop_notifications() {
        let mut host = RecordingHost::new("grunt");
        let mut machine = UnitStateMachine::new();
        let count = Arc::new(Mutex::new(0));

        let sink = Arc::clone(&count);
        let id = machine.subscribe(move |_| *sink.lock().unwrap() += 1);
        machine
            .initialize(Archetype::Default, &DefaultStateFactory, &mut host)
            .unwrap();
        assert_eq!(*count.lock().unwrap(), 1);

        assert!(machine.unsubscribe(id));
        machine.change_state(UnitState::Move, false, &mut host).unwrap();
        assert_eq!(*count.lock().unwrap(), 1);

        let sink = Arc::clone(&count);
        machine.subscribe(move |_| *sink.lock().unwrap() += 1);
        machine.shutdown();
        machine.change_state(UnitState::Idle, false, &mut host).unwrap();
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
