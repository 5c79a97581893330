//! Per-state behaviors.
//!
//! Behaviors are stateless: every piece of per-unit data lives on the host.
//! One instance can therefore be shared by every unit of an archetype.

use tracing::{debug, warn};

use super::host::UnitHost;
use super::state::{StateSet, UnitState};

/// Enter/update/exit hooks plus the allow-set of one [`UnitState`].
pub trait StateBehavior: Send + Sync {
    fn state(&self) -> UnitState;

    /// States this behavior may transition into.
    ///
    /// `Death` is reachable from every non-terminal state whether or not it
    /// is listed here.
    fn allowed_transitions(&self) -> StateSet;

    fn can_transition_to(&self, next: UnitState) -> bool {
        !self.is_terminal()
            && (next == UnitState::Death || self.allowed_transitions().allows(next))
    }

    /// A terminal state refuses every transition, forced or not.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Plays the state's animation trigger, then runs [`Self::on_enter`].
    fn enter(&self, host: &mut dyn UnitHost) {
        host.play_trigger(self.state().trigger());
        self.on_enter(host);
    }

    fn on_enter(&self, _host: &mut dyn UnitHost) {}

    fn on_update(&self, _host: &mut dyn UnitHost) {}

    fn on_exit(&self, _host: &mut dyn UnitHost) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IdleState;

impl StateBehavior for IdleState {
    fn state(&self) -> UnitState {
        UnitState::Idle
    }

    fn allowed_transitions(&self) -> StateSet {
        StateSet::ATTACK | StateSet::MOVE | StateSet::DEATH
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AttackState;

impl StateBehavior for AttackState {
    fn state(&self) -> UnitState {
        UnitState::Attack
    }

    fn allowed_transitions(&self) -> StateSet {
        StateSet::IDLE | StateSet::MOVE | StateSet::DEATH
    }

    fn on_enter(&self, host: &mut dyn UnitHost) {
        if !host.can_attack() {
            debug!(
                target: "tactics_core::fsm",
                unit = host.name(),
                "attack entered without an attacker"
            );
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MoveState;

impl StateBehavior for MoveState {
    fn state(&self) -> UnitState {
        UnitState::Move
    }

    fn allowed_transitions(&self) -> StateSet {
        StateSet::IDLE | StateSet::ATTACK | StateSet::DEATH
    }

    fn on_enter(&self, host: &mut dyn UnitHost) {
        if !host.can_move() {
            debug!(
                target: "tactics_core::fsm",
                unit = host.name(),
                "move entered without a mover"
            );
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeathState;

impl StateBehavior for DeathState {
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
        host.disable_collision();
        host.stop_movement();
        debug!(target: "tactics_core::fsm", unit = host.name(), "unit died");
    }

    fn on_exit(&self, host: &mut dyn UnitHost) {
        warn!(
            target: "tactics_core::fsm",
            unit = host.name(),
            "death state exited"
        );
    }
}
