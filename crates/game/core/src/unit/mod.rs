//! Unit behavior states and the state machine driving them.
//!
//! States act on their unit only through a [`UnitHost`]; per-archetype
//! state sets come from a [`StateFactory`].

pub mod behavior;
pub mod factory;
pub mod host;
pub mod machine;
pub mod state;

pub use behavior::{AttackState, DeathState, IdleState, MoveState, StateBehavior};
pub use factory::{ArchetypeStates, DefaultStateFactory, StateFactory, StateHandle};
pub use host::{NullHost, RecordingHost, UnitHost};
pub use machine::{StateMachineError, UnitStateMachine};
pub use state::{Archetype, StateSet, StateTransition, UnitState};
