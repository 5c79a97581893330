//! Deterministic combat simulation core for a tactical unit game.
//!
//! `tactics-core` holds the numeric and behavioral rules shared by gameplay
//! code and offline tools:
//!
//! - [`stats`]: formula ledgers folding named contributions into stat values
//! - [`combat`]: hit/heal events and the phase-ordered modifier pipelines
//! - [`unit`]: the per-unit state machine and archetype state factories
//! - [`gacha`]: weighted and tiered random selection
//! - [`effect`]: roguelike stat rewards drawn from a tiered pool
//! - [`actor`]: [`CombatActor`], which ties the pieces together per unit
//!
//! Nothing here performs I/O or holds global state. Content files are read by
//! the `tactics-content` crate.
pub mod actor;
pub mod combat;
pub mod config;
pub mod effect;
pub mod error;
pub mod gacha;
pub mod observer;
pub mod rng;
pub mod stats;
pub mod types;
pub mod unit;

pub use actor::{ActorStatus, Attacker, CombatActor, DamageOutcome, Defender, HealOutcome};
pub use combat::{
    CombatEvent, DamagePhase, Heal, HealModifier, HealPhase, Hit, HitModifier, Modifier,
    ModifierPipeline,
};
pub use config::CombatConfig;
pub use effect::{
    ActivationOutcome, Constraint, ConstraintKind, ConstraintOracle, EffectCategory, EffectError,
    EffectRegistry, EffectSpec, EffectStrategy, RogueEffect, RoguelikePool,
};
pub use error::{CombatError, ErrorSeverity};
pub use gacha::{DrawMode, Tier, TieredPool, WeightedSelector};
pub use observer::{Observers, SubscriptionId};
pub use rng::{PcgRng, compute_seed};
pub use stats::{
    BaseStats, Contribution, FormulaLedger, LedgerBreakdown, OperatorKind, StatBlock, StatKind,
};
pub use types::{Team, UnitId};
pub use unit::{
    Archetype, ArchetypeStates, DefaultStateFactory, StateBehavior, StateFactory,
    StateMachineError, StateTransition, UnitHost, UnitState, UnitStateMachine,
};
