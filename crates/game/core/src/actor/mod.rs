//! Combat actors composing stats, modifier pipelines, and a state machine.

mod attacker;
mod combatant;
mod defender;

pub use attacker::Attacker;
pub use combatant::{ActorStatus, CombatActor};
pub use defender::{DamageOutcome, Defender, HealOutcome};
