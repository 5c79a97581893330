//! Combat events and the modifier pipelines that transform them.
//!
//! # Architecture
//!
//! - **Events**: [`Hit`] and [`Heal`] are created per action and moved by value
//! - **Modifiers**: Buffs, gear, and skills implementing [`Modifier`]
//! - **Pipeline**: [`ModifierPipeline`] folds modifiers in (phase, priority) order
//!
//! Committing the folded amount (and running post-callbacks) is the
//! consumer's job; see [`crate::actor::Defender`].

pub mod event;
pub mod modifier;
pub mod phase;
pub mod pipeline;

pub use event::{CombatEvent, Heal, Hit, PostCallback, PostCallbacks};
pub use modifier::{
    ArmorModifier, BlessingBuff, FnModifier, HealModifier, HitModifier, Modifier, RageBuff,
};
pub use phase::{DamagePhase, HealPhase};
pub use pipeline::ModifierPipeline;
