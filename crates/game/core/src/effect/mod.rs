//! Roguelike effects: constrained, stackable stat rewards and the pool that
//! offers them.
//!
//! Flow for one reward screen:
//! 1. [`RoguelikePool::offer`] draws candidate effects
//! 2. The player picks one; [`RoguelikePool::select`] activates it
//! 3. Activation checks every [`Constraint`] through a [`ConstraintOracle`],
//!    consumes them, and writes contributions via the [`EffectRegistry`]

mod activation;
mod constraint;
mod model;
mod pool;
mod strategy;

pub use activation::ActivationOutcome;
pub use constraint::{ConstraintOracle, Unconstrained, Wallet};
pub use model::{Constraint, ConstraintKind, EffectCategory, EffectSpec, RogueEffect};
pub use pool::RoguelikePool;
pub use strategy::{EffectRegistry, EffectStrategy, StatEffect};

use crate::error::{CombatError, ErrorSeverity};

/// Errors raised while activating effects.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("effect {id} is not in the pool")]
    UnknownEffect { id: String },

    #[error("effect {effect} uses category {category} with no registered strategy")]
    MissingStrategy {
        effect: String,
        category: EffectCategory,
    },
}

impl CombatError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEffect { .. } => ErrorSeverity::Validation,
            Self::MissingStrategy { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffect { .. } => "EFFECT_UNKNOWN",
            Self::MissingStrategy { .. } => "EFFECT_MISSING_STRATEGY",
        }
    }
}
