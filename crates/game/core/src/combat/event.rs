//! Combat event records flowing through modifier pipelines.

use core::fmt;

use crate::types::UnitId;

use super::phase::{DamagePhase, HealPhase};

/// Deferred action registered by a modifier while an event is folded.
pub type PostCallback = Box<dyn FnOnce() + Send>;

/// Ordered list of deferred actions attached to an event.
///
/// Callbacks only run once the consumer has committed a non-zero amount;
/// a fully mitigated event is dropped together with its callbacks.
#[derive(Default)]
pub struct PostCallbacks {
    callbacks: Vec<PostCallback>,
}

impl PostCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback; callbacks run in registration order.
    pub fn push(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Invokes every callback in registration order, consuming the list.
    pub fn run(self) {
        for callback in self.callbacks {
            callback();
        }
    }
}

impl fmt::Debug for PostCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostCallbacks")
            .field("len", &self.callbacks.len())
            .finish()
    }
}

/// An event a [`ModifierPipeline`](super::ModifierPipeline) can fold modifiers over.
pub trait CombatEvent: Send {
    /// Ordering bucket used by this event's modifiers.
    type Phase: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync;

    /// Amount left after modifiers; ≤ 0 means the event has no effect.
    fn final_amount(&self) -> f64;
}

/// A damage event from an attacker to a defender.
#[derive(Debug)]
pub struct Hit {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub base_damage: f64,
    pub final_damage: f64,
    pub post_callbacks: PostCallbacks,
}

impl Hit {
    /// Creates a hit whose final damage starts at the base damage.
    pub fn new(attacker: UnitId, defender: UnitId, base_damage: f64) -> Self {
        Self {
            attacker,
            defender,
            base_damage,
            final_damage: base_damage,
            post_callbacks: PostCallbacks::new(),
        }
    }

    /// Registers a callback to run after the hit lands.
    pub fn on_landed(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.post_callbacks.push(callback);
        self
    }
}

impl CombatEvent for Hit {
    type Phase = DamagePhase;

    fn final_amount(&self) -> f64 {
        self.final_damage
    }
}

/// A healing event from a healer to a target.
#[derive(Debug)]
pub struct Heal {
    pub healer: UnitId,
    pub target: UnitId,
    pub base_amount: f64,
    pub final_amount: f64,
    pub post_callbacks: PostCallbacks,
}

impl Heal {
    /// Creates a heal whose final amount starts at the base amount.
    pub fn new(healer: UnitId, target: UnitId, base_amount: f64) -> Self {
        Self {
            healer,
            target,
            base_amount,
            final_amount: base_amount,
            post_callbacks: PostCallbacks::new(),
        }
    }

    /// Registers a callback to run after the heal lands.
    pub fn on_landed(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.post_callbacks.push(callback);
        self
    }
}

impl CombatEvent for Heal {
    type Phase = HealPhase;

    fn final_amount(&self) -> f64 {
        self.final_amount
    }
}
