//! Weighted random selection for rewards and loot tables.

pub mod selector;
pub mod tiered;

pub use selector::{WeightedEntry, WeightedSelector};
pub use tiered::{DrawMode, Tier, TieredPool};
