//! Stat system: formula ledgers and per-unit stat blocks.
//!
//! # Architecture
//!
//! ```text
//! [ Contributions (gear, buffs, levels, roguelike effects) ]
//!      ↓  add / remove (marks dirty)
//! [ FormulaLedger ]  one per derived stat
//!      ↓  value() (folds once per change)
//! [ StatBlock ]      Damage, MaxHp, AttackSpeed, MoveSpeed
//! ```
//!
//! ## Fold Order
//!
//! All ledgers use the same calculation order:
//! `AddInitial → AddInitialPercent → Add → AddPercent → Multiply`

pub mod block;
pub mod ledger;

pub use block::{BaseStats, StatBlock, StatKind};
pub use ledger::{Contribution, FormulaLedger, LedgerBreakdown, OperatorKind, nearly_equal};
