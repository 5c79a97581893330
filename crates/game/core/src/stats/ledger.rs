//! Formula ledger: named contributions folded into one derived stat.
//!
//! Every contribution belongs to one of five operator buckets. The buckets are
//! always folded in the same order:
//!
//! ```text
//! result = ((initial × (1 + initial%/100)) + add) × (1 + add%/100) × multiply
//! ```
//!
//! - `initial%` compounds only on the initial term
//! - flat `add` stacks before the percent-of-total
//! - `multiply` applies last
//!
//! This ordering is a balance contract: changing it changes every derived
//! value in the game.
//!
//! The derived value is cached. Mutations only mark the ledger dirty, and the
//! next read folds all live contributions once, so a burst of buff changes
//! within a frame costs a single recompute.

use core::cell::Cell;
use core::fmt;
use std::collections::BTreeMap;

use tracing::{trace, warn};

use crate::config::CombatConfig;

/// Operator bucket a contribution is folded into.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OperatorKind {
    /// Adds to the initial (base) term.
    AddInitial,
    /// Percentage applied to the initial term only (20 = +20%).
    AddInitialPercent,
    /// Percentage applied to `initial + add` (10 = +10%).
    AddPercent,
    /// Flat addition after initial scaling.
    Add,
    /// Final multiplier (1.5 = ×1.5).
    Multiply,
}

impl OperatorKind {
    /// Identity element for this operator.
    pub const fn neutral(self) -> f64 {
        match self {
            Self::Multiply => 1.0,
            _ => 0.0,
        }
    }

    /// Returns true if `value` would have no effect when folded.
    pub fn is_neutral(self, value: f64) -> bool {
        nearly_equal(value, self.neutral())
    }
}

/// Equality used for neutral-element detection.
pub fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < CombatConfig::NEUTRAL_EPSILON
}

/// One named term feeding a derived stat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contribution {
    pub id: String,
    pub value: f64,
    pub kind: OperatorKind,
}

impl Contribution {
    pub fn new(id: impl Into<String>, value: f64, kind: OperatorKind) -> Self {
        Self {
            id: id.into(),
            value,
            kind,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.kind.is_neutral(self.value)
    }
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.value, self.kind)
    }
}

/// Bucket accumulators and result of one fold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgerBreakdown {
    pub initial: f64,
    pub initial_percent: f64,
    pub add_percent: f64,
    pub add: f64,
    pub multiply: f64,
    pub result: f64,
}

impl LedgerBreakdown {
    const NEUTRAL: Self = Self {
        initial: 0.0,
        initial_percent: 0.0,
        add_percent: 0.0,
        add: 0.0,
        multiply: 1.0,
        result: 0.0,
    };

    fn fold<'a>(contributions: impl IntoIterator<Item = &'a Contribution>) -> Self {
        let mut acc = Self::NEUTRAL;
        for contribution in contributions {
            match contribution.kind {
                OperatorKind::AddInitial => acc.initial += contribution.value,
                OperatorKind::AddInitialPercent => acc.initial_percent += contribution.value,
                OperatorKind::AddPercent => acc.add_percent += contribution.value,
                OperatorKind::Add => acc.add += contribution.value,
                OperatorKind::Multiply => acc.multiply *= contribution.value,
            }
        }

        let scaled_initial = acc.initial * (1.0 + acc.initial_percent * 0.01) + acc.add;
        acc.result = scaled_initial * (1.0 + acc.add_percent * 0.01) * acc.multiply;
        acc
    }

    /// `initial × (1 + initial%) + add`, before the percent-of-total.
    pub fn scaled_initial(&self) -> f64 {
        self.initial * (1.0 + self.initial_percent * 0.01) + self.add
    }
}

impl fmt::Display for LedgerBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "initial: {}", self.initial)?;
        writeln!(f, "initial_percent: {}%", self.initial_percent)?;
        writeln!(f, "add: {}", self.add)?;
        writeln!(f, "add_percent: {}%", self.add_percent)?;
        writeln!(f, "multiply: {}x", self.multiply)?;
        write!(f, "result: {}", self.result)
    }
}

/// Aggregate of all contributions for one derived stat.
///
/// Contributions are keyed by id; at most one is live per id. Reads go
/// through [`FormulaLedger::value`], which recomputes only when a mutation
/// happened since the previous read.
///
/// The cache lives in [`Cell`]s so HUD code can read through `&self`. A
/// ledger is therefore `Send` but not `Sync`: it belongs to exactly one actor.
///
/// # Example
/// ```
/// # use tactics_core::stats::{FormulaLedger, OperatorKind};
/// let mut hp = FormulaLedger::new();
/// hp.add("base", 100.0, OperatorKind::AddInitial);
/// hp.add("gear", 20.0, OperatorKind::AddInitialPercent);
/// hp.add("buff", 10.0, OperatorKind::AddPercent);
/// hp.add("flat", 5.0, OperatorKind::Add);
///
/// // (100 × 1.2 + 5) × 1.1 × 1
/// assert!((hp.value() - 137.5).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FormulaLedger {
    contributions: BTreeMap<String, Contribution>,
    cached: Cell<f64>,
    dirty: Cell<bool>,
}

impl FormulaLedger {
    /// Creates an empty ledger. Its value is 0 until contributions are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger seeded with an `AddInitial` base value.
    ///
    /// A zero base is skipped like any other neutral contribution.
    pub fn with_base(base: f64) -> Self {
        let mut ledger = Self::new();
        ledger.add(
            CombatConfig::BASE_CONTRIBUTION_ID,
            base,
            OperatorKind::AddInitial,
        );
        ledger
    }

    /// Inserts or replaces the contribution at `id`.
    ///
    /// Neutral values (0 for additive kinds, 1 for `Multiply`) are never
    /// stored; the call is a no-op and an existing contribution at `id` is
    /// left untouched. Returns true if the contribution was stored.
    pub fn add(&mut self, id: impl Into<String>, value: f64, kind: OperatorKind) -> bool {
        self.insert(Contribution::new(id, value, kind))
    }

    /// Same as [`FormulaLedger::add`] for an already-built contribution.
    pub fn insert(&mut self, contribution: Contribution) -> bool {
        if contribution.is_neutral() {
            trace!(
                target: "tactics_core::ledger",
                id = %contribution.id,
                kind = %contribution.kind,
                "skipping neutral contribution"
            );
            return false;
        }

        if let Some(previous) = self.contributions.get(&contribution.id) {
            warn!(
                target: "tactics_core::ledger",
                id = %contribution.id,
                old_value = previous.value,
                old_kind = %previous.kind,
                new_value = contribution.value,
                new_kind = %contribution.kind,
                "overwriting contribution"
            );
        }

        self.contributions
            .insert(contribution.id.clone(), contribution);
        self.dirty.set(true);
        true
    }

    /// Removes the contribution at `id`. Absent ids are ignored.
    ///
    /// Returns true if something was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.contributions.remove(id).is_some() {
            self.dirty.set(true);
            true
        } else {
            false
        }
    }

    /// Removes every contribution whose id starts with `prefix`.
    ///
    /// Useful for tearing down all terms a single source registered
    /// (e.g. `"rogue:"`). Returns the number removed.
    pub fn remove_prefixed(&mut self, prefix: &str) -> usize {
        let before = self.contributions.len();
        self.contributions.retain(|id, _| !id.starts_with(prefix));
        let removed = before - self.contributions.len();
        if removed > 0 {
            self.dirty.set(true);
        }
        removed
    }

    /// Drops every contribution.
    pub fn clear(&mut self) {
        if !self.contributions.is_empty() {
            self.contributions.clear();
            self.dirty.set(true);
        }
    }

    /// Derived value, recomputed only if the ledger changed since last read.
    pub fn value(&self) -> f64 {
        if self.dirty.get() {
            let breakdown = LedgerBreakdown::fold(self.contributions.values());
            trace!(
                target: "tactics_core::ledger",
                contributions = self.contributions.len(),
                result = breakdown.result,
                "recomputed ledger"
            );
            self.cached.set(breakdown.result);
            self.dirty.set(false);
        }
        self.cached.get()
    }

    /// Full fold with every bucket accumulator, for debugging and UI.
    ///
    /// Does not touch the cache.
    pub fn breakdown(&self) -> LedgerBreakdown {
        LedgerBreakdown::fold(self.contributions.values())
    }

    /// Returns true if a contribution is live at `id`. Never recomputes.
    pub fn has_formula(&self, id: &str) -> bool {
        self.contributions.contains_key(id)
    }

    /// Looks up the contribution at `id`. Never recomputes.
    pub fn get(&self, id: &str) -> Option<&Contribution> {
        self.contributions.get(id)
    }

    /// Iterates live contributions ordered by id.
    pub fn contributions(&self) -> impl Iterator<Item = &Contribution> {
        self.contributions.values()
    }

    /// Returns true if a mutation is pending a recompute.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

impl fmt::Display for FormulaLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "value: {}", self.value())?;
        writeln!(f, "contributions: {}", self.contributions.len())?;

        let mut by_kind: Vec<&Contribution> = self.contributions.values().collect();
        by_kind.sort_by_key(|c| c.kind);
        for contribution in by_kind {
            writeln!(
                f,
                "  [{}] {}: {}",
                contribution.kind, contribution.id, contribution.value
            )?;
        }
        write!(f, "{}", self.breakdown())
    }
}
