//! Constraint checks against the player's external resources.

use std::collections::HashMap;

use super::model::{Constraint, ConstraintKind};

/// Source of truth for currencies, level, and owned units.
///
/// The core never stores these; it asks the oracle. `consume` is only
/// called after every constraint of an effect passed `is_satisfied`.
pub trait ConstraintOracle {
    fn is_satisfied(&self, constraint: &Constraint) -> bool;

    /// Spends whatever the constraint costs. Checks that cost nothing
    /// (level, unit ownership) keep the default no-op.
    fn consume(&mut self, _constraint: &Constraint) {}
}

/// Oracle that accepts every constraint and spends nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unconstrained;

impl ConstraintOracle for Unconstrained {
    fn is_satisfied(&self, _constraint: &Constraint) -> bool {
        true
    }
}

/// In-memory wallet: currencies, a player level, and owned unit counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wallet {
    pub currencies: HashMap<String, u32>,
    pub level: u32,
    pub units: HashMap<String, u32>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency(mut self, name: impl Into<String>, amount: u32) -> Self {
        self.currencies.insert(name.into(), amount);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_units(mut self, name: impl Into<String>, count: u32) -> Self {
        self.units.insert(name.into(), count);
        self
    }

    pub fn currency(&self, name: &str) -> u32 {
        self.currencies.get(name).copied().unwrap_or(0)
    }
}

impl ConstraintOracle for Wallet {
    fn is_satisfied(&self, constraint: &Constraint) -> bool {
        match constraint.kind {
            ConstraintKind::Currency => self.currency(&constraint.name) >= constraint.amount,
            ConstraintKind::Level => self.level >= constraint.amount,
            ConstraintKind::Unit => {
                self.units.get(&constraint.name).copied().unwrap_or(0) >= constraint.amount
            }
        }
    }

    fn consume(&mut self, constraint: &Constraint) {
        if constraint.kind == ConstraintKind::Currency {
            if let Some(balance) = self.currencies.get_mut(&constraint.name) {
                *balance = balance.saturating_sub(constraint.amount);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_checks_each_kind() {
        let wallet = Wallet::new()
            .with_currency("gold", 30)
            .with_level(4)
            .with_units("archer", 2);

        assert!(wallet.is_satisfied(&Constraint::currency("gold", 30)));
        assert!(!wallet.is_satisfied(&Constraint::currency("gems", 1)));
        assert!(wallet.is_satisfied(&Constraint::new(ConstraintKind::Level, "player", 4)));
        assert!(!wallet.is_satisfied(&Constraint::new(ConstraintKind::Unit, "archer", 3)));
    }

    #[test]
    fn only_currency_is_spent() {
        let mut wallet = Wallet::new().with_currency("gold", 30).with_level(4);
        wallet.consume(&Constraint::currency("gold", 12));
        wallet.consume(&Constraint::new(ConstraintKind::Level, "player", 4));

        assert_eq!(wallet.currency("gold"), 18);
        assert_eq!(wallet.level, 4);
    }
}
