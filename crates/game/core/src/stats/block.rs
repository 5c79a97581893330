//! Per-unit set of stat ledgers.

use super::ledger::{FormulaLedger, OperatorKind};

/// Derived stats every combat unit carries.
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
pub enum StatKind {
    Damage,
    MaxHp,
    AttackSpeed,
    MoveSpeed,
}

/// Base values used to seed a [`StatBlock`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub damage: f64,
    pub max_hp: f64,
    pub attack_speed: f64,
    pub move_speed: f64,
}

impl BaseStats {
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Damage => self.damage,
            StatKind::MaxHp => self.max_hp,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::MoveSpeed => self.move_speed,
        }
    }
}

/// One [`FormulaLedger`] per [`StatKind`], exclusively owned by a unit.
#[derive(Clone, Debug, Default)]
pub struct StatBlock {
    damage: FormulaLedger,
    max_hp: FormulaLedger,
    attack_speed: FormulaLedger,
    move_speed: FormulaLedger,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds every ledger with its base value.
    pub fn from_base(base: &BaseStats) -> Self {
        Self {
            damage: FormulaLedger::with_base(base.damage),
            max_hp: FormulaLedger::with_base(base.max_hp),
            attack_speed: FormulaLedger::with_base(base.attack_speed),
            move_speed: FormulaLedger::with_base(base.move_speed),
        }
    }

    pub fn ledger(&self, kind: StatKind) -> &FormulaLedger {
        match kind {
            StatKind::Damage => &self.damage,
            StatKind::MaxHp => &self.max_hp,
            StatKind::AttackSpeed => &self.attack_speed,
            StatKind::MoveSpeed => &self.move_speed,
        }
    }

    pub fn ledger_mut(&mut self, kind: StatKind) -> &mut FormulaLedger {
        match kind {
            StatKind::Damage => &mut self.damage,
            StatKind::MaxHp => &mut self.max_hp,
            StatKind::AttackSpeed => &mut self.attack_speed,
            StatKind::MoveSpeed => &mut self.move_speed,
        }
    }

    /// Current derived value of `kind`.
    pub fn value(&self, kind: StatKind) -> f64 {
        self.ledger(kind).value()
    }

    /// Shorthand for adding a contribution to one stat.
    pub fn add(
        &mut self,
        kind: StatKind,
        id: impl Into<String>,
        value: f64,
        op: OperatorKind,
    ) -> bool {
        self.ledger_mut(kind).add(id, value, op)
    }

    /// Removes `id` from one stat.
    pub fn remove(&mut self, kind: StatKind, id: &str) -> bool {
        self.ledger_mut(kind).remove(id)
    }

    pub fn damage(&self) -> f64 {
        self.damage.value()
    }

    pub fn max_hp(&self) -> f64 {
        self.max_hp.value()
    }

    pub fn attack_speed(&self) -> f64 {
        self.attack_speed.value()
    }

    pub fn move_speed(&self) -> f64 {
        self.move_speed.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_each_ledger() {
        let block = StatBlock::from_base(&BaseStats {
            damage: 12.0,
            max_hp: 80.0,
            attack_speed: 1.0,
            move_speed: 3.5,
        });

        assert_eq!(block.damage(), 12.0);
        assert_eq!(block.max_hp(), 80.0);
        assert_eq!(block.attack_speed(), 1.0);
        assert_eq!(block.move_speed(), 3.5);
    }

    #[test]
    fn ledgers_are_independent() {
        let mut block = StatBlock::from_base(&BaseStats {
            damage: 10.0,
            max_hp: 100.0,
            ..BaseStats::default()
        });
        block.add(StatKind::Damage, "rage", 2.0, OperatorKind::Multiply);

        assert_eq!(block.value(StatKind::Damage), 20.0);
        assert_eq!(block.value(StatKind::MaxHp), 100.0);
        assert!(!block.ledger(StatKind::MaxHp).has_formula("rage"));
    }

    #[test]
    fn stat_kind_names() {
        assert_eq!(StatKind::MaxHp.as_ref(), "max_hp");
        assert_eq!("attack_speed".parse::<StatKind>().unwrap(), StatKind::AttackSpeed);
    }
}
