use tracing::{debug, warn};

use crate::stats::StatBlock;

use super::EffectError;
use super::constraint::ConstraintOracle;
use super::model::{Constraint, RogueEffect};
use super::strategy::EffectRegistry;

/// Result of trying to use an effect.
#[derive(Clone, Debug, PartialEq)]
pub enum ActivationOutcome {
    /// Contributions written. `exhausted` is true if this was the last use.
    Applied { uses: u32, exhausted: bool },
    /// A constraint failed; nothing was spent or applied.
    Blocked { constraint: Constraint },
    /// The use limit was already reached.
    Exhausted,
}

impl ActivationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

impl RogueEffect {
    /// Uses this effect once on `stats`.
    ///
    /// Every constraint is checked before any is consumed; a failing check
    /// leaves the oracle, the stats, and the use count untouched. On success
    /// the use count increments and each spec's contribution is rewritten at
    /// the new stack count.
    pub fn activate(
        &mut self,
        oracle: &mut dyn ConstraintOracle,
        registry: &EffectRegistry,
        stats: &mut StatBlock,
    ) -> Result<ActivationOutcome, EffectError> {
        if self.is_exhausted() {
            return Ok(ActivationOutcome::Exhausted);
        }

        if let Some(failed) = self
            .constraints
            .iter()
            .find(|constraint| !oracle.is_satisfied(constraint))
        {
            debug!(
                target: "tactics_core::effect",
                effect = %self.id,
                constraint = %failed,
                "effect blocked by constraint"
            );
            return Ok(ActivationOutcome::Blocked {
                constraint: failed.clone(),
            });
        }

        if let Err(err) = registry.ensure_supported(self) {
            warn!(target: "tactics_core::effect", effect = %self.id, error = %err, "effect not applicable");
            return Err(err);
        }

        for constraint in &self.constraints {
            oracle.consume(constraint);
        }

        self.uses += 1;
        registry.apply(self, stats)?;

        let exhausted = self.is_exhausted();
        debug!(
            target: "tactics_core::effect",
            effect = %self.id,
            uses = self.uses,
            limit = self.limit,
            exhausted,
            "effect applied"
        );
        Ok(ActivationOutcome::Applied {
            uses: self.uses,
            exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectCategory, EffectSpec, Unconstrained, Wallet};
    use crate::gacha::Tier;
    use crate::stats::{BaseStats, OperatorKind};

    fn stats() -> StatBlock {
        StatBlock::from_base(&BaseStats {
            damage: 100.0,
            max_hp: 100.0,
            attack_speed: 1.0,
            move_speed: 1.0,
        })
    }

    fn whetstone() -> RogueEffect {
        RogueEffect::new("whetstone", "Whetstone", Tier::Common)
            .with_effect(EffectSpec::new(EffectCategory::Damage, 10.0, OperatorKind::AddPercent))
            .with_constraint(Constraint::currency("gold", 5))
            .with_limit(2)
    }

    #[test]
    fn uses_stack_until_limit() {
        let registry = EffectRegistry::with_defaults();
        let mut wallet = Wallet::new().with_currency("gold", 100);
        let mut block = stats();
        let mut effect = whetstone();

        assert_eq!(
            effect.activate(&mut wallet, &registry, &mut block),
            Ok(ActivationOutcome::Applied { uses: 1, exhausted: false })
        );
        assert!((block.damage() - 110.0).abs() < 1e-9);

        assert_eq!(
            effect.activate(&mut wallet, &registry, &mut block),
            Ok(ActivationOutcome::Applied { uses: 2, exhausted: true })
        );
        assert!((block.damage() - 120.0).abs() < 1e-9);
        assert_eq!(wallet.currency("gold"), 90);

        assert_eq!(
            effect.activate(&mut wallet, &registry, &mut block),
            Ok(ActivationOutcome::Exhausted)
        );
        assert_eq!(wallet.currency("gold"), 90);
    }

    #[test]
    fn failing_constraint_spends_nothing() {
        let registry = EffectRegistry::with_defaults();
        let mut wallet = Wallet::new().with_currency("gold", 100).with_level(1);
        let mut block = stats();
        let mut effect = whetstone().with_constraint(Constraint::new(
            crate::effect::ConstraintKind::Level,
            "player",
            3,
        ));

        let outcome = effect.activate(&mut wallet, &registry, &mut block).unwrap();
        assert!(matches!(outcome, ActivationOutcome::Blocked { .. }));
        assert_eq!(wallet.currency("gold"), 100);
        assert_eq!(effect.uses, 0);
        assert_eq!(block.damage(), 100.0);
    }

    #[test]
    fn unsupported_category_errors_without_spending() {
        let registry = EffectRegistry::new();
        let mut wallet = Wallet::new().with_currency("gold", 100);
        let mut effect = whetstone();

        assert!(effect.activate(&mut wallet, &registry, &mut stats()).is_err());
        assert_eq!(wallet.currency("gold"), 100);
        assert_eq!(effect.uses, 0);
        assert!(Unconstrained.is_satisfied(&Constraint::currency("gold", 1)));
    }
}
