//! Common error infrastructure for tactics-core.
//!
//! Only configuration problems are surfaced as errors. Everything that is a
//! normal runtime "nothing to do" condition (removing an absent contribution,
//! re-entering the current state, drawing from an empty pool) is reported
//! through `bool`/`Option` returns instead.
//!
//! Domain-specific errors (e.g. [`StateMachineError`](crate::unit::StateMachineError),
//! [`EffectError`](crate::effect::EffectError)) live next to the components
//! that raise them and implement [`CombatError`].

/// Severity level of an error, used for categorization and logging priority.
///
/// - **Recoverable**: Temporary conditions that may succeed later
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected inconsistencies that require investigation
/// - **Fatal**: Content/setup bugs; the unit cannot be simulated correctly
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown effect id
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: effect category without a registered strategy
    Internal,

    /// Fatal error - the content configuration is incomplete.
    ///
    /// Examples: transition into an unregistered state, archetype without states
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug in code or content.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }
}
