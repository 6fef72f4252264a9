//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (`SchedulerError`, `SelectionError`,
//! `EngineError`) are defined next to the code that raises them. This module
//! provides the shared severity classification used to pick a recovery
//! strategy.

/// Severity level of an error.
///
/// - **Recoverable**: the same step can be retried with different input
/// - **Validation**: invalid input that is rejected without retry
/// - **Internal**: unexpected state inconsistency
/// - **Fatal**: a broken scheduling invariant; the battle cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: move with no uses left, restricted move.
    Recoverable,

    /// Examples: unknown move id in a command.
    Validation,

    /// Examples: combatant missing from its slot.
    Internal,

    /// Examples: popping a phase while another is running.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
