//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`MovementError`, `InventoryError`, ...) are defined
//! next to the data they validate. This module holds the classification they
//! share.
//!
//! # Design Principles
//!
//! - **Local handling**: recoverable errors are turned into a fallback state or
//!   a UI banner by whoever hits them; they never cross the state-machine
//!   dispatcher
//! - **Severity Classification**: errors are categorized for recovery strategies

use state_machine::StateMachineError;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed later or with an alternative action
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: the world cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: destination unreachable, inventory full, item out of range
    Recoverable,

    /// Examples: item does not fit the equipment slot, slot out of bounds
    Validation,

    /// Examples: entity lost a component it was expected to carry
    Internal,

    /// Examples: a state machine built without a handler for some tag
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

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for the variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl GameError for StateMachineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingHandler { .. } | Self::DuplicateHandler { .. } => ErrorSeverity::Fatal,
            Self::ComponentMissing { .. } => ErrorSeverity::Validation,
            Self::AlreadyAttached { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        self.code()
    }
}
