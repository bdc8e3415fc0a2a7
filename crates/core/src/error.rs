//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Why an account operation was refused.
///
/// The set is closed: every rejection the account can produce is listed here,
/// and the `Display` text is what the shell shows to the user.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InvalidOperation {
    #[error("account is closed")]
    AccountClosed,

    #[error("amount must be greater than 0")]
    NonPositiveAmount,

    #[error("cannot withdraw funds that would put balance below overdraft")]
    BelowOverdraft,

    #[error("overdraft limit cannot be lower than current account balance")]
    OverdraftBelowBalance,

    #[error("overdraft limit cannot be less than 0")]
    NegativeOverdraftLimit,

    #[error("account cannot be closed if balance is negative")]
    NegativeBalanceOnClose,

    #[error("account is already open")]
    AlreadyOpen,
}

/// Domain-level error.
///
/// `InvalidOperation` covers every business-rule rejection. The remaining
/// variants are failures that are not the caller's fault and must be reported
/// differently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A business rule refused the operation; state is unchanged.
    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),

    /// A domain invariant was violated (e.g. a command aimed at another account).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Decimal arithmetic left the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

impl DomainError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    /// The rejection reason, if this is a business-rule failure.
    pub fn invalid_operation(&self) -> Option<InvalidOperation> {
        match self {
            Self::InvalidOperation(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn is_invalid_operation(&self) -> bool {
        self.invalid_operation().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_operation_displays_reason_only() {
        let err = DomainError::from(InvalidOperation::AlreadyOpen);
        assert_eq!(err.to_string(), "account is already open");
        assert_eq!(err.invalid_operation(), Some(InvalidOperation::AlreadyOpen));
    }

    #[test]
    fn overflow_is_not_an_invalid_operation() {
        let err = DomainError::overflow("balance + amount");
        assert!(!err.is_invalid_operation());
        assert_eq!(err.to_string(), "arithmetic overflow: balance + amount");
    }
}
