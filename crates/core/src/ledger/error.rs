//! Ledger error types for posting validation and state errors.
//!
//! This module defines all errors that can occur while validating and
//! persisting postings: validation errors, account errors, reference
//! errors, and concurrency conflicts.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during posting operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Posting must have at least 2 entries.
    #[error("Posting must have at least 2 entries")]
    InsufficientEntries,

    /// Posting is not balanced (debits != credits).
    #[error("Posting is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedPosting {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Posting must contain at least one debit and one credit leg.
    #[error("Posting must contain at least one debit and one credit leg")]
    MissingDebitOrCredit,

    /// Entry amount must be positive.
    #[error("Entry amount must be positive")]
    NonPositiveAmount,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),

    // ========== Reference Errors ==========
    /// Reference number already has persisted entries.
    #[error("Reference number already exists: {0}")]
    DuplicateReference(String),

    /// No entries exist under the reference number.
    #[error("Posting not found: {0}")]
    PostingNotFound(String),

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected on an account balance.
    #[error("Concurrent modification detected for account {0}, please retry")]
    ConcurrentModification(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientEntries => "INSUFFICIENT_ENTRIES",
            Self::UnbalancedPosting { .. } => "UNBALANCED_POSTING",
            Self::MissingDebitOrCredit => "MISSING_DEBIT_OR_CREDIT",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::PostingNotFound(_) => "POSTING_NOT_FOUND",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientEntries
            | Self::UnbalancedPosting { .. }
            | Self::MissingDebitOrCredit
            | Self::NonPositiveAmount
            | Self::AccountInactive(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::PostingNotFound(_) => 404,

            // 409 Conflict - duplicate or concurrency errors
            Self::DuplicateReference(_) | Self::ConcurrentModification(_) => 409,
        }
    }

    /// Returns true if this error is safe to retry from scratch.
    ///
    /// Concurrency conflicts commit nothing, so resubmitting the same
    /// posting is safe. Validation errors require a corrected posting.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InsufficientEntries.error_code(),
            "INSUFFICIENT_ENTRIES"
        );
        assert_eq!(
            LedgerError::UnbalancedPosting {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_POSTING"
        );
        assert_eq!(
            LedgerError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            LedgerError::DuplicateReference("TXN-1".into()).error_code(),
            "DUPLICATE_REFERENCE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InsufficientEntries.http_status_code(), 400);
        assert_eq!(
            LedgerError::AccountNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::PostingNotFound("TXN-1".into()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::ConcurrentModification(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::DuplicateReference("TXN-1".into()).http_status_code(),
            409
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::ConcurrentModification(Uuid::nil()).is_retryable());
        assert!(!LedgerError::InsufficientEntries.is_retryable());
        assert!(!LedgerError::NonPositiveAmount.is_retryable());
        assert!(!LedgerError::DuplicateReference("TXN-1".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedPosting {
            debit: Decimal::new(10000, 2),
            credit: Decimal::new(9000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Posting is not balanced. Debit: 100.00, Credit: 90.00"
        );

        let err = LedgerError::AccountInactive(Uuid::nil());
        assert_eq!(
            err.to_string(),
            "Account 00000000-0000-0000-0000-000000000000 is inactive"
        );
    }
}
