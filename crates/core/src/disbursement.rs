//! Loan disbursement precondition checks.
//!
//! Disbursement fails fast: every check here runs before any posting is
//! attempted, so a refused disbursement leaves no partial state behind.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Status of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Application received, not yet sanctioned.
    Applied,
    /// Sanctioned and awaiting disbursement.
    Sanctioned,
    /// Funds disbursed to the member's loan account.
    Disbursed,
    /// Application rejected.
    Rejected,
}

impl LoanStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Sanctioned => "sanctioned",
            Self::Disbursed => "disbursed",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "applied" => Some(Self::Applied),
            "sanctioned" => Some(Self::Sanctioned),
            "disbursed" => Some(Self::Disbursed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Till information needed for disbursement checks.
#[derive(Debug, Clone)]
pub struct TillInfo {
    /// The till ID.
    pub id: Uuid,
    /// The GL account backing the till.
    pub gl_account_id: Uuid,
    /// Maximum amount a single disbursement may draw from this till.
    pub max_capacity: Decimal,
    /// Whether the till is open for business.
    pub is_active: bool,
}

/// Errors that can occur while checking disbursement preconditions.
#[derive(Debug, Error)]
pub enum DisbursementError {
    /// Only sanctioned applications can be disbursed.
    #[error("Loan application is {0}, only sanctioned applications can be disbursed")]
    LoanNotSanctioned(LoanStatus),

    /// The acting cashier has no till assigned.
    #[error("No active till assigned to cashier {0}")]
    TillNotAssigned(Uuid),

    /// The assigned till is closed.
    #[error("Till {0} is closed")]
    TillClosed(Uuid),

    /// The loan amount exceeds the till's capacity.
    #[error("Loan amount {amount} exceeds till capacity {capacity}")]
    TillCapacityExceeded {
        /// The requested loan amount.
        amount: Decimal,
        /// The till's maximum capacity.
        capacity: Decimal,
    },

    /// The backing GL account cannot fund the loan.
    #[error("GL account balance {available} is insufficient for loan amount {required}")]
    InsufficientGlBalance {
        /// Available balance on the GL account.
        available: Decimal,
        /// The required loan amount.
        required: Decimal,
    },
}

impl DisbursementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoanNotSanctioned(_) => "LOAN_NOT_SANCTIONED",
            Self::TillNotAssigned(_) => "TILL_NOT_ASSIGNED",
            Self::TillClosed(_) => "TILL_CLOSED",
            Self::TillCapacityExceeded { .. } => "TILL_CAPACITY_EXCEEDED",
            Self::InsufficientGlBalance { .. } => "INSUFFICIENT_GL_BALANCE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::LoanNotSanctioned(_) => 409,
            Self::TillNotAssigned(_) | Self::TillClosed(_) => 412,
            Self::TillCapacityExceeded { .. } | Self::InsufficientGlBalance { .. } => 422,
        }
    }
}

/// Stateless service for disbursement precondition checks.
pub struct DisbursementService;

impl DisbursementService {
    /// Check that the application is in a disbursable state.
    ///
    /// # Errors
    ///
    /// Returns `LoanNotSanctioned` for any status other than Sanctioned.
    pub fn check_application(status: LoanStatus) -> Result<(), DisbursementError> {
        if status == LoanStatus::Sanctioned {
            Ok(())
        } else {
            Err(DisbursementError::LoanNotSanctioned(status))
        }
    }

    /// Check the cashier's till assignment and capacity.
    ///
    /// # Errors
    ///
    /// Returns `TillNotAssigned` when no till exists for the cashier,
    /// `TillClosed` for an inactive till, `TillCapacityExceeded` when the
    /// amount does not fit.
    pub fn check_till(
        till: Option<&TillInfo>,
        cashier_id: Uuid,
        amount: Decimal,
    ) -> Result<(), DisbursementError> {
        let till = till.ok_or(DisbursementError::TillNotAssigned(cashier_id))?;

        if !till.is_active {
            return Err(DisbursementError::TillClosed(till.id));
        }
        if amount > till.max_capacity {
            return Err(DisbursementError::TillCapacityExceeded {
                amount,
                capacity: till.max_capacity,
            });
        }

        Ok(())
    }

    /// Check the backing GL account can fund the loan.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientGlBalance` when `available < required`.
    pub fn check_gl_balance(available: Decimal, required: Decimal) -> Result<(), DisbursementError> {
        if available < required {
            return Err(DisbursementError::InsufficientGlBalance {
                available,
                required,
            });
        }
        Ok(())
    }

    /// Run every precondition in order: application status, till, GL balance.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_preconditions(
        status: LoanStatus,
        till: Option<&TillInfo>,
        cashier_id: Uuid,
        gl_balance: Decimal,
        amount: Decimal,
    ) -> Result<(), DisbursementError> {
        Self::check_application(status)?;
        Self::check_till(till, cashier_id, amount)?;
        Self::check_gl_balance(gl_balance, amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_till(max_capacity: Decimal) -> TillInfo {
        TillInfo {
            id: Uuid::new_v4(),
            gl_account_id: Uuid::new_v4(),
            max_capacity,
            is_active: true,
        }
    }

    #[test]
    fn test_check_application_sanctioned() {
        assert!(DisbursementService::check_application(LoanStatus::Sanctioned).is_ok());
    }

    #[test]
    fn test_check_application_rejects_other_statuses() {
        for status in [LoanStatus::Applied, LoanStatus::Disbursed, LoanStatus::Rejected] {
            let result = DisbursementService::check_application(status);
            assert!(matches!(
                result,
                Err(DisbursementError::LoanNotSanctioned(s)) if s == status
            ));
        }
    }

    #[test]
    fn test_check_till_not_assigned() {
        let cashier = Uuid::new_v4();
        let result = DisbursementService::check_till(None, cashier, dec!(1000));
        assert!(matches!(
            result,
            Err(DisbursementError::TillNotAssigned(c)) if c == cashier
        ));
    }

    #[test]
    fn test_check_till_closed() {
        let mut till = make_till(dec!(50000));
        till.is_active = false;
        let result = DisbursementService::check_till(Some(&till), Uuid::new_v4(), dec!(1000));
        assert!(matches!(result, Err(DisbursementError::TillClosed(id)) if id == till.id));
    }

    #[test]
    fn test_check_till_capacity() {
        let till = make_till(dec!(5000));

        assert!(DisbursementService::check_till(Some(&till), Uuid::new_v4(), dec!(5000)).is_ok());

        let result = DisbursementService::check_till(Some(&till), Uuid::new_v4(), dec!(5001));
        assert!(matches!(
            result,
            Err(DisbursementError::TillCapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_check_gl_balance_insufficient() {
        // GL holds 500, loan wants 1000: refused before any posting.
        let result = DisbursementService::check_gl_balance(dec!(500), dec!(1000));
        match result {
            Err(DisbursementError::InsufficientGlBalance {
                available,
                required,
            }) => {
                assert_eq!(available, dec!(500));
                assert_eq!(required, dec!(1000));
            }
            other => panic!("Expected InsufficientGlBalance, got {other:?}"),
        }
    }

    #[test]
    fn test_check_gl_balance_exact_amount_ok() {
        assert!(DisbursementService::check_gl_balance(dec!(1000), dec!(1000)).is_ok());
    }

    #[test]
    fn test_validate_preconditions_order() {
        // Status is checked before the till: an Applied loan with no till
        // reports LoanNotSanctioned, not TillNotAssigned.
        let result = DisbursementService::validate_preconditions(
            LoanStatus::Applied,
            None,
            Uuid::new_v4(),
            dec!(0),
            dec!(1000),
        );
        assert!(matches!(
            result,
            Err(DisbursementError::LoanNotSanctioned(LoanStatus::Applied))
        ));
    }

    #[test]
    fn test_validate_preconditions_pass() {
        let till = make_till(dec!(100000));
        let result = DisbursementService::validate_preconditions(
            LoanStatus::Sanctioned,
            Some(&till),
            Uuid::new_v4(),
            dec!(20000),
            dec!(10000),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_loan_status_parse() {
        assert_eq!(LoanStatus::parse("sanctioned"), Some(LoanStatus::Sanctioned));
        assert_eq!(LoanStatus::parse("DISBURSED"), Some(LoanStatus::Disbursed));
        assert_eq!(LoanStatus::parse("applied"), Some(LoanStatus::Applied));
        assert_eq!(LoanStatus::parse("rejected"), Some(LoanStatus::Rejected));
        assert_eq!(LoanStatus::parse("open"), None);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DisbursementError::TillNotAssigned(Uuid::nil()).error_code(),
            "TILL_NOT_ASSIGNED"
        );
        assert_eq!(
            DisbursementError::InsufficientGlBalance {
                available: dec!(500),
                required: dec!(1000),
            }
            .error_code(),
            "INSUFFICIENT_GL_BALANCE"
        );
    }
}
