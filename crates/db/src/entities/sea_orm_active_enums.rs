//! Database-backed enums mirroring the Postgres enum types.
//!
//! Conversions to and from the `hazina-core` domain enums live here so
//! repositories can hand pure core logic its own types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of ledger account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_kind")]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Member savings account.
    #[sea_orm(string_value = "member_savings")]
    MemberSavings,
    /// Member loan account.
    #[sea_orm(string_value = "member_loan")]
    MemberLoan,
    /// Internal general-ledger account.
    #[sea_orm(string_value = "gl")]
    Gl,
}

/// Account lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Open for posting.
    #[sea_orm(string_value = "active")]
    Active,
    /// Closed to posting.
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Entry leg type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_type")]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit leg.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credit leg.
    #[sea_orm(string_value = "credit")]
    Credit,
}

/// Entry leg status, shared by all legs under one reference number.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Awaiting approval.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Applied to balances (terminal).
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Refused, never applied (terminal).
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Till lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "till_status")]
#[serde(rename_all = "lowercase")]
pub enum TillStatus {
    /// Open for business.
    #[sea_orm(string_value = "active")]
    Active,
    /// Closed; no longer usable for disbursement.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Loan application status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "loan_status")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Application received.
    #[sea_orm(string_value = "applied")]
    Applied,
    /// Sanctioned, awaiting disbursement.
    #[sea_orm(string_value = "sanctioned")]
    Sanctioned,
    /// Funds disbursed.
    #[sea_orm(string_value = "disbursed")]
    Disbursed,
    /// Application rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Payout lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payout_status")]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    /// Scheduled, not yet posted (retains any failure reason from a
    /// refused processing attempt).
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Posted to the ledger.
    #[sea_orm(string_value = "processed")]
    Processed,
}

/// Payout direction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payout_direction")]
#[serde(rename_all = "lowercase")]
pub enum PayoutDirection {
    /// Interest paid to the member.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Interest collected from the member.
    #[sea_orm(string_value = "collection")]
    Collection,
}

/// Charge lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "charge_status")]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    /// Waiting to be applied.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Applied as a posting.
    #[sea_orm(string_value = "applied")]
    Applied,
}

// ============================================================================
// Conversions to/from core domain enums
// ============================================================================

impl From<hazina_core::ledger::EntryType> for EntryType {
    fn from(value: hazina_core::ledger::EntryType) -> Self {
        match value {
            hazina_core::ledger::EntryType::Debit => Self::Debit,
            hazina_core::ledger::EntryType::Credit => Self::Credit,
        }
    }
}

impl From<EntryType> for hazina_core::ledger::EntryType {
    fn from(value: EntryType) -> Self {
        match value {
            EntryType::Debit => Self::Debit,
            EntryType::Credit => Self::Credit,
        }
    }
}

impl From<hazina_core::approval::EntryStatus> for EntryStatus {
    fn from(value: hazina_core::approval::EntryStatus) -> Self {
        match value {
            hazina_core::approval::EntryStatus::Pending => Self::Pending,
            hazina_core::approval::EntryStatus::Approved => Self::Approved,
            hazina_core::approval::EntryStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<EntryStatus> for hazina_core::approval::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Pending => Self::Pending,
            EntryStatus::Approved => Self::Approved,
            EntryStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<hazina_core::disbursement::LoanStatus> for LoanStatus {
    fn from(value: hazina_core::disbursement::LoanStatus) -> Self {
        match value {
            hazina_core::disbursement::LoanStatus::Applied => Self::Applied,
            hazina_core::disbursement::LoanStatus::Sanctioned => Self::Sanctioned,
            hazina_core::disbursement::LoanStatus::Disbursed => Self::Disbursed,
            hazina_core::disbursement::LoanStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<LoanStatus> for hazina_core::disbursement::LoanStatus {
    fn from(value: LoanStatus) -> Self {
        match value {
            LoanStatus::Applied => Self::Applied,
            LoanStatus::Sanctioned => Self::Sanctioned,
            LoanStatus::Disbursed => Self::Disbursed,
            LoanStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<hazina_core::interest::PayoutDirection> for PayoutDirection {
    fn from(value: hazina_core::interest::PayoutDirection) -> Self {
        match value {
            hazina_core::interest::PayoutDirection::Payment => Self::Payment,
            hazina_core::interest::PayoutDirection::Collection => Self::Collection,
        }
    }
}

impl From<PayoutDirection> for hazina_core::interest::PayoutDirection {
    fn from(value: PayoutDirection) -> Self {
        match value {
            PayoutDirection::Payment => Self::Payment,
            PayoutDirection::Collection => Self::Collection,
        }
    }
}
