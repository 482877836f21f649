//! Loan disbursement orchestration over the posting engine.
//!
//! The precondition checks, the funding posting, and the status change to
//! Disbursed all commit in one database transaction. Pending charges are
//! applied afterwards as independent postings so a refused charge never
//! unwinds a completed disbursement.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait, prelude::DateTimeWithTimeZone,
};
use tracing::{info, warn};
use uuid::Uuid;

use hazina_core::disbursement::{
    DisbursementError as PreconditionError, DisbursementService, LoanStatus as CoreLoanStatus,
    TillInfo,
};
use hazina_core::ledger::{EntryType, ProposedEntry, generate_reference_number};

use crate::entities::{
    accounts, loan_applications, tills,
    sea_orm_active_enums::{AccountKind, AccountStatus, LoanStatus, TillStatus},
};
use crate::repositories::charge::{ChargeError, ChargeRepository};
use crate::repositories::posting::{PostingError, PostingRepository, SubmitPostingInput};

/// Error types for disbursement operations.
#[derive(Debug, thiserror::Error)]
pub enum DisbursementError {
    /// Loan application not found.
    #[error("Loan application not found: {0}")]
    LoanNotFound(Uuid),

    /// The till's backing GL account does not exist.
    #[error("GL account not found: {0}")]
    GlAccountNotFound(Uuid),

    /// A disbursement precondition failed; nothing was posted.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The posting engine refused the funding posting; the application
    /// stays Sanctioned.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Charge bookkeeping error.
    #[error(transparent)]
    Charge(#[from] ChargeError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DisbursementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoanNotFound(_) => "LOAN_NOT_FOUND",
            Self::GlAccountNotFound(_) => "GL_ACCOUNT_NOT_FOUND",
            Self::Precondition(e) => e.error_code(),
            Self::Posting(e) => e.error_code(),
            Self::Charge(_) | Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::LoanNotFound(_) | Self::GlAccountNotFound(_) => 404,
            Self::Precondition(e) => e.http_status_code(),
            Self::Posting(e) => e.http_status_code(),
            Self::Charge(_) | Self::Database(_) => 500,
        }
    }
}

/// A charge applied during disbursement.
#[derive(Debug, Clone)]
pub struct ChargeApplication {
    /// The charge that was applied.
    pub charge_id: Uuid,
    /// Reference number of the posting that applied it.
    pub reference_number: String,
    /// The charge amount.
    pub amount: Decimal,
}

/// A charge that could not be applied during disbursement.
#[derive(Debug, Clone)]
pub struct ChargeFailure {
    /// The charge that failed.
    pub charge_id: Uuid,
    /// Why the posting engine refused it.
    pub reason: String,
}

/// Result of a successful disbursement.
#[derive(Debug, Clone)]
pub struct DisbursementOutcome {
    /// The disbursed application.
    pub loan_application_id: Uuid,
    /// The member's loan account that was credited.
    pub loan_account_id: Uuid,
    /// Reference number of the funding posting.
    pub reference_number: String,
    /// The disbursed amount.
    pub amount: Decimal,
    /// Charges applied after the funding posting committed.
    pub charges_applied: Vec<ChargeApplication>,
    /// Charges the posting engine refused; recorded, not fatal.
    pub charge_failures: Vec<ChargeFailure>,
}

/// Disbursement orchestrator.
#[derive(Debug, Clone)]
pub struct DisbursementRepository {
    db: DatabaseConnection,
    postings: PostingRepository,
    charges: ChargeRepository,
}

impl DisbursementRepository {
    /// Creates a new disbursement repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            postings: PostingRepository::new(db.clone()),
            charges: ChargeRepository::new(db.clone()),
            db,
        }
    }

    /// Disburses a sanctioned loan through the acting cashier's till.
    ///
    /// Preconditions run before any posting: application must be
    /// Sanctioned, the cashier needs an active till with capacity for the
    /// amount, and the till's GL account must hold at least the amount.
    /// The funding posting (DEBIT till GL, CREDIT loan account) and the
    /// Sanctioned → Disbursed transition commit together; a posting-engine
    /// refusal rolls everything back and the application stays Sanctioned.
    ///
    /// # Errors
    ///
    /// Returns `Precondition` failures before anything is written,
    /// `Posting` when the engine refuses the funding pair.
    pub async fn disburse(
        &self,
        loan_application_id: Uuid,
        cashier_id: Uuid,
        actor: Uuid,
    ) -> Result<DisbursementOutcome, DisbursementError> {
        let txn = self.db.begin().await?;

        // Lock the application row so concurrent disbursement attempts
        // serialize on the status check.
        let loan = loan_applications::Entity::find_by_id(loan_application_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DisbursementError::LoanNotFound(loan_application_id))?;

        let status: CoreLoanStatus = loan.status.clone().into();
        DisbursementService::check_application(status)?;

        let till = tills::Entity::find()
            .filter(tills::Column::CashierId.eq(cashier_id))
            .filter(tills::Column::Status.eq(TillStatus::Active))
            .one(&txn)
            .await?;
        let Some(till) = till else {
            return Err(PreconditionError::TillNotAssigned(cashier_id).into());
        };
        let till_info = TillInfo {
            id: till.id,
            gl_account_id: till.gl_account_id,
            max_capacity: till.max_capacity,
            is_active: till.status == TillStatus::Active,
        };
        DisbursementService::check_till(Some(&till_info), cashier_id, loan.amount)?;

        // Lock the GL account so the balance check and the debit applied
        // below see one consistent view.
        let gl_account = accounts::Entity::find_by_id(till.gl_account_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DisbursementError::GlAccountNotFound(till.gl_account_id))?;
        DisbursementService::check_gl_balance(gl_account.available_balance, loan.amount)?;

        let loan_account = Self::resolve_loan_account(&txn, &loan, &gl_account.currency).await?;

        let reference = generate_reference_number();
        let posting_input = SubmitPostingInput {
            reference_number: Some(reference.clone()),
            entries: vec![
                ProposedEntry {
                    account_id: gl_account.id,
                    entry_type: EntryType::Debit,
                    amount: loan.amount,
                },
                ProposedEntry {
                    account_id: loan_account.id,
                    entry_type: EntryType::Credit,
                    amount: loan.amount,
                },
            ],
            created_by: actor,
            auto_approve: true,
        };
        let posting = PostingRepository::submit_in_txn(&txn, &reference, &posting_input).await?;

        let amount = loan.amount;
        let now: DateTimeWithTimeZone = Utc::now().into();
        let mut active: loan_applications::ActiveModel = loan.into();
        active.status = Set(LoanStatus::Disbursed);
        active.loan_account_id = Set(Some(loan_account.id));
        active.disbursed_by = Set(Some(actor));
        active.disbursed_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            loan_application = %loan_application_id,
            reference = %posting.reference_number,
            amount = %amount,
            "loan disbursed"
        );

        let (charges_applied, charge_failures) =
            self.apply_pending_charges(loan_account.id, actor).await?;

        Ok(DisbursementOutcome {
            loan_application_id,
            loan_account_id: loan_account.id,
            reference_number: posting.reference_number,
            amount,
            charges_applied,
            charge_failures,
        })
    }

    /// Finds or creates the member's active loan account.
    async fn resolve_loan_account(
        txn: &sea_orm::DatabaseTransaction,
        loan: &loan_applications::Model,
        currency: &str,
    ) -> Result<accounts::Model, DisbursementError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Kind.eq(AccountKind::MemberLoan))
            .filter(accounts::Column::OwnerId.eq(loan.member_id))
            .filter(accounts::Column::Status.eq(AccountStatus::Active))
            .one(txn)
            .await?;

        if let Some(account) = existing {
            return Ok(account);
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(format!("Loan account for member {}", loan.member_id)),
            kind: Set(AccountKind::MemberLoan),
            owner_id: Set(Some(loan.member_id)),
            currency: Set(currency.to_string()),
            available_balance: Set(Decimal::ZERO),
            status: Set(AccountStatus::Active),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = account.insert(txn).await?;
        Ok(created)
    }

    /// Applies the member's pending charges, one independent posting each.
    ///
    /// A refused charge is recorded and skipped; the rest still apply.
    async fn apply_pending_charges(
        &self,
        loan_account_id: Uuid,
        actor: Uuid,
    ) -> Result<(Vec<ChargeApplication>, Vec<ChargeFailure>), DisbursementError> {
        let pending = self.charges.list_pending_for_account(loan_account_id).await?;

        let mut applied = Vec::new();
        let mut failures = Vec::new();

        for charge in pending {
            let input = SubmitPostingInput {
                reference_number: None,
                entries: vec![
                    ProposedEntry {
                        account_id: charge.account_id,
                        entry_type: EntryType::Debit,
                        amount: charge.amount,
                    },
                    ProposedEntry {
                        account_id: charge.gl_account_id,
                        entry_type: EntryType::Credit,
                        amount: charge.amount,
                    },
                ],
                created_by: actor,
                auto_approve: true,
            };

            match self.postings.submit_posting(input).await {
                Ok(posting) => {
                    self.charges
                        .mark_applied(charge.id, posting.reference_number.clone())
                        .await?;
                    applied.push(ChargeApplication {
                        charge_id: charge.id,
                        reference_number: posting.reference_number,
                        amount: charge.amount,
                    });
                }
                Err(e) => {
                    warn!(charge = %charge.id, error = %e, "charge application refused");
                    failures.push(ChargeFailure {
                        charge_id: charge.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok((applied, failures))
    }
}
