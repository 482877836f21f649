//! Interest payout scheduling and processing.
//!
//! Scheduling computes the interest amount up front; processing turns a
//! pending payout into one balanced posting. Batch processing isolates
//! failures per item: a refused payout records its reason and stays
//! pending while the rest of the batch continues.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, prelude::DateTimeWithTimeZone,
};
use tracing::{info, warn};
use uuid::Uuid;

use hazina_core::interest::{InterestError, PayoutDirection, interest_for_period};
use hazina_core::ledger::{EntryType, ProposedEntry};

use crate::entities::{payouts, sea_orm_active_enums::PayoutStatus};
use crate::repositories::posting::{PostingError, PostingRepository, SubmitPostingInput};

/// Error types for payout operations.
#[derive(Debug, thiserror::Error)]
pub enum PayoutError {
    /// Payout not found.
    #[error("Payout not found: {0}")]
    NotFound(Uuid),

    /// Payout has already been processed.
    #[error("Payout {0} has already been processed")]
    AlreadyProcessed(Uuid),

    /// Interest calculation input error.
    #[error(transparent)]
    Interest(#[from] InterestError),

    /// The posting engine refused the payout posting; the payout stays
    /// pending with the reason recorded.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PayoutError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "PAYOUT_NOT_FOUND",
            Self::AlreadyProcessed(_) => "PAYOUT_ALREADY_PROCESSED",
            Self::Interest(_) => "INVALID_INTEREST_INPUT",
            Self::Posting(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::AlreadyProcessed(_) => 409,
            Self::Interest(_) => 400,
            Self::Posting(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Input for scheduling a payout.
#[derive(Debug, Clone)]
pub struct SchedulePayoutInput {
    /// Member savings or loan account.
    pub account_id: Uuid,
    /// Interest income or expense GL account.
    pub gl_account_id: Uuid,
    /// Payment (to the member) or collection (from the member).
    pub direction: PayoutDirection,
    /// Principal the interest accrues on.
    pub principal: Decimal,
    /// Annual rate as a fraction (0.12 = 12%).
    pub annual_rate: Decimal,
    /// Accrual period in days.
    pub period_days: u16,
    /// The user scheduling the payout.
    pub scheduled_by: Uuid,
}

/// One failed item of a batch run.
#[derive(Debug, Clone)]
pub struct PayoutFailure {
    /// The payout that failed.
    pub payout_id: Uuid,
    /// Why processing was refused.
    pub reason: String,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct PayoutBatchSummary {
    /// Payouts processed and posted.
    pub processed: Vec<Uuid>,
    /// Payouts refused; each stays pending with its reason recorded.
    pub failed: Vec<PayoutFailure>,
}

/// Payout repository.
#[derive(Debug, Clone)]
pub struct PayoutRepository {
    db: DatabaseConnection,
    postings: PostingRepository,
}

impl PayoutRepository {
    /// Creates a new payout repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            postings: PostingRepository::new(db.clone()),
            db,
        }
    }

    /// Schedules a payout, computing the interest amount up front.
    ///
    /// # Errors
    ///
    /// Returns `Interest` for out-of-range inputs.
    pub async fn schedule(&self, input: SchedulePayoutInput) -> Result<payouts::Model, PayoutError> {
        let amount =
            interest_for_period(input.principal, input.annual_rate, u32::from(input.period_days))?;

        let payout = payouts::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(input.account_id),
            gl_account_id: Set(input.gl_account_id),
            direction: Set(input.direction.into()),
            principal: Set(input.principal),
            annual_rate: Set(input.annual_rate),
            period_days: Set(i32::from(input.period_days)),
            amount: Set(amount),
            status: Set(PayoutStatus::Pending),
            reference_number: Set(None),
            failure_reason: Set(None),
            scheduled_by: Set(input.scheduled_by),
            created_at: Set(Utc::now().into()),
            processed_by: Set(None),
            processed_at: Set(None),
        };

        let result = payout.insert(&self.db).await?;

        info!(payout = %result.id, amount = %result.amount, "payout scheduled");

        Ok(result)
    }

    /// Processes one pending payout into a balanced posting.
    ///
    /// Direction payment: DEBIT the GL account, CREDIT the member account.
    /// Direction collection: DEBIT the member account, CREDIT the GL
    /// account. On success the payout becomes Processed, carrying the
    /// posting's reference number. On refusal the reason is recorded and
    /// the payout stays Pending, eligible for retry once corrected.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyProcessed` for a processed payout, `Posting` when
    /// the engine refuses the pair.
    pub async fn process(&self, payout_id: Uuid, actor: Uuid) -> Result<payouts::Model, PayoutError> {
        let payout = payouts::Entity::find_by_id(payout_id)
            .one(&self.db)
            .await?
            .ok_or(PayoutError::NotFound(payout_id))?;

        if payout.status == PayoutStatus::Processed {
            return Err(PayoutError::AlreadyProcessed(payout_id));
        }

        let direction: PayoutDirection = payout.direction.clone().into();
        let (debit_account, credit_account) = match direction {
            PayoutDirection::Payment => (payout.gl_account_id, payout.account_id),
            PayoutDirection::Collection => (payout.account_id, payout.gl_account_id),
        };

        let input = SubmitPostingInput {
            reference_number: None,
            entries: vec![
                ProposedEntry {
                    account_id: debit_account,
                    entry_type: EntryType::Debit,
                    amount: payout.amount,
                },
                ProposedEntry {
                    account_id: credit_account,
                    entry_type: EntryType::Credit,
                    amount: payout.amount,
                },
            ],
            created_by: actor,
            auto_approve: true,
        };

        match self.postings.submit_posting(input).await {
            Ok(posting) => {
                let now: DateTimeWithTimeZone = Utc::now().into();
                let mut active: payouts::ActiveModel = payout.into();
                active.status = Set(PayoutStatus::Processed);
                active.reference_number = Set(Some(posting.reference_number));
                active.failure_reason = Set(None);
                active.processed_by = Set(Some(actor));
                active.processed_at = Set(Some(now));

                let updated = active.update(&self.db).await?;

                info!(payout = %payout_id, reference = ?updated.reference_number, "payout processed");

                Ok(updated)
            }
            Err(e) => {
                warn!(payout = %payout_id, error = %e, "payout processing refused");

                let mut active: payouts::ActiveModel = payout.into();
                active.failure_reason = Set(Some(e.to_string()));
                active.update(&self.db).await?;

                Err(e.into())
            }
        }
    }

    /// Processes every pending payout, isolating failures per item.
    ///
    /// A refused payout is recorded in the summary and left pending; the
    /// remaining items still run, each in its own storage transaction.
    ///
    /// # Errors
    ///
    /// Returns an error only if listing the pending payouts fails.
    pub async fn process_pending(&self, actor: Uuid) -> Result<PayoutBatchSummary, PayoutError> {
        let pending = payouts::Entity::find()
            .filter(payouts::Column::Status.eq(PayoutStatus::Pending))
            .order_by_asc(payouts::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut summary = PayoutBatchSummary::default();

        for payout in pending {
            match self.process(payout.id, actor).await {
                Ok(processed) => summary.processed.push(processed.id),
                Err(e) => summary.failed.push(PayoutFailure {
                    payout_id: payout.id,
                    reason: e.to_string(),
                }),
            }
        }

        info!(
            processed = summary.processed.len(),
            failed = summary.failed.len(),
            "payout batch complete"
        );

        Ok(summary)
    }

    /// Finds a payout by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the payout does not exist.
    pub async fn find_by_id(&self, payout_id: Uuid) -> Result<payouts::Model, PayoutError> {
        payouts::Entity::find_by_id(payout_id)
            .one(&self.db)
            .await?
            .ok_or(PayoutError::NotFound(payout_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_error_codes() {
        assert_eq!(
            PayoutError::NotFound(Uuid::nil()).error_code(),
            "PAYOUT_NOT_FOUND"
        );
        assert_eq!(PayoutError::NotFound(Uuid::nil()).http_status_code(), 404);
        assert_eq!(
            PayoutError::AlreadyProcessed(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            PayoutError::Interest(InterestError::ZeroPeriod).http_status_code(),
            400
        );
    }

    #[test]
    fn test_posting_error_code_passes_through() {
        let err = PayoutError::Posting(PostingError::from(
            hazina_core::ledger::LedgerError::NonPositiveAmount,
        ));
        assert_eq!(err.error_code(), "NON_POSITIVE_AMOUNT");
        assert_eq!(err.http_status_code(), 400);
    }
}
