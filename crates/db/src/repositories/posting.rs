//! Posting repository: the double-entry posting engine's storage layer.
//!
//! Every operation here runs inside a single database transaction per
//! reference number. Validation is delegated to `hazina-core`; this module
//! owns persistence, row locking, and balance application.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone,
};
use tracing::info;
use uuid::Uuid;

use hazina_core::approval::{
    ApprovalAction, ApprovalError, ApprovalService, EntryStatus as CoreEntryStatus,
    SelfApprovalPolicy,
};
use hazina_core::ledger::{
    AccountInfo, LedgerError, PostingService, ProposedEntry, generate_reference_number,
};

use crate::entities::{
    accounts,
    sea_orm_active_enums::{AccountStatus, EntryStatus},
    transaction_entries,
};

/// Error types for posting operations.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// Posting validation or reference error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Approval transition error.
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::Approval(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Ledger(e) => e.http_status_code(),
            Self::Approval(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns true if resubmitting the same posting is safe.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_retryable())
    }
}

/// Input for submitting a posting.
#[derive(Debug, Clone)]
pub struct SubmitPostingInput {
    /// Caller-supplied reference number; generated when absent.
    pub reference_number: Option<String>,
    /// The proposed legs, validated as one balanced set.
    pub entries: Vec<ProposedEntry>,
    /// The user submitting the posting.
    pub created_by: Uuid,
    /// Persist directly as Approved, applying balances in the same
    /// transaction. Reserved for pre-authorized callers (orchestrators).
    pub auto_approve: bool,
}

/// Result of a submitted posting.
#[derive(Debug, Clone)]
pub struct SubmittedPosting {
    /// The reference number shared by all legs.
    pub reference_number: String,
    /// IDs of the persisted legs, in submission order.
    pub entry_ids: Vec<Uuid>,
    /// Status the legs were persisted with.
    pub status: EntryStatus,
}

/// A posting with all of its legs, as read back by reference number.
#[derive(Debug, Clone)]
pub struct PostingWithEntries {
    /// The reference number.
    pub reference_number: String,
    /// The status shared by all legs.
    pub status: EntryStatus,
    /// The legs, in insertion order.
    pub entries: Vec<transaction_entries::Model>,
}

/// Result of an approve/reject call.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// The reference number.
    pub reference_number: String,
    /// The new status of every leg.
    pub status: EntryStatus,
    /// IDs of the legs that transitioned.
    pub updated_entry_ids: Vec<Uuid>,
}

/// Posting repository: persists balanced postings and applies approvals.
#[derive(Debug, Clone)]
pub struct PostingRepository {
    db: DatabaseConnection,
}

impl PostingRepository {
    /// Creates a new posting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a posting: validates the legs and persists them atomically.
    ///
    /// On any validation failure nothing is persisted and no balance is
    /// mutated; the enclosing transaction rolls back as a whole.
    ///
    /// # Errors
    ///
    /// Returns `PostingError::Ledger` for validation failures and
    /// `PostingError::Database` for storage failures. After a storage
    /// failure the true outcome must be resolved with
    /// [`find_by_reference`](Self::find_by_reference) before retrying.
    pub async fn submit_posting(
        &self,
        input: SubmitPostingInput,
    ) -> Result<SubmittedPosting, PostingError> {
        let reference = input
            .reference_number
            .clone()
            .unwrap_or_else(generate_reference_number);

        let txn = self.db.begin().await?;
        let outcome = Self::submit_in_txn(&txn, &reference, &input).await?;
        txn.commit().await?;

        info!(
            reference = %outcome.reference_number,
            legs = outcome.entry_ids.len(),
            status = ?outcome.status,
            "posting submitted"
        );

        Ok(outcome)
    }

    /// Submits a posting inside an existing transaction.
    ///
    /// Orchestrators use this to combine a posting with their own state
    /// change (e.g. marking a loan disbursed) under one commit. The
    /// transaction must not span more than one reference number.
    pub(crate) async fn submit_in_txn(
        txn: &DatabaseTransaction,
        reference: &str,
        input: &SubmitPostingInput,
    ) -> Result<SubmittedPosting, PostingError> {
        // Idempotence guard: a reference that already has legs (even soft
        // deleted ones) is never written again.
        let existing = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::ReferenceNumber.eq(reference))
            .limit(1)
            .one(txn)
            .await?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateReference(reference.to_string()).into());
        }

        // Load every referenced account; when balances will be applied in
        // this transaction, take the row locks now, in ascending id order.
        let account_ids = unique_sorted_account_ids(&input.entries);
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids.iter().copied()))
            .order_by_asc(accounts::Column::Id);
        if input.auto_approve {
            query = query.lock_exclusive();
        }
        let account_map: HashMap<Uuid, accounts::Model> = query
            .all(txn)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        PostingService::validate(&input.entries, |id| {
            let account = account_map
                .get(&id)
                .ok_or(LedgerError::AccountNotFound(id))?;
            Ok(AccountInfo {
                id,
                is_active: account.status == AccountStatus::Active,
            })
        })?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let status = if input.auto_approve {
            EntryStatus::Approved
        } else {
            EntryStatus::Pending
        };

        let mut entry_ids = Vec::with_capacity(input.entries.len());
        for entry in &input.entries {
            let entry_id = Uuid::new_v4();
            let row = transaction_entries::ActiveModel {
                id: Set(entry_id),
                reference_number: Set(reference.to_string()),
                account_id: Set(entry.account_id),
                entry_type: Set(entry.entry_type.into()),
                amount: Set(entry.amount),
                status: Set(status.clone()),
                remarks: Set(None),
                created_by: Set(input.created_by),
                created_at: Set(now),
                approved_by: Set(input.auto_approve.then_some(input.created_by)),
                approved_at: Set(input.auto_approve.then_some(now)),
                deleted: Set(false),
            };
            row.insert(txn).await?;
            entry_ids.push(entry_id);
        }

        if input.auto_approve {
            for account_id in &account_ids {
                let net = PostingService::net_effect(&input.entries, *account_id);
                let account = account_map
                    .get(account_id)
                    .ok_or(LedgerError::AccountNotFound(*account_id))?;
                Self::apply_balance_change(txn, account, net).await?;
            }
        }

        Ok(SubmittedPosting {
            reference_number: reference.to_string(),
            entry_ids,
            status,
        })
    }

    /// Reads a posting back by reference number.
    ///
    /// Safe to call after a timeout to resolve an unknown outcome: this
    /// never writes, and an absent reference means the submit did not
    /// commit.
    ///
    /// # Errors
    ///
    /// Returns `PostingNotFound` when no legs exist under the reference.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<PostingWithEntries, PostingError> {
        let entries = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::ReferenceNumber.eq(reference))
            .filter(transaction_entries::Column::Deleted.eq(false))
            .order_by_asc(transaction_entries::Column::Id)
            .all(&self.db)
            .await?;

        let Some(first) = entries.first() else {
            return Err(LedgerError::PostingNotFound(reference.to_string()).into());
        };

        Ok(PostingWithEntries {
            reference_number: reference.to_string(),
            status: first.status.clone(),
            entries,
        })
    }

    /// Approves or rejects every leg under a reference number.
    ///
    /// Approval applies each account's net balance change in the same
    /// transaction that flips the statuses, so an approved posting is
    /// always fully applied or not at all. Rejection requires remarks and
    /// never touches balances.
    ///
    /// # Errors
    ///
    /// Returns `PostingNotFound` for an unknown reference,
    /// `PostingError::Approval` for invalid transitions or policy refusals,
    /// `ConcurrentModification` when a balance row changed underneath.
    pub async fn set_reference_status(
        &self,
        reference: &str,
        new_status: CoreEntryStatus,
        actor: Uuid,
        remarks: Option<String>,
        policy: SelfApprovalPolicy,
    ) -> Result<StatusUpdate, PostingError> {
        let txn = self.db.begin().await?;
        let update =
            Self::set_status_in_txn(&txn, reference, new_status, actor, remarks, policy).await?;
        txn.commit().await?;

        info!(
            reference = %update.reference_number,
            status = ?update.status,
            legs = update.updated_entry_ids.len(),
            "posting status updated"
        );

        Ok(update)
    }

    /// Status transition inside an existing transaction.
    async fn set_status_in_txn(
        txn: &DatabaseTransaction,
        reference: &str,
        new_status: CoreEntryStatus,
        actor: Uuid,
        remarks: Option<String>,
        policy: SelfApprovalPolicy,
    ) -> Result<StatusUpdate, PostingError> {
        // Lock the legs so concurrent approvals of the same reference
        // serialize; all legs share one status by construction.
        let entries = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::ReferenceNumber.eq(reference))
            .filter(transaction_entries::Column::Deleted.eq(false))
            .order_by_asc(transaction_entries::Column::Id)
            .lock_exclusive()
            .all(txn)
            .await?;

        let Some(first) = entries.first() else {
            return Err(LedgerError::PostingNotFound(reference.to_string()).into());
        };

        let current: CoreEntryStatus = first.status.clone().into();
        let creators: Vec<Uuid> = entries.iter().map(|e| e.created_by).collect();

        let action = match new_status {
            CoreEntryStatus::Approved => {
                ApprovalService::approve(current, actor, &creators, policy, remarks)?
            }
            CoreEntryStatus::Rejected => {
                ApprovalService::reject(current, actor, remarks.unwrap_or_default())?
            }
            CoreEntryStatus::Pending => {
                return Err(ApprovalError::InvalidTransition {
                    from: current,
                    to: CoreEntryStatus::Pending,
                }
                .into());
            }
        };

        let db_status: EntryStatus = action.new_status().into();
        let now: DateTimeWithTimeZone = Utc::now().into();

        let action_remarks = match &action {
            ApprovalAction::Approve { remarks, .. } => remarks.clone(),
            ApprovalAction::Reject { remarks, .. } => Some(remarks.clone()),
        };

        // One statement flips every leg together.
        let mut update = transaction_entries::Entity::update_many()
            .col_expr(
                transaction_entries::Column::Status,
                Expr::value(db_status.clone()),
            )
            .col_expr(transaction_entries::Column::ApprovedBy, Expr::value(Some(actor)))
            .col_expr(transaction_entries::Column::ApprovedAt, Expr::value(Some(now)));
        if let Some(r) = action_remarks {
            update = update.col_expr(transaction_entries::Column::Remarks, Expr::value(Some(r)));
        }
        update
            .filter(transaction_entries::Column::ReferenceNumber.eq(reference))
            .filter(transaction_entries::Column::Deleted.eq(false))
            .exec(txn)
            .await?;

        if action.new_status() == CoreEntryStatus::Approved {
            let proposed: Vec<ProposedEntry> = entries
                .iter()
                .map(|e| ProposedEntry {
                    account_id: e.account_id,
                    entry_type: e.entry_type.clone().into(),
                    amount: e.amount,
                })
                .collect();

            let account_ids = unique_sorted_account_ids(&proposed);
            let account_map: HashMap<Uuid, accounts::Model> = accounts::Entity::find()
                .filter(accounts::Column::Id.is_in(account_ids.iter().copied()))
                .order_by_asc(accounts::Column::Id)
                .lock_exclusive()
                .all(txn)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect();

            for account_id in &account_ids {
                let net = PostingService::net_effect(&proposed, *account_id);
                let account = account_map
                    .get(account_id)
                    .ok_or(LedgerError::AccountNotFound(*account_id))?;
                Self::apply_balance_change(txn, account, net).await?;
            }
        }

        Ok(StatusUpdate {
            reference_number: reference.to_string(),
            status: db_status,
            updated_entry_ids: entries.iter().map(|e| e.id).collect(),
        })
    }

    /// Applies a signed balance change to an account row.
    ///
    /// The row is already locked by the caller; the version filter is a
    /// second guard that turns any interleaving into a retryable conflict
    /// instead of a silent lost update.
    async fn apply_balance_change(
        txn: &DatabaseTransaction,
        account: &accounts::Model,
        net: Decimal,
    ) -> Result<(), PostingError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::AvailableBalance,
                Expr::value(account.available_balance + net),
            )
            .col_expr(accounts::Column::Version, Expr::value(account.version + 1))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
            .filter(accounts::Column::Id.eq(account.id))
            .filter(accounts::Column::Version.eq(account.version))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(LedgerError::ConcurrentModification(account.id).into());
        }

        Ok(())
    }
}

/// Unique account IDs of a set of legs, in ascending order.
///
/// Locks are always taken in this order so concurrent postings touching
/// the same accounts cannot deadlock.
fn unique_sorted_account_ids(entries: &[ProposedEntry]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = entries.iter().map(|e| e.account_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazina_core::ledger::EntryType as CoreEntryType;
    use rust_decimal_macros::dec;

    fn make_leg(account_id: Uuid, entry_type: CoreEntryType, amount: Decimal) -> ProposedEntry {
        ProposedEntry {
            account_id,
            entry_type,
            amount,
        }
    }

    #[test]
    fn test_unique_sorted_account_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let entries = vec![
            make_leg(b, CoreEntryType::Debit, dec!(10)),
            make_leg(a, CoreEntryType::Credit, dec!(5)),
            make_leg(b, CoreEntryType::Credit, dec!(5)),
        ];

        let ids = unique_sorted_account_ids(&entries);

        assert_eq!(ids.len(), 2);
        assert!(ids[0] < ids[1]);
        assert!(ids.contains(&a));
        assert!(ids.contains(&b));
    }

    #[test]
    fn test_posting_error_delegates_codes() {
        let err = PostingError::from(LedgerError::InsufficientEntries);
        assert_eq!(err.error_code(), "INSUFFICIENT_ENTRIES");
        assert_eq!(err.http_status_code(), 400);
        assert!(!err.is_retryable());

        let err = PostingError::from(LedgerError::ConcurrentModification(Uuid::nil()));
        assert_eq!(err.http_status_code(), 409);
        assert!(err.is_retryable());

        let err = PostingError::from(ApprovalError::RemarksRequired);
        assert_eq!(err.error_code(), "REMARKS_REQUIRED");
        assert_eq!(err.http_status_code(), 400);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn legs_strategy() -> impl Strategy<Value = Vec<ProposedEntry>> {
            prop::collection::vec(
                ((0u8..4), (1i64..1_000_000i64)).prop_map(|(slot, n)| ProposedEntry {
                    // A small pool of account IDs so duplicates occur often.
                    account_id: Uuid::from_u128(u128::from(slot) + 1),
                    entry_type: if n % 2 == 0 {
                        CoreEntryType::Debit
                    } else {
                        CoreEntryType::Credit
                    },
                    amount: Decimal::new(n, 2),
                }),
                1..20,
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// Lock ordering is total: the id list is strictly ascending and
            /// covers every account exactly once.
            #[test]
            fn prop_lock_order_strict_and_complete(entries in legs_strategy()) {
                let ids = unique_sorted_account_ids(&entries);

                for window in ids.windows(2) {
                    prop_assert!(window[0] < window[1]);
                }
                for entry in &entries {
                    prop_assert!(ids.contains(&entry.account_id));
                }
                let distinct: std::collections::HashSet<_> =
                    entries.iter().map(|e| e.account_id).collect();
                prop_assert_eq!(ids.len(), distinct.len());
            }

            /// The per-account net effects of a set of legs always sum to the
            /// credit total minus the debit total.
            #[test]
            fn prop_net_effects_sum_to_totals(entries in legs_strategy()) {
                let ids = unique_sorted_account_ids(&entries);
                let net_sum: Decimal = ids
                    .iter()
                    .map(|id| PostingService::net_effect(&entries, *id))
                    .sum();

                let totals = PostingService::calculate_totals(&entries);
                prop_assert_eq!(net_sum, totals.credit_total - totals.debit_total);
            }
        }
    }
}
