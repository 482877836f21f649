//! Charge repository for pending account fees.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{charges, sea_orm_active_enums::ChargeStatus};

/// Error types for charge operations.
#[derive(Debug, thiserror::Error)]
pub enum ChargeError {
    /// Charge not found.
    #[error("Charge not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for levying a charge against an account.
#[derive(Debug, Clone)]
pub struct CreateChargeInput {
    /// Member account the charge is levied against.
    pub account_id: Uuid,
    /// Fee income GL account credited when applied.
    pub gl_account_id: Uuid,
    /// Charge name (e.g. "loan processing fee").
    pub name: String,
    /// Charge amount.
    pub amount: Decimal,
}

/// Charge repository.
#[derive(Debug, Clone)]
pub struct ChargeRepository {
    db: DatabaseConnection,
}

impl ChargeRepository {
    /// Creates a new charge repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Levies a pending charge against an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_charge(&self, input: CreateChargeInput) -> Result<charges::Model, ChargeError> {
        let charge = charges::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(input.account_id),
            gl_account_id: Set(input.gl_account_id),
            name: Set(input.name),
            amount: Set(input.amount),
            status: Set(ChargeStatus::Pending),
            reference_number: Set(None),
            created_at: Set(Utc::now().into()),
            applied_at: Set(None),
        };

        let result = charge.insert(&self.db).await?;
        Ok(result)
    }

    /// Lists pending charges for an account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_pending_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<charges::Model>, ChargeError> {
        let pending = charges::Entity::find()
            .filter(charges::Column::AccountId.eq(account_id))
            .filter(charges::Column::Status.eq(ChargeStatus::Pending))
            .order_by_asc(charges::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(pending)
    }

    /// Marks a charge applied, recording the posting that applied it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the charge does not exist.
    pub async fn mark_applied(
        &self,
        charge_id: Uuid,
        reference_number: String,
    ) -> Result<charges::Model, ChargeError> {
        let charge = charges::Entity::find_by_id(charge_id)
            .one(&self.db)
            .await?
            .ok_or(ChargeError::NotFound(charge_id))?;

        let mut active: charges::ActiveModel = charge.into();
        active.status = Set(ChargeStatus::Applied);
        active.reference_number = Set(Some(reference_number));
        active.applied_at = Set(Some(Utc::now().into()));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
