//! Till repository for cashier cash-drawer operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::TillStatus, tills};

/// Error types for till operations.
#[derive(Debug, thiserror::Error)]
pub enum TillError {
    /// Till not found.
    #[error("Till not found: {0}")]
    NotFound(Uuid),

    /// The cashier already has an active till.
    #[error("Cashier {0} already has an active till")]
    CashierAlreadyAssigned(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a till.
#[derive(Debug, Clone)]
pub struct CreateTillInput {
    /// Display name for the till.
    pub name: String,
    /// The cashier operating this till.
    pub cashier_id: Uuid,
    /// The GL account backing this till.
    pub gl_account_id: Uuid,
    /// Maximum amount a single disbursement may draw.
    pub max_capacity: Decimal,
}

/// Till repository.
#[derive(Debug, Clone)]
pub struct TillRepository {
    db: DatabaseConnection,
}

impl TillRepository {
    /// Creates a new till repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a till for a cashier.
    ///
    /// A cashier can operate at most one active till at a time.
    ///
    /// # Errors
    ///
    /// Returns `CashierAlreadyAssigned` if the cashier has an active till.
    pub async fn create_till(&self, input: CreateTillInput) -> Result<tills::Model, TillError> {
        if self.find_active_by_cashier(input.cashier_id).await?.is_some() {
            return Err(TillError::CashierAlreadyAssigned(input.cashier_id));
        }

        let now = Utc::now().into();

        let till = tills::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            cashier_id: Set(input.cashier_id),
            gl_account_id: Set(input.gl_account_id),
            max_capacity: Set(input.max_capacity),
            status: Set(TillStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = till.insert(&self.db).await?;
        Ok(result)
    }

    /// Finds the active till operated by a cashier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_active_by_cashier(
        &self,
        cashier_id: Uuid,
    ) -> Result<Option<tills::Model>, TillError> {
        let till = tills::Entity::find()
            .filter(tills::Column::CashierId.eq(cashier_id))
            .filter(tills::Column::Status.eq(TillStatus::Active))
            .one(&self.db)
            .await?;

        Ok(till)
    }

    /// Closes a till.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the till does not exist.
    pub async fn close_till(&self, till_id: Uuid) -> Result<tills::Model, TillError> {
        let till = tills::Entity::find_by_id(till_id)
            .one(&self.db)
            .await?
            .ok_or(TillError::NotFound(till_id))?;

        let mut active: tills::ActiveModel = till.into();
        active.status = Set(TillStatus::Closed);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
