//! Account repository for ledger account database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{
    accounts,
    sea_orm_active_enums::{AccountKind, AccountStatus},
};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name for the account.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Owning member; None for GL accounts.
    pub owner_id: Option<Uuid>,
    /// ISO currency code.
    pub currency: String,
}

/// Committed balance read for an account.
#[derive(Debug, Clone)]
pub struct BalanceSnapshot {
    /// The account ID.
    pub account_id: Uuid,
    /// Available balance as last committed.
    pub available_balance: Decimal,
    /// When the balance was last written.
    pub as_of: DateTime<Utc>,
}

/// Account repository for CRUD operations and balance reads.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new active account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let now = Utc::now().into();

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            kind: Set(input.kind),
            owner_id: Set(input.owner_id),
            currency: Set(input.currency),
            available_balance: Set(Decimal::ZERO),
            status: Set(AccountStatus::Active),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = account.insert(&self.db).await?;
        Ok(result)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, account_id: Uuid) -> Result<Option<accounts::Model>, AccountError> {
        let account = accounts::Entity::find_by_id(account_id).one(&self.db).await?;
        Ok(account)
    }

    /// Reads the committed balance of an account.
    ///
    /// Read-only: takes no locks and never observes an in-flight posting,
    /// since balances are written only inside committed transactions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn get_balance(&self, account_id: Uuid) -> Result<BalanceSnapshot, AccountError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        Ok(BalanceSnapshot {
            account_id: account.id,
            available_balance: account.available_balance,
            as_of: account.updated_at.to_utc(),
        })
    }

    /// Updates an account's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn set_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let mut active: accounts::ActiveModel = account.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Finds a member's loan account, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_member_loan_account(
        &self,
        member_id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Kind.eq(AccountKind::MemberLoan))
            .filter(accounts::Column::OwnerId.eq(member_id))
            .filter(accounts::Column::Status.eq(AccountStatus::Active))
            .one(&self.db)
            .await?;

        Ok(account)
    }
}
