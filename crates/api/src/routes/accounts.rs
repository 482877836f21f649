//! Account routes: onboarding, lookup, balance reads.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::error::{error_response, validation_error};
use hazina_db::entities::sea_orm_active_enums::{AccountKind, AccountStatus};
use hazina_db::entities::accounts;
use hazina_db::repositories::account::{AccountError, AccountRepository, CreateAccountInput};
use hazina_shared::types::{AccountId, Currency, MemberId};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}/balance", get(get_balance))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub name: String,
    /// Kind: "member_savings", "member_loan", or "gl".
    pub kind: String,
    /// Owning member; required for member accounts.
    pub owner_id: Option<MemberId>,
    /// ISO currency code.
    pub currency: String,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Kind.
    pub kind: String,
    /// Owning member, if any.
    pub owner_id: Option<Uuid>,
    /// Currency code.
    pub currency: String,
    /// Available balance.
    pub available_balance: String,
    /// Status.
    pub status: String,
    /// Created at timestamp.
    pub created_at: String,
}

/// Response for a balance read.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Account ID.
    pub account_id: AccountId,
    /// Available balance as last committed.
    pub available_balance: String,
    /// When the balance was last written.
    pub as_of: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/accounts` - create an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let Some(kind) = parse_account_kind(&payload.kind) else {
        return validation_error(format!("Invalid account kind: {}", payload.kind));
    };

    // Member accounts need an owner; GL accounts must not have one.
    match (&kind, payload.owner_id) {
        (AccountKind::Gl, Some(_)) => {
            return validation_error("GL accounts cannot have an owner");
        }
        (AccountKind::MemberSavings | AccountKind::MemberLoan, None) => {
            return validation_error("Member accounts require an owner");
        }
        _ => {}
    }

    let Ok(currency) = Currency::from_str(&payload.currency) else {
        return validation_error(format!("Unknown currency: {}", payload.currency));
    };

    let repo = AccountRepository::new((*state.db).clone());

    match repo
        .create_account(CreateAccountInput {
            name: payload.name,
            kind,
            owner_id: payload.owner_id.map(MemberId::into_inner),
            currency: currency.to_string(),
        })
        .await
    {
        Ok(account) => (StatusCode::CREATED, Json(account_response(account))).into_response(),
        Err(e) => account_error_response(&e),
    }
}

/// GET `/accounts/{account_id}` - account lookup.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.find_by_id(account_id.into_inner()).await {
        Ok(Some(account)) => (StatusCode::OK, Json(account_response(account))).into_response(),
        Ok(None) => account_error_response(&AccountError::NotFound(account_id.into_inner())),
        Err(e) => account_error_response(&e),
    }
}

/// GET `/accounts/{account_id}/balance` - committed balance read.
async fn get_balance(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.get_balance(account_id.into_inner()).await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(BalanceResponse {
                account_id: AccountId::from_uuid(snapshot.account_id),
                available_balance: snapshot.available_balance.to_string(),
                as_of: snapshot.as_of.to_rfc3339(),
            }),
        )
            .into_response(),
        Err(e) => account_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_account_kind(s: &str) -> Option<AccountKind> {
    match s.to_lowercase().as_str() {
        "member_savings" => Some(AccountKind::MemberSavings),
        "member_loan" => Some(AccountKind::MemberLoan),
        "gl" => Some(AccountKind::Gl),
        _ => None,
    }
}

fn account_response(account: accounts::Model) -> AccountResponse {
    AccountResponse {
        id: AccountId::from_uuid(account.id),
        name: account.name,
        kind: match account.kind {
            AccountKind::MemberSavings => "member_savings".to_string(),
            AccountKind::MemberLoan => "member_loan".to_string(),
            AccountKind::Gl => "gl".to_string(),
        },
        owner_id: account.owner_id,
        currency: account.currency,
        available_balance: account.available_balance.to_string(),
        status: match account.status {
            AccountStatus::Active => "active".to_string(),
            AccountStatus::Inactive => "inactive".to_string(),
        },
        created_at: account.created_at.to_rfc3339(),
    }
}

fn account_error_response(e: &AccountError) -> axum::response::Response {
    match e {
        AccountError::NotFound(id) => error_response(
            404,
            "ACCOUNT_NOT_FOUND",
            &format!("Account not found: {id}"),
        ),
        AccountError::Database(err) => {
            error!(error = %err, "account operation failed");
            error_response(500, "DATABASE_ERROR", "An error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("member_savings", Some(AccountKind::MemberSavings))]
    #[case("MEMBER_LOAN", Some(AccountKind::MemberLoan))]
    #[case("gl", Some(AccountKind::Gl))]
    #[case("checking", None)]
    fn test_parse_account_kind(#[case] input: &str, #[case] expected: Option<AccountKind>) {
        assert_eq!(parse_account_kind(input), expected);
    }
}
