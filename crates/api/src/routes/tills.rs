//! Till registration routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::error::{error_response, validation_error};
use hazina_db::repositories::till::{CreateTillInput, TillError, TillRepository};
use hazina_shared::types::{AccountId, TillId, UserId};

/// Creates the till routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/tills", post(create_till))
}

/// Request body for registering a till.
#[derive(Debug, Deserialize)]
pub struct CreateTillRequest {
    /// Display name.
    pub name: String,
    /// The cashier operating this till.
    pub cashier_id: UserId,
    /// The GL account backing this till.
    pub gl_account_id: AccountId,
    /// Maximum single-disbursement amount (positive decimal string).
    pub max_capacity: String,
}

/// Response for a till.
#[derive(Debug, Serialize)]
pub struct TillResponse {
    /// Till ID.
    pub id: TillId,
    /// Display name.
    pub name: String,
    /// The cashier.
    pub cashier_id: Uuid,
    /// The backing GL account.
    pub gl_account_id: AccountId,
    /// Maximum capacity.
    pub max_capacity: String,
    /// Status.
    pub status: String,
}

/// POST `/tills` - register a till for a cashier.
async fn create_till(
    State(state): State<AppState>,
    Json(payload): Json<CreateTillRequest>,
) -> impl IntoResponse {
    let Ok(max_capacity) = Decimal::from_str(&payload.max_capacity) else {
        return validation_error(format!("Invalid capacity: {}", payload.max_capacity));
    };
    if max_capacity <= Decimal::ZERO {
        return validation_error("Till capacity must be positive");
    }

    let repo = TillRepository::new((*state.db).clone());

    match repo
        .create_till(CreateTillInput {
            name: payload.name,
            cashier_id: payload.cashier_id.into_inner(),
            gl_account_id: payload.gl_account_id.into_inner(),
            max_capacity,
        })
        .await
    {
        Ok(till) => (
            StatusCode::CREATED,
            Json(TillResponse {
                id: TillId::from_uuid(till.id),
                name: till.name,
                cashier_id: till.cashier_id,
                gl_account_id: AccountId::from_uuid(till.gl_account_id),
                max_capacity: till.max_capacity.to_string(),
                status: "active".to_string(),
            }),
        )
            .into_response(),
        Err(e) => till_error_response(&e),
    }
}

fn till_error_response(e: &TillError) -> axum::response::Response {
    match e {
        TillError::NotFound(id) => {
            error_response(404, "TILL_NOT_FOUND", &format!("Till not found: {id}"))
        }
        TillError::CashierAlreadyAssigned(id) => error_response(
            409,
            "CASHIER_ALREADY_ASSIGNED",
            &format!("Cashier {id} already has an active till"),
        ),
        TillError::Database(err) => {
            error!(error = %err, "till operation failed");
            error_response(500, "DATABASE_ERROR", "An error occurred")
        }
    }
}
