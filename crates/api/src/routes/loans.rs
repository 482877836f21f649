//! Loan disbursement routes.
//!
//! Loan application CRUD and sanctioning live upstream; this service only
//! performs disbursement.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::error_response;
use hazina_db::repositories::disbursement::{DisbursementError, DisbursementRepository};
use hazina_shared::types::{AccountId, LoanApplicationId, UserId};

/// Creates the loan routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/loans/{loan_id}/disburse", post(disburse_loan))
}

/// Request body for disbursing a loan.
#[derive(Debug, Deserialize)]
pub struct DisburseRequest {
    /// The cashier whose till funds the disbursement.
    pub cashier_id: UserId,
    /// The acting user recorded as disbursed_by.
    pub actor_id: UserId,
}

/// One applied charge in the disbursement response.
#[derive(Debug, Serialize)]
pub struct ChargeApplicationResponse {
    /// The charge ID.
    pub charge_id: uuid::Uuid,
    /// Reference number of the charge posting.
    pub reference_number: String,
    /// The charge amount.
    pub amount: String,
}

/// One refused charge in the disbursement response.
#[derive(Debug, Serialize)]
pub struct ChargeFailureResponse {
    /// The charge ID.
    pub charge_id: uuid::Uuid,
    /// Why it was refused.
    pub reason: String,
}

/// Response for a completed disbursement.
#[derive(Debug, Serialize)]
pub struct DisbursementResponse {
    /// The disbursed application.
    pub loan_application_id: LoanApplicationId,
    /// The credited loan account.
    pub loan_account_id: AccountId,
    /// Reference number of the funding posting.
    pub reference_number: String,
    /// The disbursed amount.
    pub amount: String,
    /// Charges applied after disbursement.
    pub charges_applied: Vec<ChargeApplicationResponse>,
    /// Charges the posting engine refused.
    pub charge_failures: Vec<ChargeFailureResponse>,
}

/// POST `/loans/{loan_id}/disburse` - disburse a sanctioned loan.
async fn disburse_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<LoanApplicationId>,
    Json(payload): Json<DisburseRequest>,
) -> impl IntoResponse {
    let repo = DisbursementRepository::new((*state.db).clone());

    match repo
        .disburse(
            loan_id.into_inner(),
            payload.cashier_id.into_inner(),
            payload.actor_id.into_inner(),
        )
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(DisbursementResponse {
                loan_application_id: LoanApplicationId::from_uuid(outcome.loan_application_id),
                loan_account_id: AccountId::from_uuid(outcome.loan_account_id),
                reference_number: outcome.reference_number,
                amount: outcome.amount.to_string(),
                charges_applied: outcome
                    .charges_applied
                    .into_iter()
                    .map(|c| ChargeApplicationResponse {
                        charge_id: c.charge_id,
                        reference_number: c.reference_number,
                        amount: c.amount.to_string(),
                    })
                    .collect(),
                charge_failures: outcome
                    .charge_failures
                    .into_iter()
                    .map(|c| ChargeFailureResponse {
                        charge_id: c.charge_id,
                        reason: c.reason,
                    })
                    .collect(),
            }),
        )
            .into_response(),
        Err(e) => disbursement_error_response(&e),
    }
}

fn disbursement_error_response(e: &DisbursementError) -> axum::response::Response {
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}
