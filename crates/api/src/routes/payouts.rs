//! Payout routes: schedule, process one, process the pending batch.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::AppState;
use crate::error::{error_response, validation_error};
use hazina_core::interest::PayoutDirection;
use hazina_db::entities::payouts;
use hazina_db::entities::sea_orm_active_enums::{self as db_enums};
use hazina_db::repositories::payout::{PayoutError, PayoutRepository, SchedulePayoutInput};
use hazina_shared::types::{AccountId, PayoutId, UserId};

/// Creates the payout routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payouts", post(schedule_payout))
        .route("/payouts/{payout_id}/process", post(process_payout))
        .route("/payouts/process-pending", post(process_pending))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for scheduling a payout.
#[derive(Debug, Deserialize)]
pub struct SchedulePayoutRequest {
    /// Member savings or loan account.
    pub account_id: AccountId,
    /// Interest income or expense GL account.
    pub gl_account_id: AccountId,
    /// Direction: "payment" or "collection".
    pub direction: String,
    /// Principal (positive decimal string).
    pub principal: String,
    /// Annual rate as a fraction (e.g. "0.12").
    pub annual_rate: String,
    /// Accrual period in days.
    pub period_days: u16,
    /// The scheduling user.
    pub actor_id: UserId,
}

/// Request body for processing a payout.
#[derive(Debug, Deserialize)]
pub struct ProcessPayoutRequest {
    /// The acting user.
    pub actor_id: UserId,
}

/// Response for a payout.
#[derive(Debug, Serialize)]
pub struct PayoutResponse {
    /// Payout ID.
    pub id: PayoutId,
    /// Member account.
    pub account_id: AccountId,
    /// GL account.
    pub gl_account_id: AccountId,
    /// Direction.
    pub direction: String,
    /// Principal.
    pub principal: String,
    /// Annual rate.
    pub annual_rate: String,
    /// Period in days.
    pub period_days: i32,
    /// Computed interest amount.
    pub amount: String,
    /// Status.
    pub status: String,
    /// Posting reference, when processed.
    pub reference_number: Option<String>,
    /// Last recorded failure reason, if any.
    pub failure_reason: Option<String>,
}

/// One failed item of a batch run.
#[derive(Debug, Serialize)]
pub struct PayoutFailureResponse {
    /// The payout that failed.
    pub payout_id: PayoutId,
    /// Why processing was refused.
    pub reason: String,
}

/// Response for a batch run.
#[derive(Debug, Serialize)]
pub struct BatchSummaryResponse {
    /// Payouts processed and posted.
    pub processed: Vec<PayoutId>,
    /// Payouts refused; each stays pending with its reason recorded.
    pub failed: Vec<PayoutFailureResponse>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/payouts` - schedule an interest payout.
async fn schedule_payout(
    State(state): State<AppState>,
    Json(payload): Json<SchedulePayoutRequest>,
) -> impl IntoResponse {
    let Some(direction) = PayoutDirection::parse(&payload.direction) else {
        return validation_error(format!("Invalid direction: {}", payload.direction));
    };
    let Ok(principal) = Decimal::from_str(&payload.principal) else {
        return validation_error(format!("Invalid principal: {}", payload.principal));
    };
    let Ok(annual_rate) = Decimal::from_str(&payload.annual_rate) else {
        return validation_error(format!("Invalid rate: {}", payload.annual_rate));
    };

    let repo = PayoutRepository::new((*state.db).clone());

    match repo
        .schedule(SchedulePayoutInput {
            account_id: payload.account_id.into_inner(),
            gl_account_id: payload.gl_account_id.into_inner(),
            direction,
            principal,
            annual_rate,
            period_days: payload.period_days,
            scheduled_by: payload.actor_id.into_inner(),
        })
        .await
    {
        Ok(payout) => (StatusCode::CREATED, Json(payout_response(payout))).into_response(),
        Err(e) => payout_error_response(&e),
    }
}

/// POST `/payouts/{payout_id}/process` - process one pending payout.
async fn process_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<PayoutId>,
    Json(payload): Json<ProcessPayoutRequest>,
) -> impl IntoResponse {
    let repo = PayoutRepository::new((*state.db).clone());

    match repo
        .process(payout_id.into_inner(), payload.actor_id.into_inner())
        .await
    {
        Ok(payout) => (StatusCode::OK, Json(payout_response(payout))).into_response(),
        Err(e) => payout_error_response(&e),
    }
}

/// POST `/payouts/process-pending` - run the pending batch.
async fn process_pending(
    State(state): State<AppState>,
    Json(payload): Json<ProcessPayoutRequest>,
) -> impl IntoResponse {
    let repo = PayoutRepository::new((*state.db).clone());

    match repo.process_pending(payload.actor_id.into_inner()).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(BatchSummaryResponse {
                processed: summary.processed.into_iter().map(PayoutId::from_uuid).collect(),
                failed: summary
                    .failed
                    .into_iter()
                    .map(|f| PayoutFailureResponse {
                        payout_id: PayoutId::from_uuid(f.payout_id),
                        reason: f.reason,
                    })
                    .collect(),
            }),
        )
            .into_response(),
        Err(e) => payout_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn payout_response(payout: payouts::Model) -> PayoutResponse {
    PayoutResponse {
        id: PayoutId::from_uuid(payout.id),
        account_id: AccountId::from_uuid(payout.account_id),
        gl_account_id: AccountId::from_uuid(payout.gl_account_id),
        direction: match payout.direction {
            db_enums::PayoutDirection::Payment => "payment".to_string(),
            db_enums::PayoutDirection::Collection => "collection".to_string(),
        },
        principal: payout.principal.to_string(),
        annual_rate: payout.annual_rate.to_string(),
        period_days: payout.period_days,
        amount: payout.amount.to_string(),
        status: match payout.status {
            db_enums::PayoutStatus::Pending => "pending".to_string(),
            db_enums::PayoutStatus::Processed => "processed".to_string(),
        },
        reference_number: payout.reference_number,
        failure_reason: payout.failure_reason,
    }
}

fn payout_error_response(e: &PayoutError) -> axum::response::Response {
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}
