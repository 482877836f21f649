//! Posting routes: submit, re-query, approve/reject.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{error_response, validation_error};
use crate::AppState;
use hazina_core::approval::{EntryStatus, SelfApprovalPolicy};
use hazina_core::ledger::{EntryType, ProposedEntry};
use hazina_db::entities::sea_orm_active_enums as db_enums;
use hazina_db::repositories::posting::{PostingError, PostingRepository, SubmitPostingInput};
use hazina_shared::types::{AccountId, EntryId, UserId};

/// Creates the posting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/postings", post(submit_posting))
        .route("/postings/{reference}", get(get_posting))
        .route("/postings/{reference}/status", post(set_posting_status))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting a posting.
#[derive(Debug, Deserialize)]
pub struct SubmitPostingRequest {
    /// Optional caller-supplied reference number.
    pub reference_number: Option<String>,
    /// The proposed legs.
    pub entries: Vec<EntryRequest>,
    /// The submitting user.
    pub actor_id: UserId,
    /// Persist directly as approved (pre-authorized callers only).
    #[serde(default)]
    pub auto_approve: bool,
}

/// Request body for a single leg.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// Account ID.
    pub account_id: AccountId,
    /// Entry type: "debit" or "credit".
    pub entry_type: String,
    /// Amount (positive decimal string).
    pub amount: String,
}

/// Request body for approving or rejecting a posting.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// Target status: "approved" or "rejected".
    pub status: String,
    /// The acting user.
    pub actor_id: UserId,
    /// Approval notes or rejection reason (required for rejection).
    pub remarks: Option<String>,
    /// Allow the creator to approve their own posting.
    #[serde(default)]
    pub allow_self_approval: bool,
}

/// Response for a submitted posting.
#[derive(Debug, Serialize)]
pub struct SubmitPostingResponse {
    /// The reference number shared by all legs.
    pub reference_number: String,
    /// IDs of the persisted legs.
    pub entry_ids: Vec<EntryId>,
    /// Status the legs were persisted with.
    pub status: String,
}

/// Response for a single persisted leg.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: EntryId,
    /// Account ID.
    pub account_id: AccountId,
    /// Entry type.
    pub entry_type: String,
    /// Amount.
    pub amount: String,
    /// Status.
    pub status: String,
    /// Remarks.
    pub remarks: Option<String>,
    /// Created by.
    pub created_by: Uuid,
    /// Created at timestamp.
    pub created_at: String,
    /// Approval decision actor, when resolved.
    pub approved_by: Option<Uuid>,
    /// Approval decision timestamp, when resolved.
    pub approved_at: Option<String>,
}

/// Response for a posting read back by reference.
#[derive(Debug, Serialize)]
pub struct PostingResponse {
    /// The reference number.
    pub reference_number: String,
    /// The status shared by all legs.
    pub status: String,
    /// The legs.
    pub entries: Vec<EntryResponse>,
}

/// Response for a status update.
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    /// The reference number.
    pub reference_number: String,
    /// The new status.
    pub status: String,
    /// IDs of the legs that transitioned.
    pub updated_entry_ids: Vec<EntryId>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/postings` - submit a balanced posting.
async fn submit_posting(
    State(state): State<AppState>,
    Json(payload): Json<SubmitPostingRequest>,
) -> impl IntoResponse {
    let entries = match parse_entries(&payload.entries) {
        Ok(entries) => entries,
        Err(response) => return response,
    };

    let repo = PostingRepository::new((*state.db).clone());

    match repo
        .submit_posting(SubmitPostingInput {
            reference_number: payload.reference_number,
            entries,
            created_by: payload.actor_id.into_inner(),
            auto_approve: payload.auto_approve,
        })
        .await
    {
        Ok(submitted) => (
            StatusCode::CREATED,
            Json(SubmitPostingResponse {
                reference_number: submitted.reference_number,
                entry_ids: submitted
                    .entry_ids
                    .into_iter()
                    .map(EntryId::from_uuid)
                    .collect(),
                status: entry_status_str(&submitted.status).to_string(),
            }),
        )
            .into_response(),
        Err(e) => posting_error_response(&e),
    }
}

/// GET `/postings/{reference}` - stable re-query by reference number.
async fn get_posting(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> impl IntoResponse {
    let repo = PostingRepository::new((*state.db).clone());

    match repo.find_by_reference(&reference).await {
        Ok(posting) => {
            let entries = posting
                .entries
                .into_iter()
                .map(|e| EntryResponse {
                    id: EntryId::from_uuid(e.id),
                    account_id: AccountId::from_uuid(e.account_id),
                    entry_type: match e.entry_type {
                        db_enums::EntryType::Debit => "debit".to_string(),
                        db_enums::EntryType::Credit => "credit".to_string(),
                    },
                    amount: e.amount.to_string(),
                    status: entry_status_str(&e.status).to_string(),
                    remarks: e.remarks,
                    created_by: e.created_by,
                    created_at: e.created_at.to_rfc3339(),
                    approved_by: e.approved_by,
                    approved_at: e.approved_at.map(|t| t.to_rfc3339()),
                })
                .collect();

            (
                StatusCode::OK,
                Json(PostingResponse {
                    reference_number: posting.reference_number,
                    status: entry_status_str(&posting.status).to_string(),
                    entries,
                }),
            )
                .into_response()
        }
        Err(e) => posting_error_response(&e),
    }
}

/// POST `/postings/{reference}/status` - approve or reject every leg.
async fn set_posting_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(payload): Json<SetStatusRequest>,
) -> impl IntoResponse {
    let Some(new_status) = EntryStatus::parse(&payload.status) else {
        return validation_error(format!("Invalid status: {}", payload.status));
    };

    let policy = if payload.allow_self_approval {
        SelfApprovalPolicy::Allowed
    } else {
        SelfApprovalPolicy::Forbidden
    };

    let repo = PostingRepository::new((*state.db).clone());

    match repo
        .set_reference_status(
            &reference,
            new_status,
            payload.actor_id.into_inner(),
            payload.remarks,
            policy,
        )
        .await
    {
        Ok(update) => (
            StatusCode::OK,
            Json(StatusUpdateResponse {
                reference_number: update.reference_number,
                status: entry_status_str(&update.status).to_string(),
                updated_entry_ids: update
                    .updated_entry_ids
                    .into_iter()
                    .map(EntryId::from_uuid)
                    .collect(),
            }),
        )
            .into_response(),
        Err(e) => posting_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses request legs into domain entries.
fn parse_entries(
    entries: &[EntryRequest],
) -> Result<Vec<ProposedEntry>, axum::response::Response> {
    let mut parsed = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(entry_type) = EntryType::parse(&entry.entry_type) else {
            return Err(validation_error(format!(
                "Invalid entry type: {}",
                entry.entry_type
            )));
        };

        let Ok(amount) = Decimal::from_str(&entry.amount) else {
            return Err(validation_error(format!(
                "Invalid amount: {}",
                entry.amount
            )));
        };

        parsed.push(ProposedEntry {
            account_id: entry.account_id.into_inner(),
            entry_type,
            amount,
        });
    }

    Ok(parsed)
}

fn entry_status_str(status: &db_enums::EntryStatus) -> &'static str {
    match status {
        db_enums::EntryStatus::Pending => "pending",
        db_enums::EntryStatus::Approved => "approved",
        db_enums::EntryStatus::Rejected => "rejected",
    }
}

fn posting_error_response(e: &PostingError) -> axum::response::Response {
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}
