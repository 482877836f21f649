//! Approval error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::EntryStatus;

/// Errors that can occur during approval transitions.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// The requested transition is not allowed from the current status.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: EntryStatus,
        /// The requested status.
        to: EntryStatus,
    },

    /// The actor created the posting and the policy forbids self-approval.
    #[error("Actor {0} cannot approve a posting they created")]
    SelfApprovalForbidden(Uuid),

    /// Rejection requires remarks.
    #[error("Rejection remarks are required")]
    RemarksRequired,
}

impl ApprovalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::SelfApprovalForbidden(_) => "SELF_APPROVAL_FORBIDDEN",
            Self::RemarksRequired => "REMARKS_REQUIRED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 409,
            Self::SelfApprovalForbidden(_) => 403,
            Self::RemarksRequired => 400,
        }
    }
}
