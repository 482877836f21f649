//! Approval service for reference status transitions.
//!
//! This module implements the state machine for moving a posted
//! reference from Pending to one of its terminal states. Approval is a
//! property of the reference-numbered event: callers pass the shared
//! status of all legs, and the resulting action applies to every leg.

use chrono::Utc;
use uuid::Uuid;

use super::error::ApprovalError;
use super::types::{ApprovalAction, EntryStatus, SelfApprovalPolicy};

/// Stateless service for approval transitions.
///
/// All methods are associated functions that validate and execute
/// state transitions, returning the appropriate `ApprovalAction`
/// with audit trail information.
pub struct ApprovalService;

impl ApprovalService {
    /// Approve a pending reference.
    ///
    /// # Arguments
    /// * `current_status` - The shared status of all legs under the reference
    /// * `approved_by` - The user approving the reference
    /// * `created_by` - The users who created the legs being approved
    /// * `policy` - Whether creators may approve their own postings
    /// * `remarks` - Optional notes from the approver
    ///
    /// # Errors
    ///
    /// * `ApprovalError::InvalidTransition` if the reference is not Pending
    /// * `ApprovalError::SelfApprovalForbidden` if the policy forbids it and
    ///   the approver created any leg
    pub fn approve(
        current_status: EntryStatus,
        approved_by: Uuid,
        created_by: &[Uuid],
        policy: SelfApprovalPolicy,
        remarks: Option<String>,
    ) -> Result<ApprovalAction, ApprovalError> {
        if current_status != EntryStatus::Pending {
            return Err(ApprovalError::InvalidTransition {
                from: current_status,
                to: EntryStatus::Approved,
            });
        }

        if policy == SelfApprovalPolicy::Forbidden && created_by.contains(&approved_by) {
            return Err(ApprovalError::SelfApprovalForbidden(approved_by));
        }

        Ok(ApprovalAction::Approve {
            new_status: EntryStatus::Approved,
            approved_by,
            approved_at: Utc::now(),
            remarks,
        })
    }

    /// Reject a pending reference.
    ///
    /// # Arguments
    /// * `current_status` - The shared status of all legs under the reference
    /// * `rejected_by` - The user rejecting the reference
    /// * `remarks` - The reason for rejection (required)
    ///
    /// # Errors
    ///
    /// * `ApprovalError::RemarksRequired` if remarks are empty
    /// * `ApprovalError::InvalidTransition` if the reference is not Pending
    pub fn reject(
        current_status: EntryStatus,
        rejected_by: Uuid,
        remarks: String,
    ) -> Result<ApprovalAction, ApprovalError> {
        if remarks.trim().is_empty() {
            return Err(ApprovalError::RemarksRequired);
        }

        if current_status != EntryStatus::Pending {
            return Err(ApprovalError::InvalidTransition {
                from: current_status,
                to: EntryStatus::Rejected,
            });
        }

        Ok(ApprovalAction::Reject {
            new_status: EntryStatus::Rejected,
            rejected_by,
            rejected_at: Utc::now(),
            remarks,
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved
    /// - Pending → Rejected
    #[must_use]
    pub fn is_valid_transition(from: EntryStatus, to: EntryStatus) -> bool {
        matches!(
            (from, to),
            (
                EntryStatus::Pending,
                EntryStatus::Approved | EntryStatus::Rejected
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_from_pending() {
        let approver = Uuid::new_v4();
        let creator = Uuid::new_v4();
        let result = ApprovalService::approve(
            EntryStatus::Pending,
            approver,
            &[creator],
            SelfApprovalPolicy::Forbidden,
            None,
        );
        assert!(result.is_ok());
        assert_eq!(result.unwrap().new_status(), EntryStatus::Approved);
    }

    #[test]
    fn test_approve_from_terminal_fails() {
        let approver = Uuid::new_v4();
        for status in [EntryStatus::Approved, EntryStatus::Rejected] {
            let result = ApprovalService::approve(
                status,
                approver,
                &[],
                SelfApprovalPolicy::Allowed,
                None,
            );
            assert!(matches!(
                result,
                Err(ApprovalError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_self_approval_forbidden() {
        let actor = Uuid::new_v4();
        let result = ApprovalService::approve(
            EntryStatus::Pending,
            actor,
            &[actor],
            SelfApprovalPolicy::Forbidden,
            None,
        );
        assert!(matches!(
            result,
            Err(ApprovalError::SelfApprovalForbidden(a)) if a == actor
        ));
    }

    #[test]
    fn test_self_approval_allowed_by_policy() {
        let actor = Uuid::new_v4();
        let result = ApprovalService::approve(
            EntryStatus::Pending,
            actor,
            &[actor],
            SelfApprovalPolicy::Allowed,
            Some("own till reconciliation".to_string()),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_reject_from_pending() {
        let actor = Uuid::new_v4();
        let result = ApprovalService::reject(
            EntryStatus::Pending,
            actor,
            "Amount does not match receipt".to_string(),
        );
        assert!(result.is_ok());
        assert_eq!(result.unwrap().new_status(), EntryStatus::Rejected);
    }

    #[test]
    fn test_reject_empty_remarks_fails() {
        let actor = Uuid::new_v4();
        let result = ApprovalService::reject(EntryStatus::Pending, actor, String::new());
        assert!(matches!(result, Err(ApprovalError::RemarksRequired)));
    }

    #[test]
    fn test_reject_whitespace_remarks_fails() {
        let actor = Uuid::new_v4();
        let result = ApprovalService::reject(EntryStatus::Pending, actor, "   ".to_string());
        assert!(matches!(result, Err(ApprovalError::RemarksRequired)));
    }

    #[test]
    fn test_reject_from_terminal_fails() {
        let actor = Uuid::new_v4();
        for status in [EntryStatus::Approved, EntryStatus::Rejected] {
            let result = ApprovalService::reject(status, actor, "reason".to_string());
            assert!(matches!(
                result,
                Err(ApprovalError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_is_valid_transition() {
        // Valid transitions
        assert!(ApprovalService::is_valid_transition(
            EntryStatus::Pending,
            EntryStatus::Approved
        ));
        assert!(ApprovalService::is_valid_transition(
            EntryStatus::Pending,
            EntryStatus::Rejected
        ));

        // Terminal states never transition
        assert!(!ApprovalService::is_valid_transition(
            EntryStatus::Approved,
            EntryStatus::Rejected
        ));
        assert!(!ApprovalService::is_valid_transition(
            EntryStatus::Approved,
            EntryStatus::Pending
        ));
        assert!(!ApprovalService::is_valid_transition(
            EntryStatus::Rejected,
            EntryStatus::Approved
        ));
        assert!(!ApprovalService::is_valid_transition(
            EntryStatus::Rejected,
            EntryStatus::Pending
        ));
    }
}
