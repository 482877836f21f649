//! Property tests for the approval state machine.

use proptest::prelude::*;
use uuid::Uuid;

use super::error::ApprovalError;
use super::service::ApprovalService;
use super::types::{EntryStatus, SelfApprovalPolicy};

/// Strategy for generating statuses.
fn status_strategy() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![
        Just(EntryStatus::Pending),
        Just(EntryStatus::Approved),
        Just(EntryStatus::Rejected),
    ]
}

/// Strategy for generating terminal statuses.
fn terminal_status_strategy() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![Just(EntryStatus::Approved), Just(EntryStatus::Rejected)]
}

/// Strategy for generating policies.
fn policy_strategy() -> impl Strategy<Value = SelfApprovalPolicy> {
    prop_oneof![
        Just(SelfApprovalPolicy::Allowed),
        Just(SelfApprovalPolicy::Forbidden),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Terminal states never transition anywhere, through either operation.
    #[test]
    fn prop_terminal_states_are_final(
        from in terminal_status_strategy(),
        policy in policy_strategy(),
    ) {
        let actor = Uuid::new_v4();

        let approve = ApprovalService::approve(from, actor, &[], policy, None);
        let approve_invalid = matches!(approve, Err(ApprovalError::InvalidTransition { .. }));
        prop_assert!(approve_invalid);

        let reject = ApprovalService::reject(from, actor, "reason".to_string());
        let reject_invalid = matches!(reject, Err(ApprovalError::InvalidTransition { .. }));
        prop_assert!(reject_invalid);
    }

    /// `is_valid_transition` accepts exactly the two transitions out of
    /// Pending and nothing else.
    #[test]
    fn prop_only_pending_transitions_valid(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        let valid = ApprovalService::is_valid_transition(from, to);
        let expected = from == EntryStatus::Pending
            && matches!(to, EntryStatus::Approved | EntryStatus::Rejected);
        prop_assert_eq!(valid, expected);
    }

    /// Under the Forbidden policy, an approver who created any leg is
    /// always refused; an unrelated approver always succeeds.
    #[test]
    fn prop_self_approval_policy_enforced(creator_count in 1usize..5) {
        let creators: Vec<Uuid> = (0..creator_count).map(|_| Uuid::new_v4()).collect();

        for creator in &creators {
            let result = ApprovalService::approve(
                EntryStatus::Pending,
                *creator,
                &creators,
                SelfApprovalPolicy::Forbidden,
                None,
            );
            prop_assert!(matches!(result, Err(ApprovalError::SelfApprovalForbidden(_))));
        }

        let outsider = Uuid::new_v4();
        let result = ApprovalService::approve(
            EntryStatus::Pending,
            outsider,
            &creators,
            SelfApprovalPolicy::Forbidden,
            None,
        );
        prop_assert!(result.is_ok());
    }

    /// Approval and rejection from Pending always land in the matching
    /// terminal state.
    #[test]
    fn prop_pending_transitions_land_terminal(policy in policy_strategy()) {
        let actor = Uuid::new_v4();

        let approved = ApprovalService::approve(EntryStatus::Pending, actor, &[], policy, None)
            .expect("approve from pending");
        prop_assert_eq!(approved.new_status(), EntryStatus::Approved);
        prop_assert!(approved.new_status().is_terminal());

        let rejected = ApprovalService::reject(EntryStatus::Pending, actor, "r".to_string())
            .expect("reject from pending");
        prop_assert_eq!(rejected.new_status(), EntryStatus::Rejected);
        prop_assert!(rejected.new_status().is_terminal());
    }
}
