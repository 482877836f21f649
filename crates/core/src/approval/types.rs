//! Approval domain types for the entry lifecycle.
//!
//! A reference number's legs move through these states together; the
//! state machine never addresses an individual leg.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of a posted reference and all of its entry legs.
///
/// The valid transitions are:
/// - Pending → Approved (balances applied, terminal)
/// - Pending → Rejected (no balance effect, terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Submitted and awaiting approval; balances untouched.
    Pending,
    /// Approved and applied to account balances (immutable).
    Approved,
    /// Rejected with remarks; never applied (immutable).
    Rejected,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the actor who created a pending reference may approve it.
///
/// The choice belongs to the calling system; the state machine only
/// enforces whichever policy it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfApprovalPolicy {
    /// The creator may approve their own posting.
    Allowed,
    /// The creator may not approve their own posting.
    Forbidden,
}

/// Approval action representing a state transition with audit data.
#[derive(Debug, Clone)]
pub enum ApprovalAction {
    /// Approve a pending reference, applying its balance effects.
    Approve {
        /// The new status after approval.
        new_status: EntryStatus,
        /// The user who approved the reference.
        approved_by: Uuid,
        /// When the reference was approved.
        approved_at: DateTime<Utc>,
        /// Optional notes from the approver.
        remarks: Option<String>,
    },
    /// Reject a pending reference with mandatory remarks.
    Reject {
        /// The new status after rejection.
        new_status: EntryStatus,
        /// The user who rejected the reference.
        rejected_by: Uuid,
        /// When the reference was rejected.
        rejected_at: DateTime<Utc>,
        /// The reason for rejection.
        remarks: String,
    },
}

impl ApprovalAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> EntryStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(EntryStatus::Pending.as_str(), "pending");
        assert_eq!(EntryStatus::Approved.as_str(), "approved");
        assert_eq!(EntryStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(EntryStatus::parse("pending"), Some(EntryStatus::Pending));
        assert_eq!(EntryStatus::parse("APPROVED"), Some(EntryStatus::Approved));
        assert_eq!(EntryStatus::parse("Rejected"), Some(EntryStatus::Rejected));
        assert_eq!(EntryStatus::parse("draft"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", EntryStatus::Pending), "pending");
        assert_eq!(format!("{}", EntryStatus::Approved), "approved");
    }

    #[test]
    fn test_status_terminal() {
        assert!(!EntryStatus::Pending.is_terminal());
        assert!(EntryStatus::Approved.is_terminal());
        assert!(EntryStatus::Rejected.is_terminal());
    }
}
