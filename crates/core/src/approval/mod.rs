//! Entry approval state machine.
//!
//! This module governs the lifecycle of a posted reference:
//! - Status enum (Pending, Approved, Rejected)
//! - Transition validation with audit payloads
//! - Self-approval policy extension point

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ApprovalError;
pub use service::ApprovalService;
pub use types::{ApprovalAction, EntryStatus, SelfApprovalPolicy};
