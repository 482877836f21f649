//! Double-entry posting logic.
//!
//! This module implements the core ledger functionality:
//! - Entry legs (debits and credits) and their signed balance effect
//! - Posting validation (balanced legs, active accounts, positive amounts)
//! - Reference number generation
//! - Error types for posting operations

pub mod entry;
pub mod error;
pub mod posting;

#[cfg(test)]
mod posting_props;

pub use entry::{EntryType, ProposedEntry};
pub use error::LedgerError;
pub use posting::{AccountInfo, PostingService, PostingTotals, generate_reference_number};
