//! Shared domain types.
//!
//! - Typed IDs for type-safe entity references
//! - Money types with decimal precision

pub mod id;
pub mod money;

pub use id::{
    AccountId, ChargeId, EntryId, LoanApplicationId, MemberId, PayoutId, TillId, UserId,
};
pub use money::{Currency, Money};
