//! Repository abstractions for data access.

pub mod account;
pub mod charge;
pub mod disbursement;
pub mod payout;
pub mod posting;
pub mod till;

pub use account::AccountRepository;
pub use charge::ChargeRepository;
pub use disbursement::DisbursementRepository;
pub use payout::PayoutRepository;
pub use posting::PostingRepository;
pub use till::TillRepository;
