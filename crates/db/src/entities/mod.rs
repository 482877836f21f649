//! `SeaORM` entity definitions.

pub mod accounts;
pub mod charges;
pub mod loan_applications;
pub mod payouts;
pub mod sea_orm_active_enums;
pub mod tills;
pub mod transaction_entries;
