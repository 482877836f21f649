//! `SeaORM` Entity for the loan_applications table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LoanStatus;

/// A member's loan application.
///
/// Sanctioning happens upstream; this service only performs the
/// Sanctioned → Disbursed transition.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub member_id: Uuid,
    pub amount: Decimal,
    pub status: LoanStatus,
    /// Loan account credited at disbursement.
    pub loan_account_id: Option<Uuid>,
    pub sanctioned_by: Option<Uuid>,
    pub sanctioned_at: Option<DateTimeWithTimeZone>,
    pub disbursed_by: Option<Uuid>,
    pub disbursed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::LoanAccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
