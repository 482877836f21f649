//! `SeaORM` Entity for the payouts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PayoutDirection, PayoutStatus};

/// A scheduled interest payout or collection.
///
/// `amount` is computed from principal, rate, and period at scheduling
/// time. A refused processing attempt records `failure_reason` and leaves
/// the payout pending for retry.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payouts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Member savings or loan account on the member side of the pair.
    pub account_id: Uuid,
    /// Interest income or expense GL account on the other side.
    pub gl_account_id: Uuid,
    pub direction: PayoutDirection,
    pub principal: Decimal,
    pub annual_rate: Decimal,
    pub period_days: i32,
    pub amount: Decimal,
    pub status: PayoutStatus,
    /// Reference number of the posting created when processed.
    pub reference_number: Option<String>,
    pub failure_reason: Option<String>,
    pub scheduled_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
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
