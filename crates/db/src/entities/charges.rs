//! `SeaORM` Entity for the charges table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ChargeStatus;

/// A pending fee against a member account.
///
/// Applied as its own balanced posting when a triggering workflow (e.g.
/// loan disbursement) runs; `reference_number` links to that posting.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "charges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Member account the charge is levied against.
    pub account_id: Uuid,
    /// Fee income GL account credited when applied.
    pub gl_account_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub status: ChargeStatus,
    pub reference_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub applied_at: Option<DateTimeWithTimeZone>,
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
