//! `SeaORM` Entity for the accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountKind, AccountStatus};

/// A holder of funds: member savings/loan account or internal GL account.
///
/// `available_balance` is mutated only by the posting engine applying
/// approved entries; `version` increments with every balance write.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    /// Owning member; NULL for GL accounts.
    pub owner_id: Option<Uuid>,
    pub currency: String,
    pub available_balance: Decimal,
    pub status: AccountStatus,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction_entries::Entity")]
    TransactionEntries,
    #[sea_orm(has_many = "super::tills::Entity")]
    Tills,
}

impl Related<super::transaction_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionEntries.def()
    }
}

impl Related<super::tills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
