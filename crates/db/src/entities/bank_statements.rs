//! `SeaORM` Entity for imported bank statements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_statements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The bank account in the chart of accounts this statement belongs to.
    pub bank_account_id: Uuid,
    pub from_date: Date,
    pub to_date: Date,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    /// Set when a later import replaces this statement.
    pub superseded_by: Option<Uuid>,
    pub imported_by: Uuid,
    pub imported_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bank_statement_entries::Entity")]
    BankStatementEntries,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::bank_statement_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankStatementEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
