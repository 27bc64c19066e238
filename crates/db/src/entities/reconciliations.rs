//! `SeaORM` Entity for reconciliation runs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ReconciliationStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reconciliations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub statement_id: Uuid,
    pub status: ReconciliationStatus,
    /// Summary columns, filled when the run completes.
    pub book_balance: Option<Decimal>,
    pub adjusted_bank_balance: Option<Decimal>,
    pub adjusted_book_balance: Option<Decimal>,
    pub difference: Option<Decimal>,
    /// Operator notes recorded at completion.
    pub notes: Option<String>,
    pub started_by: Uuid,
    pub started_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_statements::Entity",
        from = "Column::StatementId",
        to = "super::bank_statements::Column::Id"
    )]
    BankStatements,
    #[sea_orm(has_many = "super::reconciliation_matches::Entity")]
    ReconciliationMatches,
    #[sea_orm(has_many = "super::outstanding_items::Entity")]
    OutstandingItems,
}

impl Related<super::reconciliation_matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReconciliationMatches.def()
    }
}

impl Related<super::outstanding_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutstandingItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
