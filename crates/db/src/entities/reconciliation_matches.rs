//! `SeaORM` Entity for reconciliation match pairs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::MatchMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reconciliation_matches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reconciliation_id: Uuid,
    pub statement_entry_id: Uuid,
    pub journal_line_id: Uuid,
    pub method: MatchMethod,
    /// Operator note on a manual match.
    pub note: Option<String>,
    pub matched_by: Option<Uuid>,
    pub matched_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reconciliations::Entity",
        from = "Column::ReconciliationId",
        to = "super::reconciliations::Column::Id"
    )]
    Reconciliations,
    #[sea_orm(
        belongs_to = "super::bank_statement_entries::Entity",
        from = "Column::StatementEntryId",
        to = "super::bank_statement_entries::Column::Id"
    )]
    BankStatementEntries,
    #[sea_orm(
        belongs_to = "super::journal_lines::Entity",
        from = "Column::JournalLineId",
        to = "super::journal_lines::Column::Id"
    )]
    JournalLines,
}

impl Related<super::reconciliations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reconciliations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
