//! `SeaORM` entity definitions.

pub mod accounts;
pub mod bank_statement_entries;
pub mod bank_statements;
pub mod financial_periods;
pub mod financial_years;
pub mod journal_entries;
pub mod journal_lines;
pub mod outstanding_items;
pub mod period_closings;
pub mod reconciliation_matches;
pub mod reconciliations;
pub mod sea_orm_active_enums;
pub mod users;
