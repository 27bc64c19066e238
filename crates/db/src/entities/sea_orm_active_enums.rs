//! Database enum types mapped to Postgres enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Voucher classification of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "voucher_type")]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    #[sea_orm(string_value = "receipt")]
    Receipt,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "journal")]
    Journal,
    #[sea_orm(string_value = "contra")]
    Contra,
}

/// Financial year status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "year_status")]
#[serde(rename_all = "lowercase")]
pub enum YearStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Financial period status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closing")]
    Closing,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Reconciliation run status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reconciliation_status")]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// How a reconciliation match was established.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "match_method")]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    #[sea_orm(string_value = "auto")]
    Auto,
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// Side an outstanding reconciliation item sits on.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "outstanding_side")]
#[serde(rename_all = "lowercase")]
pub enum OutstandingSide {
    #[sea_orm(string_value = "book")]
    Book,
    #[sea_orm(string_value = "bank")]
    Bank,
}

impl From<AccountType> for mandir_core::ledger::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<mandir_core::ledger::VoucherType> for VoucherType {
    fn from(value: mandir_core::ledger::VoucherType) -> Self {
        match value {
            mandir_core::ledger::VoucherType::Receipt => Self::Receipt,
            mandir_core::ledger::VoucherType::Payment => Self::Payment,
            mandir_core::ledger::VoucherType::Journal => Self::Journal,
            mandir_core::ledger::VoucherType::Contra => Self::Contra,
        }
    }
}

impl From<VoucherType> for mandir_core::ledger::VoucherType {
    fn from(value: VoucherType) -> Self {
        match value {
            VoucherType::Receipt => Self::Receipt,
            VoucherType::Payment => Self::Payment,
            VoucherType::Journal => Self::Journal,
            VoucherType::Contra => Self::Contra,
        }
    }
}

impl From<PeriodStatus> for mandir_core::period::PeriodStatus {
    fn from(value: PeriodStatus) -> Self {
        match value {
            PeriodStatus::Open => Self::Open,
            PeriodStatus::Closing => Self::Closing,
            PeriodStatus::Closed => Self::Closed,
        }
    }
}

impl From<YearStatus> for mandir_core::period::YearStatus {
    fn from(value: YearStatus) -> Self {
        match value {
            YearStatus::Open => Self::Open,
            YearStatus::Closed => Self::Closed,
        }
    }
}
