//! Core business logic for Mandir.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry journal validation and reversal
//! - `period` - Financial year and period closing lifecycle
//! - `recon` - Bank statement matching and reconciliation summaries
//! - `reports` - Trial balance, balance sheet, income & expenditure, books

pub mod ledger;
pub mod period;
pub mod recon;
pub mod reports;
