//! Initial database migration.
//!
//! Creates all enums, tables, constraints, and indexes for the ledger,
//! period, and reconciliation schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: FINANCIAL YEARS & PERIODS
        // ============================================================
        db.execute_unprepared(FINANCIAL_YEARS_SQL).await?;
        db.execute_unprepared(FINANCIAL_PERIODS_SQL).await?;

        // ============================================================
        // PART 4: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 5: PERIOD CLOSINGS
        // ============================================================
        db.execute_unprepared(PERIOD_CLOSINGS_SQL).await?;

        // ============================================================
        // PART 6: BANK STATEMENTS & RECONCILIATION
        // ============================================================
        db.execute_unprepared(BANK_STATEMENTS_SQL).await?;
        db.execute_unprepared(BANK_STATEMENT_ENTRIES_SQL).await?;
        db.execute_unprepared(RECONCILIATIONS_SQL).await?;
        db.execute_unprepared(RECONCILIATION_MATCHES_SQL).await?;
        db.execute_unprepared(OUTSTANDING_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'income',
    'expense'
);

-- Voucher types
CREATE TYPE voucher_type AS ENUM (
    'receipt',
    'payment',
    'journal',
    'contra'
);

-- Financial year status
CREATE TYPE year_status AS ENUM ('open', 'closed');

-- Financial period status
CREATE TYPE period_status AS ENUM ('open', 'closing', 'closed');

-- Reconciliation run status
CREATE TYPE reconciliation_status AS ENUM ('in_progress', 'completed');

-- Match method
CREATE TYPE match_method AS ENUM ('auto', 'manual');

-- Outstanding item side
CREATE TYPE outstanding_side AS ENUM ('book', 'bank');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    parent_id UUID REFERENCES accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_type ON accounts(account_type) WHERE is_active = true;
";

const FINANCIAL_YEARS_SQL: &str = r"
CREATE TABLE financial_years (
    id UUID PRIMARY KEY,
    label VARCHAR(50) NOT NULL UNIQUE,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status year_status NOT NULL DEFAULT 'open',
    closed_by UUID REFERENCES users(id),
    closed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_year_dates CHECK (start_date < end_date)
);
";

const FINANCIAL_PERIODS_SQL: &str = r"
CREATE TABLE financial_periods (
    id UUID PRIMARY KEY,
    financial_year_id UUID NOT NULL REFERENCES financial_years(id) ON DELETE CASCADE,
    period_number SMALLINT NOT NULL,
    name VARCHAR(50) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status period_status NOT NULL DEFAULT 'open',
    closed_by UUID REFERENCES users(id),
    closed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_period_number UNIQUE (financial_year_id, period_number),
    CONSTRAINT chk_period_dates CHECK (start_date <= end_date)
);

CREATE INDEX idx_periods_dates ON financial_periods(start_date, end_date);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    entry_date DATE NOT NULL,
    voucher_type voucher_type NOT NULL,
    narration TEXT NOT NULL,
    source_module VARCHAR(50),
    source_record_id VARCHAR(100),
    financial_period_id UUID NOT NULL REFERENCES financial_periods(id),
    -- At most one reversal per entry.
    reversal_of UUID UNIQUE REFERENCES journal_entries(id),
    posted_by UUID NOT NULL REFERENCES users(id),
    posted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_entries_date ON journal_entries(entry_date);
CREATE INDEX idx_entries_period ON journal_entries(financial_period_id);
CREATE INDEX idx_entries_source ON journal_entries(source_module, source_record_id)
    WHERE source_module IS NOT NULL;
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_number SMALLINT NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(14,2) NOT NULL DEFAULT 0,
    credit NUMERIC(14,2) NOT NULL DEFAULT 0,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_line_number UNIQUE (entry_id, line_number),
    -- Exactly one side carries a positive amount.
    CONSTRAINT chk_one_side CHECK (
        (debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0)
    )
);

CREATE INDEX idx_lines_account ON journal_lines(account_id);
CREATE INDEX idx_lines_entry ON journal_lines(entry_id);
";

const PERIOD_CLOSINGS_SQL: &str = r"
CREATE TABLE period_closings (
    id UUID PRIMARY KEY,
    period_id UUID NOT NULL UNIQUE REFERENCES financial_periods(id),
    closing_date DATE NOT NULL,
    income_total NUMERIC(14,2) NOT NULL,
    expense_total NUMERIC(14,2) NOT NULL,
    surplus NUMERIC(14,2) NOT NULL,
    closing_entry_id UUID REFERENCES journal_entries(id),
    reserve_account_id UUID NOT NULL REFERENCES accounts(id),
    closed_by UUID NOT NULL REFERENCES users(id),
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const BANK_STATEMENTS_SQL: &str = r"
CREATE TABLE bank_statements (
    id UUID PRIMARY KEY,
    bank_account_id UUID NOT NULL REFERENCES accounts(id),
    from_date DATE NOT NULL,
    to_date DATE NOT NULL,
    opening_balance NUMERIC(14,2) NOT NULL,
    closing_balance NUMERIC(14,2) NOT NULL,
    superseded_by UUID REFERENCES bank_statements(id),
    imported_by UUID NOT NULL REFERENCES users(id),
    imported_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_statement_dates CHECK (from_date <= to_date)
);

CREATE INDEX idx_statements_account ON bank_statements(bank_account_id, to_date);
";

const BANK_STATEMENT_ENTRIES_SQL: &str = r"
CREATE TABLE bank_statement_entries (
    id UUID PRIMARY KEY,
    statement_id UUID NOT NULL REFERENCES bank_statements(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    value_date DATE NOT NULL,
    amount NUMERIC(14,2) NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_statement_line UNIQUE (statement_id, line_number),
    CONSTRAINT chk_nonzero_amount CHECK (amount <> 0)
);
";

const RECONCILIATIONS_SQL: &str = r"
CREATE TABLE reconciliations (
    id UUID PRIMARY KEY,
    bank_account_id UUID NOT NULL REFERENCES accounts(id),
    statement_id UUID NOT NULL REFERENCES bank_statements(id),
    status reconciliation_status NOT NULL DEFAULT 'in_progress',
    book_balance NUMERIC(14,2),
    adjusted_bank_balance NUMERIC(14,2),
    adjusted_book_balance NUMERIC(14,2),
    difference NUMERIC(14,2),
    notes TEXT,
    started_by UUID NOT NULL REFERENCES users(id),
    started_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    completed_at TIMESTAMPTZ
);

CREATE INDEX idx_reconciliations_account ON reconciliations(bank_account_id);
-- One in-progress run per bank account.
CREATE UNIQUE INDEX uq_reconciliation_active ON reconciliations(bank_account_id)
    WHERE status = 'in_progress';
";

const RECONCILIATION_MATCHES_SQL: &str = r"
CREATE TABLE reconciliation_matches (
    id UUID PRIMARY KEY,
    reconciliation_id UUID NOT NULL REFERENCES reconciliations(id) ON DELETE CASCADE,
    statement_entry_id UUID NOT NULL REFERENCES bank_statement_entries(id),
    journal_line_id UUID NOT NULL REFERENCES journal_lines(id),
    method match_method NOT NULL,
    note TEXT,
    matched_by UUID REFERENCES users(id),
    matched_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Each side of a pair is claimed at most once per run.
    CONSTRAINT uq_match_statement_entry UNIQUE (reconciliation_id, statement_entry_id),
    CONSTRAINT uq_match_journal_line UNIQUE (reconciliation_id, journal_line_id)
);
";

const OUTSTANDING_ITEMS_SQL: &str = r"
CREATE TABLE outstanding_items (
    id UUID PRIMARY KEY,
    reconciliation_id UUID NOT NULL REFERENCES reconciliations(id) ON DELETE CASCADE,
    side outstanding_side NOT NULL,
    item_date DATE NOT NULL,
    amount NUMERIC(14,2) NOT NULL,
    description TEXT,
    statement_entry_id UUID REFERENCES bank_statement_entries(id),
    journal_line_id UUID REFERENCES journal_lines(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_item_source CHECK (
        (side = 'bank' AND statement_entry_id IS NOT NULL AND journal_line_id IS NULL) OR
        (side = 'book' AND journal_line_id IS NOT NULL AND statement_entry_id IS NULL)
    )
);

CREATE INDEX idx_outstanding_recon ON outstanding_items(reconciliation_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS outstanding_items CASCADE;
DROP TABLE IF EXISTS reconciliation_matches CASCADE;
DROP TABLE IF EXISTS reconciliations CASCADE;
DROP TABLE IF EXISTS bank_statement_entries CASCADE;
DROP TABLE IF EXISTS bank_statements CASCADE;
DROP TABLE IF EXISTS period_closings CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS financial_periods CASCADE;
DROP TABLE IF EXISTS financial_years CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS outstanding_side;
DROP TYPE IF EXISTS match_method;
DROP TYPE IF EXISTS reconciliation_status;
DROP TYPE IF EXISTS period_status;
DROP TYPE IF EXISTS year_status;
DROP TYPE IF EXISTS voucher_type;
DROP TYPE IF EXISTS account_type;
";
