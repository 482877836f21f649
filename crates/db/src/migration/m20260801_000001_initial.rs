//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the ledger core.

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
        // PART 2: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: TRANSACTION ENTRIES
        // ============================================================
        db.execute_unprepared(TRANSACTION_ENTRIES_SQL).await?;

        // ============================================================
        // PART 4: TILLS
        // ============================================================
        db.execute_unprepared(TILLS_SQL).await?;

        // ============================================================
        // PART 5: LOAN APPLICATIONS
        // ============================================================
        db.execute_unprepared(LOAN_APPLICATIONS_SQL).await?;

        // ============================================================
        // PART 6: PAYOUTS
        // ============================================================
        db.execute_unprepared(PAYOUTS_SQL).await?;

        // ============================================================
        // PART 7: CHARGES
        // ============================================================
        db.execute_unprepared(CHARGES_SQL).await?;

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
-- Account kinds
CREATE TYPE account_kind AS ENUM (
    'member_savings',
    'member_loan',
    'gl'
);

-- Account status
CREATE TYPE account_status AS ENUM ('active', 'inactive');

-- Entry leg type
CREATE TYPE entry_type AS ENUM ('debit', 'credit');

-- Entry status (shared by all legs under one reference number)
CREATE TYPE entry_status AS ENUM ('pending', 'approved', 'rejected');

-- Till status
CREATE TYPE till_status AS ENUM ('active', 'closed');

-- Loan application status
CREATE TYPE loan_status AS ENUM (
    'applied',
    'sanctioned',
    'disbursed',
    'rejected'
);

-- Payout status
CREATE TYPE payout_status AS ENUM ('pending', 'processed');

-- Payout direction
CREATE TYPE payout_direction AS ENUM ('payment', 'collection');

-- Charge status
CREATE TYPE charge_status AS ENUM ('pending', 'applied');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    kind account_kind NOT NULL,
    owner_id UUID,
    currency VARCHAR(3) NOT NULL,
    available_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    status account_status NOT NULL DEFAULT 'active',
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- GL accounts have no owner; member accounts always do
    CONSTRAINT chk_owner_matches_kind CHECK (
        (kind = 'gl' AND owner_id IS NULL) OR
        (kind <> 'gl' AND owner_id IS NOT NULL)
    )
);

CREATE INDEX idx_accounts_owner ON accounts(owner_id) WHERE owner_id IS NOT NULL;
CREATE INDEX idx_accounts_kind_status ON accounts(kind, status);
";

const TRANSACTION_ENTRIES_SQL: &str = r"
CREATE TABLE transaction_entries (
    id UUID PRIMARY KEY,
    reference_number VARCHAR(64) NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    entry_type entry_type NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    status entry_status NOT NULL DEFAULT 'pending',
    remarks TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    deleted BOOLEAN NOT NULL DEFAULT FALSE,

    CONSTRAINT chk_positive_amount CHECK (amount > 0)
);

CREATE INDEX idx_entries_reference ON transaction_entries(reference_number);
CREATE INDEX idx_entries_account ON transaction_entries(account_id);
CREATE INDEX idx_entries_status ON transaction_entries(status) WHERE deleted = FALSE;
";

const TILLS_SQL: &str = r"
CREATE TABLE tills (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    cashier_id UUID NOT NULL,
    gl_account_id UUID NOT NULL REFERENCES accounts(id),
    max_capacity NUMERIC(19, 4) NOT NULL,
    status till_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- One active till per cashier
CREATE UNIQUE INDEX idx_tills_active_cashier ON tills(cashier_id) WHERE status = 'active';
";

const LOAN_APPLICATIONS_SQL: &str = r"
CREATE TABLE loan_applications (
    id UUID PRIMARY KEY,
    member_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    status loan_status NOT NULL DEFAULT 'applied',
    loan_account_id UUID REFERENCES accounts(id),
    sanctioned_by UUID,
    sanctioned_at TIMESTAMPTZ,
    disbursed_by UUID,
    disbursed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_positive_loan_amount CHECK (amount > 0)
);

CREATE INDEX idx_loans_member ON loan_applications(member_id);
CREATE INDEX idx_loans_status ON loan_applications(status);
";

const PAYOUTS_SQL: &str = r"
CREATE TABLE payouts (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id),
    gl_account_id UUID NOT NULL REFERENCES accounts(id),
    direction payout_direction NOT NULL,
    principal NUMERIC(19, 4) NOT NULL,
    annual_rate NUMERIC(9, 6) NOT NULL,
    period_days INTEGER NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    status payout_status NOT NULL DEFAULT 'pending',
    reference_number VARCHAR(64),
    failure_reason TEXT,
    scheduled_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    processed_by UUID,
    processed_at TIMESTAMPTZ,

    CONSTRAINT chk_positive_principal CHECK (principal > 0),
    CONSTRAINT chk_positive_period CHECK (period_days > 0)
);

CREATE INDEX idx_payouts_status ON payouts(status);
CREATE INDEX idx_payouts_account ON payouts(account_id);
";

const CHARGES_SQL: &str = r"
CREATE TABLE charges (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id),
    gl_account_id UUID NOT NULL REFERENCES accounts(id),
    name VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    status charge_status NOT NULL DEFAULT 'pending',
    reference_number VARCHAR(64),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    applied_at TIMESTAMPTZ,

    CONSTRAINT chk_positive_charge_amount CHECK (amount > 0)
);

CREATE INDEX idx_charges_account_status ON charges(account_id, status);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS charges;
DROP TABLE IF EXISTS payouts;
DROP TABLE IF EXISTS loan_applications;
DROP TABLE IF EXISTS tills;
DROP TABLE IF EXISTS transaction_entries;
DROP TABLE IF EXISTS accounts;

DROP TYPE IF EXISTS charge_status;
DROP TYPE IF EXISTS payout_direction;
DROP TYPE IF EXISTS payout_status;
DROP TYPE IF EXISTS loan_status;
DROP TYPE IF EXISTS till_status;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS entry_type;
DROP TYPE IF EXISTS account_kind;
DROP TYPE IF EXISTS account_status;
";
