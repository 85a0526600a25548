//! SQL schema for the `lawsuits` relation.
//!
//! The relation is owned by whatever system ingests lawsuits; this DDL only
//! guarantees the table exists so a fresh database file can be served.

/// Idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS lawsuits (
    id                  INTEGER PRIMARY KEY,
    filed               TEXT NOT NULL,   -- ISO 8601 timestamp
    title               TEXT NOT NULL,
    law360_data         TEXT,            -- JSON document or NULL
    gpt_summary         TEXT,            -- JSON document or NULL
    agency_manually_set TEXT
);

CREATE INDEX IF NOT EXISTS lawsuits_filed_idx ON lawsuits(filed);
";
