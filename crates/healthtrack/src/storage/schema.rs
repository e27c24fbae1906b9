//! `SQLite` schema definitions for healthtrack.
//!
//! The `health_records` layout matches databases written by earlier releases,
//! so an existing `health_data.db` opens without conversion.

/// SQL statement to create the observations table.
pub const CREATE_HEALTH_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS health_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    age INTEGER,
    sugar_level REAL,
    systolic_bp INTEGER,
    diastolic_bp INTEGER,
    timestamp TEXT
)
";

/// SQL statement to create an index serving per-user history lookups.
pub const CREATE_NAME_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_health_records_name_timestamp
    ON health_records(name, timestamp DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Base schema statements, run on every open.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_HEALTH_RECORDS_TABLE, CREATE_METADATA_TABLE];
