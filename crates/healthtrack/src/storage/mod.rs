//! Storage layer for healthtrack.
//!
//! This module provides the `SQLite`-backed record store: an append-only
//! `health_records` table with per-user history and aggregate queries.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::observation::{Observation, Reading, UserId};

/// Journal mode used by [`Storage::open`].
pub const DEFAULT_JOURNAL_MODE: &str = "WAL";

/// Journal modes `SQLite` accepts.
pub const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

const MEMORY_PATH: &str = ":memory:";

/// Column list shared by every observation query.
const OBSERVATION_COLUMNS: &str =
    "id, name, age, sugar_level, systolic_bp, diastolic_bp, timestamp";

/// Record store for health observations.
///
/// Owns the single database connection for the lifetime of the process. Rows
/// are only ever inserted; there is no update or delete.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_journal_mode(path, DEFAULT_JOURNAL_MODE)
    }

    /// Open or create a storage database using the given `SQLite` journal mode.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then ensures the schema is in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn open_with_journal_mode(path: impl AsRef<Path>, journal_mode: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let journal_mode = journal_mode.to_ascii_uppercase();
        if !JOURNAL_MODES.contains(&journal_mode.as_str()) {
            return Err(Error::ConfigValidation {
                message: format!("unknown journal_mode '{journal_mode}'"),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {} ({} journal)", path.display(), journal_mode);
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(&format!(
            "PRAGMA journal_mode={journal_mode}; PRAGMA synchronous=NORMAL;"
        ))?;

        let storage = Self { path, conn };
        storage.create_schema()?;

        info!("Database opened at {}", storage.path.display());
        Ok(storage)
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        let storage = Self {
            path: PathBuf::from(MEMORY_PATH),
            conn,
        };
        storage.create_schema()?;
        Ok(storage)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the observation table exists.
    ///
    /// Idempotent; runs on every open.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or migration fails.
    pub fn create_schema(&self) -> Result<()> {
        migrations::initialize_schema(&self.conn)
    }

    /// Append an observation and return its assigned id.
    ///
    /// The `id` field of `observation` is ignored; ids always come from the
    /// database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, observation: &Observation) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO health_records (name, age, sugar_level, systolic_bp, diastolic_bp, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                observation.name.as_str(),
                observation.age,
                observation.reading.sugar_level,
                observation.reading.systolic_bp,
                observation.reading.diastolic_bp,
                observation.timestamp,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted observation with id {}", id);
        Ok(id)
    }

    /// Get an observation by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Observation>> {
        let sql = format!("SELECT {OBSERVATION_COLUMNS} FROM health_records WHERE id = ?1");
        let result = self
            .conn
            .query_row(&sql, [id], Self::row_to_observation)
            .optional()?;
        Ok(result)
    }

    /// All observations for a user, newest first.
    ///
    /// Rows recorded within the same second come back in reverse insertion
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn query_by_name(&self, user: &UserId) -> Result<Vec<Observation>> {
        let sql = format!(
            "SELECT {OBSERVATION_COLUMNS} FROM health_records
             WHERE name = ?1
             ORDER BY timestamp DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let observations = stmt
            .query_map([user.as_str()], Self::row_to_observation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Loaded {} observations for {}",
            observations.len(),
            user.as_str()
        );
        Ok(observations)
    }

    /// Mean of each measurement across a user's whole history.
    ///
    /// Returns `None` when the user has no observations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn aggregate_by_name(&self, user: &UserId) -> Result<Option<Aggregate>> {
        let (count, sugar, systolic, diastolic): (i64, Option<f64>, Option<f64>, Option<f64>) =
            self.conn.query_row(
                r"
                SELECT COUNT(*), AVG(sugar_level), AVG(systolic_bp), AVG(diastolic_bp)
                FROM health_records WHERE name = ?1
                ",
                [user.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let aggregate = match (sugar, systolic, diastolic) {
            (Some(mean_sugar), Some(mean_systolic), Some(mean_diastolic)) if count > 0 => {
                Some(Aggregate {
                    count,
                    mean_sugar,
                    mean_systolic,
                    mean_diastolic,
                })
            }
            _ => None,
        };
        Ok(aggregate)
    }

    /// Count all observations in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM health_records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count the observations belonging to one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_by_name(&self, user: &UserId) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM health_records WHERE name = ?1",
            [user.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_records = self.count()?;
        let distinct_users: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT name) FROM health_records",
            [],
            |row| row.get(0),
        )?;

        let newest_timestamp: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM health_records ORDER BY timestamp DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let db_size_bytes = if self.path.as_os_str() == MEMORY_PATH {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_records,
            distinct_users,
            newest_timestamp,
            db_size_bytes,
        })
    }

    /// Close the connection, surfacing any error from the final flush.
    ///
    /// Dropping a `Storage` also closes it, but silently.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` fails to close the database cleanly.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, err)| Error::from(err))?;
        debug!("Closed database at {}", path.display());
        Ok(())
    }

    /// Convert a database row to an Observation.
    fn row_to_observation(row: &rusqlite::Row) -> rusqlite::Result<Observation> {
        let id: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let age: i64 = row.get(2)?;
        let sugar_level: f64 = row.get(3)?;
        let systolic_bp: i64 = row.get(4)?;
        let diastolic_bp: i64 = row.get(5)?;
        let timestamp: String = row.get(6)?;

        Ok(Observation {
            id: Some(id),
            name: UserId::new(name),
            age,
            reading: Reading {
                sugar_level,
                systolic_bp,
                diastolic_bp,
            },
            timestamp,
        })
    }
}

/// Per-user means over every stored observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    /// Number of observations averaged.
    pub count: i64,
    /// Mean blood sugar, mg/dL.
    pub mean_sugar: f64,
    /// Mean systolic pressure, mmHg.
    pub mean_systolic: f64,
    /// Mean diastolic pressure, mmHg.
    pub mean_diastolic: f64,
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of observations stored.
    pub total_records: i64,
    /// Number of distinct user names.
    pub distinct_users: i64,
    /// Timestamp of the newest observation.
    pub newest_timestamp: Option<String>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
