//! Core observation types for healthtrack.
//!
//! This module defines the data recorded at each check-in and the session
//! context that every operation receives explicitly.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Format of the `timestamp` column: local wall clock, one-second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Opaque identifier of the person a record belongs to.
///
/// Matched exactly and case-sensitively; there is no user registry behind it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a name as a user identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for UserId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Who is entering data in this session.
///
/// Captured once when a session starts and passed into every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The user every record of this session is filed under.
    pub user: UserId,
    /// Age in years, copied onto each record.
    pub age: i64,
}

impl Session {
    /// Start a session for the given user.
    #[must_use]
    pub fn new(user: impl Into<UserId>, age: i64) -> Self {
        Self {
            user: user.into(),
            age,
        }
    }

    /// Parse the age typed at session start.
    ///
    /// Unparsable input falls back to 0; the flag is `true` when it did.
    #[must_use]
    pub fn age_from_input(raw: &str) -> (i64, bool) {
        match raw.trim().parse::<i64>() {
            Ok(age) => (age, false),
            Err(_) => (0, true),
        }
    }
}

/// One set of measurements entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Blood sugar in mg/dL.
    pub sugar_level: f64,
    /// Systolic blood pressure in mmHg.
    pub systolic_bp: i64,
    /// Diastolic blood pressure in mmHg.
    pub diastolic_bp: i64,
}

impl Reading {
    /// Parse the three raw values in entry order.
    ///
    /// Sugar must be a finite decimal number and both pressures must be
    /// integers. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first field that fails.
    pub fn parse(sugar: &str, systolic: &str, diastolic: &str) -> Result<Self> {
        let sugar_level = sugar
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::invalid_input("sugar_level", sugar))?;
        let systolic_bp = parse_pressure("systolic_bp", systolic)?;
        let diastolic_bp = parse_pressure("diastolic_bp", diastolic)?;

        Ok(Self {
            sugar_level,
            systolic_bp,
            diastolic_bp,
        })
    }
}

fn parse_pressure(field: &'static str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_input(field, raw))
}

/// A stored health check-in.
///
/// Observations are append-only: nothing changes after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Row id (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Who this observation belongs to.
    pub name: UserId,

    /// Age given for the session that recorded this.
    pub age: i64,

    /// The measurements.
    #[serde(flatten)]
    pub reading: Reading,

    /// Local time of recording, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

impl Observation {
    /// Create a new observation stamped with the current local time.
    #[must_use]
    pub fn new(session: &Session, reading: Reading) -> Self {
        Self::at(session, reading, Local::now().naive_local())
    }

    /// Create a new observation with an explicit recording time.
    #[must_use]
    pub fn at(session: &Session, reading: Reading, recorded_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            name: session.user.clone(),
            age: session.age,
            reading,
            timestamp: recorded_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

}
