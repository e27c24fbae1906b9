//! Per-user history reports.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::observation::{Observation, UserId};
use crate::storage::Storage;

/// Shown when a user has no stored observations.
pub const NO_RECORDS_MESSAGE: &str = "No records found.";

/// Read-only access to a user's recorded history.
#[derive(Debug, Clone, Copy)]
pub struct Reporter<'a> {
    storage: &'a Storage,
}

impl<'a> Reporter<'a> {
    /// Create a reporter reading from the given store.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Every observation for `user`, newest first.
    ///
    /// Returns `None` when the user has no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn history(&self, user: &UserId) -> Result<Option<History>> {
        let observations = self.storage.query_by_name(user)?;
        if observations.is_empty() {
            return Ok(None);
        }
        Ok(Some(History {
            user: user.clone(),
            observations,
        }))
    }
}

/// A non-empty, newest-first list of observations for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    /// Whose history this is.
    pub user: UserId,
    /// The observations, most recent first.
    pub observations: Vec<Observation>,
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Health Records for {}:", self.user)?;
        for obs in &self.observations {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Date: {}", obs.timestamp)?;
            writeln!(f, "   Sugar Level: {} mg/dL", obs.reading.sugar_level)?;
            write!(
                f,
                "   BP: {}/{} mmHg",
                obs.reading.systolic_bp, obs.reading.diastolic_bp
            )?;
        }
        Ok(())
    }
}
