//! Validating and storing new readings.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{BloodPressure, SugarLevel};
use crate::error::Result;
use crate::observation::{Observation, Reading, Session};
use crate::storage::Storage;

/// Records observations for a session and classifies them.
#[derive(Debug, Clone, Copy)]
pub struct Recorder<'a> {
    storage: &'a Storage,
}

impl<'a> Recorder<'a> {
    /// Create a recorder writing to the given store.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse the raw values, store one observation and classify it.
    ///
    /// Nothing is written unless all three values parse.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] for unparsable input, or a
    /// storage error if the insert fails.
    pub fn record(
        &self,
        session: &Session,
        sugar: &str,
        systolic: &str,
        diastolic: &str,
    ) -> Result<Feedback> {
        match Reading::parse(sugar, systolic, diastolic) {
            Ok(reading) => self.record_reading(session, reading),
            Err(err) => {
                debug!(user = session.user.as_str(), "rejected reading: {err:?}");
                Err(err)
            }
        }
    }

    /// Store an already-parsed reading and classify it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_reading(&self, session: &Session, reading: Reading) -> Result<Feedback> {
        let mut observation = Observation::new(session, reading);
        let id = self.storage.insert(&observation)?;
        observation.id = Some(id);

        let feedback = Feedback::for_observation(observation);
        info!(
            id,
            user = session.user.as_str(),
            sugar = %feedback.sugar,
            pressure = %feedback.pressure,
            "recorded observation"
        );
        Ok(feedback)
    }
}

/// Outcome of recording one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    /// The stored observation, including its id.
    pub observation: Observation,
    /// Sugar tier of this reading.
    pub sugar: SugarLevel,
    /// Blood pressure tier of this reading.
    pub pressure: BloodPressure,
}

impl Feedback {
    /// Classify an observation.
    #[must_use]
    pub fn for_observation(observation: Observation) -> Self {
        let reading = observation.reading;
        Self {
            sugar: SugarLevel::classify(reading.sugar_level),
            pressure: BloodPressure::classify(reading.systolic_bp, reading.diastolic_bp),
            observation,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Record saved successfully!")?;
        writeln!(f, "{}", self.sugar.feedback())?;
        write!(f, "{}", self.pressure.feedback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::observation::UserId;

    fn storage() -> Storage {
        crate::logging::init_test_logging();
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_record_stores_and_classifies() {
        let storage = storage();
        let session = Session::new("Priya", 38);

        let feedback = Recorder::new(&storage)
            .record(&session, "110", "130", "75")
            .unwrap();

        assert_eq!(feedback.sugar, SugarLevel::Prediabetic);
        assert_eq!(feedback.pressure, BloodPressure::Prehypertension);
        let id = feedback.observation.id.unwrap();

        let stored = storage.get(id).unwrap().unwrap();
        assert_eq!(stored, feedback.observation);
        assert_eq!(stored.age, 38);
    }

    #[test]
    fn test_record_round_trips_values() {
        let storage = storage();
        let session = Session::new("Priya", 38);
        Recorder::new(&storage)
            .record(&session, "97.25", "118", "79")
            .unwrap();

        let history = storage.query_by_name(&UserId::new("Priya")).unwrap();
        assert_eq!(history.len(), 1);
        let obs = &history[0];
        assert!((obs.reading.sugar_level - 97.25).abs() < f64::EPSILON);
        assert_eq!(obs.reading.systolic_bp, 118);
        assert_eq!(obs.reading.diastolic_bp, 79);
        assert_eq!(obs.timestamp.len(), 19);
    }

    #[test]
    fn test_invalid_sugar_writes_nothing() {
        let storage = storage();
        let session = Session::new("Priya", 38);
        let before = storage.count().unwrap();

        let err = Recorder::new(&storage)
            .record(&session, "sweet", "120", "80")
            .unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(storage.count().unwrap(), before);
    }

    #[test]
    fn test_invalid_pressure_writes_nothing() {
        let storage = storage();
        let session = Session::new("Priya", 38);
        let recorder = Recorder::new(&storage);

        assert!(matches!(
            recorder.record(&session, "90", "120/80", "80"),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            recorder.record(&session, "90", "120", "eighty"),
            Err(Error::InvalidInput { .. })
        ));
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_feedback_display() {
        let storage = storage();
        let session = Session::new("Priya", 38);
        let feedback = Recorder::new(&storage)
            .record(&session, "65", "85", "55")
            .unwrap();

        let text = feedback.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Record saved successfully!");
        assert_eq!(lines[1], "Warning: Low blood sugar!");
        assert_eq!(lines[2], "Low blood pressure.");
    }

    #[test]
    fn test_feedback_serializes_tiers() {
        let storage = storage();
        let session = Session::new("Priya", 38);
        let feedback = Recorder::new(&storage)
            .record(&session, "200", "150", "95")
            .unwrap();

        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json["sugar"], "high");
        assert_eq!(json["pressure"], "high");
        assert_eq!(json["observation"]["name"], "Priya");
    }
}
