//! Aggregate statistics and diabetes risk over a user's whole history.
//!
//! There is no time window: every stored observation for the user is
//! included each time.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::classify::SugarLevel;
use crate::error::Result;
use crate::observation::UserId;
use crate::storage::Storage;

/// Shown when averages are requested for a user with no records.
pub const NO_AVERAGES_MESSAGE: &str = "Not enough data to calculate averages.";

/// Shown when risk is requested for a user with no records.
pub const NO_RISK_MESSAGE: &str = "Not enough data to analyze risk.";

/// Computes means and risk tiers from stored observations.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    storage: &'a Storage,
}

impl<'a> Analyzer<'a> {
    /// Create an analyzer reading from the given store.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Mean sugar, systolic and diastolic values for `user`, each rounded to
    /// two decimals.
    ///
    /// Returns `None` when there is no data to average.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn averages(&self, user: &UserId) -> Result<Option<Averages>> {
        let averages = self
            .storage
            .aggregate_by_name(user)?
            .map(|agg| Averages {
                user: user.clone(),
                count: agg.count,
                mean_sugar: round2(agg.mean_sugar),
                mean_systolic: round2(agg.mean_systolic),
                mean_diastolic: round2(agg.mean_diastolic),
            });
        Ok(averages)
    }

    /// Classify the user's mean sugar level as a risk tier.
    ///
    /// The mean is rounded to two decimals before classification, so the
    /// tier always agrees with the value displayed. Returns `None` when there
    /// is no data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn risk(&self, user: &UserId) -> Result<Option<RiskAssessment>> {
        let Some(agg) = self.storage.aggregate_by_name(user)? else {
            return Ok(None);
        };

        let mean_sugar = round2(agg.mean_sugar);
        let tier = SugarLevel::classify(mean_sugar);
        debug!(user = user.as_str(), mean_sugar, %tier, "assessed risk");

        Ok(Some(RiskAssessment {
            user: user.clone(),
            count: agg.count,
            mean_sugar,
            tier,
        }))
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Historical means for one user, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averages {
    /// Whose observations were averaged.
    pub user: UserId,
    /// How many observations were averaged.
    pub count: i64,
    /// Mean blood sugar, mg/dL.
    pub mean_sugar: f64,
    /// Mean systolic pressure, mmHg.
    pub mean_systolic: f64,
    /// Mean diastolic pressure, mmHg.
    pub mean_diastolic: f64,
}

impl fmt::Display for Averages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Averages:")?;
        writeln!(f, "   Sugar Level: {:.2} mg/dL", self.mean_sugar)?;
        write!(
            f,
            "   Blood Pressure: {:.2}/{:.2} mmHg",
            self.mean_systolic, self.mean_diastolic
        )
    }
}

/// Sugar-based risk tier derived from a user's mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Whose history was assessed.
    pub user: UserId,
    /// How many observations went into the mean.
    pub count: i64,
    /// Mean sugar level rounded to two decimals, mg/dL.
    pub mean_sugar: f64,
    /// Tier of the mean.
    pub tier: SugarLevel,
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Diabetes Risk Analysis for {}", self.user)?;
        writeln!(f, "   Average Sugar Level: {:.2} mg/dL", self.mean_sugar)?;
        write!(f, "{}", self.tier.risk_advice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Session;
    use crate::recorder::Recorder;

    fn storage_with(name: &str, readings: &[(&str, &str, &str)]) -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        let session = Session::new(name, 33);
        let recorder = Recorder::new(&storage);
        for (sugar, sys, dia) in readings {
            recorder.record(&session, sugar, sys, dia).unwrap();
        }
        storage
    }

    #[test]
    fn test_mean_sugar_exact() {
        let storage = storage_with(
            "Lena",
            &[("80", "110", "70"), ("100", "120", "80"), ("120", "130", "90")],
        );
        let averages = Analyzer::new(&storage)
            .averages(&UserId::new("Lena"))
            .unwrap()
            .unwrap();

        assert_eq!(averages.count, 3);
        assert!((averages.mean_sugar - 100.0).abs() < f64::EPSILON);
        assert!((averages.mean_systolic - 120.0).abs() < f64::EPSILON);
        assert!((averages.mean_diastolic - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_averages_display_two_decimals() {
        let storage = storage_with("Lena", &[("80", "110", "70"), ("81", "121", "75")]);
        let averages = Analyzer::new(&storage)
            .averages(&UserId::new("Lena"))
            .unwrap()
            .unwrap();

        let text = averages.to_string();
        assert!(text.contains("Sugar Level: 80.50 mg/dL"));
        assert!(text.contains("Blood Pressure: 115.50/72.50 mmHg"));
    }

    #[test]
    fn test_averages_json_matches_risk_rounding() {
        let storage = storage_with(
            "Lena",
            &[("80", "110", "70"), ("81", "111", "71"), ("81", "111", "71")],
        );
        let analyzer = Analyzer::new(&storage);
        let user = UserId::new("Lena");

        let averages = serde_json::to_value(analyzer.averages(&user).unwrap().unwrap()).unwrap();
        let risk = serde_json::to_value(analyzer.risk(&user).unwrap().unwrap()).unwrap();

        assert_eq!(averages["mean_sugar"], 80.67);
        assert_eq!(averages["mean_systolic"], 110.67);
        assert_eq!(averages["mean_diastolic"], 70.67);
        assert_eq!(averages["mean_sugar"], risk["mean_sugar"]);
    }

    #[test]
    fn test_averages_none_without_records() {
        let storage = storage_with("Lena", &[("80", "110", "70")]);
        let analyzer = Analyzer::new(&storage);

        assert!(analyzer.averages(&UserId::new("Nobody")).unwrap().is_none());
        assert!(analyzer.risk(&UserId::new("Nobody")).unwrap().is_none());
    }

    #[test]
    fn test_zero_valued_average_is_still_reported() {
        let storage = storage_with("Lena", &[("0", "0", "0")]);
        let averages = Analyzer::new(&storage)
            .averages(&UserId::new("Lena"))
            .unwrap();
        assert!(averages.is_some());
    }

    #[test]
    fn test_risk_uses_mean_not_single_reading() {
        // One high reading, mean still normal
        let storage = storage_with(
            "Lena",
            &[("80", "120", "80"), ("85", "120", "80"), ("130", "120", "80")],
        );
        let risk = Analyzer::new(&storage)
            .risk(&UserId::new("Lena"))
            .unwrap()
            .unwrap();

        assert!((risk.mean_sugar - 98.33).abs() < 1e-9);
        assert_eq!(risk.tier, SugarLevel::Normal);
    }

    #[test]
    fn test_risk_tiers() {
        for (sugar, tier) in [
            ("65", SugarLevel::Low),
            ("85", SugarLevel::Normal),
            ("110", SugarLevel::Prediabetic),
            ("200", SugarLevel::High),
        ] {
            let storage = storage_with("Lena", &[(sugar, "120", "80")]);
            let risk = Analyzer::new(&storage)
                .risk(&UserId::new("Lena"))
                .unwrap()
                .unwrap();
            assert_eq!(risk.tier, tier, "sugar {sugar}");
        }
    }

    #[test]
    fn test_risk_rounds_before_classifying() {
        // Mean 99.003 rounds to 99.00, which is normal
        let storage = storage_with(
            "Lena",
            &[("99", "120", "80"), ("99", "120", "80"), ("99.009", "120", "80")],
        );
        let risk = Analyzer::new(&storage)
            .risk(&UserId::new("Lena"))
            .unwrap()
            .unwrap();

        assert!((risk.mean_sugar - 99.0).abs() < 1e-9);
        assert_eq!(risk.tier, SugarLevel::Normal);
    }

    #[test]
    fn test_risk_display() {
        let storage = storage_with("Lena", &[("150", "120", "80")]);
        let risk = Analyzer::new(&storage)
            .risk(&UserId::new("Lena"))
            .unwrap()
            .unwrap();

        let text = risk.to_string();
        assert!(text.starts_with("Diabetes Risk Analysis for Lena"));
        assert!(text.contains("Average Sugar Level: 150.00 mg/dL"));
        assert!(text.ends_with(SugarLevel::High.risk_advice()));
    }

    #[test]
    fn test_round2() {
        assert!((round2(98.333_333) - 98.33).abs() < 1e-9);
        assert!((round2(100.0) - 100.0).abs() < f64::EPSILON);
    }
}
