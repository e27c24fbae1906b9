//! Threshold classification of blood sugar and blood pressure.
//!
//! Both tables are evaluated top to bottom and the first matching tier wins.
//! The blood pressure tiers overlap, so the order of the checks is part of
//! the contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the low sugar tier, mg/dL.
pub const SUGAR_LOW_BELOW: f64 = 70.0;
/// Upper bound (inclusive) of the normal sugar tier, mg/dL.
pub const SUGAR_NORMAL_MAX: f64 = 99.0;
/// Upper bound (inclusive) of the prediabetic sugar tier, mg/dL.
pub const SUGAR_PREDIABETIC_MAX: f64 = 125.0;

/// Blood sugar tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SugarLevel {
    /// Below 70 mg/dL (hypoglycemia warning).
    Low,
    /// 70 to 99 mg/dL.
    Normal,
    /// 100 to 125 mg/dL.
    Prediabetic,
    /// Above 125 mg/dL (possible diabetes).
    High,
}

impl SugarLevel {
    /// Classify a sugar value in mg/dL.
    ///
    /// Used both for single readings and for historical means.
    #[must_use]
    pub fn classify(sugar: f64) -> Self {
        if sugar < SUGAR_LOW_BELOW {
            Self::Low
        } else if sugar <= SUGAR_NORMAL_MAX {
            Self::Normal
        } else if sugar <= SUGAR_PREDIABETIC_MAX {
            Self::Prediabetic
        } else {
            Self::High
        }
    }

    /// Short tier label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::Prediabetic => "Prediabetic",
            Self::High => "High",
        }
    }

    /// Message shown right after a single reading is recorded.
    #[must_use]
    pub fn feedback(self) -> &'static str {
        match self {
            Self::Low => "Warning: Low blood sugar!",
            Self::Normal => "Sugar level is normal.",
            Self::Prediabetic => "Prediabetic sugar range.",
            Self::High => "High blood sugar! (Possible Diabetes)",
        }
    }

    /// Message shown when the tier describes a long-run average.
    #[must_use]
    pub fn risk_advice(self) -> &'static str {
        match self {
            Self::Low => "Risk: Low sugar (Hypoglycemia). You may feel dizzy or weak.",
            Self::Normal => "Your sugar levels are within the normal range.",
            Self::Prediabetic => {
                "Warning: Prediabetic range. Keep monitoring and maintain a healthy diet."
            }
            Self::High => "Alert: High risk of Diabetes! Please consult a doctor.",
        }
    }
}

impl fmt::Display for SugarLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Blood pressure tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressure {
    /// Systolic below 90 or diastolic below 60.
    Low,
    /// Systolic at most 120 and diastolic at most 80.
    Normal,
    /// Systolic 121-139 or diastolic 81-89.
    Prehypertension,
    /// Everything else.
    High,
}

impl BloodPressure {
    /// Classify a systolic/diastolic pair in mmHg.
    #[must_use]
    pub fn classify(systolic: i64, diastolic: i64) -> Self {
        if systolic < 90 || diastolic < 60 {
            Self::Low
        } else if systolic <= 120 && diastolic <= 80 {
            Self::Normal
        } else if (121..=139).contains(&systolic) || (81..=89).contains(&diastolic) {
            Self::Prehypertension
        } else {
            Self::High
        }
    }

    /// Short tier label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::Prehypertension => "Prehypertension",
            Self::High => "High",
        }
    }

    /// Message shown right after a single reading is recorded.
    #[must_use]
    pub fn feedback(self) -> &'static str {
        match self {
            Self::Low => "Low blood pressure.",
            Self::Normal => "Blood pressure is normal.",
            Self::Prehypertension => "Prehypertension range.",
            Self::High => "High blood pressure!",
        }
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
