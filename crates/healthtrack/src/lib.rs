//! `healthtrack` - Record blood sugar and blood pressure readings
//!
//! This library stores health observations in a local `SQLite` database,
//! classifies each reading against fixed thresholds, and reports per-user
//! history, averages and diabetes risk.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analyzer;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod observation;
pub mod recorder;
pub mod reporter;
pub mod storage;

pub use analyzer::{Analyzer, Averages, RiskAssessment};
pub use classify::{BloodPressure, SugarLevel};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use menu::{Action, Menu};
pub use observation::{Observation, Reading, Session, UserId};
pub use recorder::{Feedback, Recorder};
pub use reporter::{History, Reporter};
pub use storage::{Aggregate, Storage, StorageStats};
