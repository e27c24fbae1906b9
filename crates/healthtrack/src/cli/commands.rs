//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Subcommand};

use crate::observation::{Session, UserId};

/// Add command arguments.
///
/// Measurements are taken as text so they go through the same validation as
/// interactive input.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Name the record is filed under (case-sensitive)
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub name: String,

    /// Age in years
    #[arg(short, long, default_value_t = 0)]
    pub age: i64,

    /// Blood sugar level in mg/dL
    #[arg(long, allow_hyphen_values = true)]
    pub sugar: String,

    /// Systolic blood pressure (upper number) in mmHg
    #[arg(long, allow_hyphen_values = true)]
    pub systolic: String,

    /// Diastolic blood pressure (lower number) in mmHg
    #[arg(long, allow_hyphen_values = true)]
    pub diastolic: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl AddCommand {
    /// The session this one-shot record belongs to.
    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(self.name.as_str(), self.age)
    }
}

/// Arguments for commands that report on one user.
#[derive(Debug, Args)]
pub struct UserCommand {
    /// Name to report on (case-sensitive)
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub name: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl UserCommand {
    /// The user being reported on.
    #[must_use]
    pub fn user(&self) -> UserId {
        UserId::new(self.name.as_str())
    }
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Also report how many records this user has
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub name: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl StatusCommand {
    /// The user to count records for, if one was named.
    #[must_use]
    pub fn user(&self) -> Option<UserId> {
        self.name.as_deref().map(UserId::new)
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
