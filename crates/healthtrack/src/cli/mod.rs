//! Command-line interface for healthtrack.
//!
//! This module provides the CLI structure for the `healthtrack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AddCommand, ConfigCommand, StatusCommand, UserCommand};

/// healthtrack - Track blood sugar and blood pressure
///
/// Records readings into a local database, gives immediate feedback on each
/// one, and reports history, averages and diabetes risk per user. Run without
/// a subcommand for the interactive menu.
#[derive(Debug, Parser)]
#[command(name = "healthtrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive session (the default)
    Chat,

    /// Record one reading and show feedback
    Add(AddCommand),

    /// List a user's past readings, newest first
    History(UserCommand),

    /// Show a user's average sugar and blood pressure
    Averages(UserCommand),

    /// Classify a user's average sugar level
    Risk(UserCommand),

    /// Show developer information
    About,

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
