//! Interactive numbered-menu session.
//!
//! The loop asks for a name and age once, then dispatches menu choices to the
//! recorder, reporter and analyzer until the user exits or input ends.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use tracing::debug;

use crate::analyzer::{Analyzer, NO_AVERAGES_MESSAGE, NO_RISK_MESSAGE};
use crate::error::Result;
use crate::observation::Session;
use crate::recorder::Recorder;
use crate::reporter::{Reporter, NO_RECORDS_MESSAGE};
use crate::storage::Storage;

/// Hidden menu token that shows [`DEVELOPER_INFO`].
pub const DEVELOPER_TOKEN: &str = "suraj";

/// Credits line.
pub const DEVELOPER_INFO: &str =
    "This tracker was developed by Suraj.\nKeep tracking, stay healthy!";

const MENU_TEXT: &str = "\
What would you like to do?
1. Add new health record
2. View past records
3. Show average sugar & BP
4. Analyze diabetes risk
5. Exit";

/// Something the user can ask for from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Enter and store a new reading.
    AddRecord,
    /// List past readings.
    ViewRecords,
    /// Show historical averages.
    ShowAverages,
    /// Classify the mean sugar level.
    AnalyzeRisk,
    /// Show who built this.
    DeveloperInfo,
    /// End the session.
    Exit,
}

impl Action {
    /// Map a typed menu choice to an action.
    ///
    /// Only `1` to `5` and the exact developer token are recognised.
    #[must_use]
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::AddRecord),
            "2" => Some(Self::ViewRecords),
            "3" => Some(Self::ShowAverages),
            "4" => Some(Self::AnalyzeRisk),
            "5" => Some(Self::Exit),
            DEVELOPER_TOKEN => Some(Self::DeveloperInfo),
            _ => None,
        }
    }
}

/// A prompt-driven session over arbitrary input and output streams.
#[derive(Debug)]
pub struct Menu<'s, R, W> {
    storage: &'s Storage,
    input: R,
    output: W,
}

impl<'s, R: BufRead, W: Write> Menu<'s, R, W> {
    /// Create a menu reading from `input` and writing to `output`.
    #[must_use]
    pub fn new(storage: &'s Storage, input: R, output: W) -> Self {
        Self {
            storage,
            input,
            output,
        }
    }

    /// Run the session to completion.
    ///
    /// Returns when the user picks Exit or the input stream ends. Invalid
    /// numeric input is reported and the menu is shown again.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal or the database fails.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Diabetes & BP Tracker Assistant")?;

        let Some(session) = self.start_session()? else {
            return Ok(());
        };
        debug!(user = session.user.as_str(), age = session.age, "session started");

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{MENU_TEXT}")?;
            let Some(choice) = self.prompt("> ")? else {
                break;
            };

            let Some(action) = Action::from_choice(&choice) else {
                writeln!(self.output, "Invalid option. Please try again.")?;
                continue;
            };

            if self.execute(&session, action)?.is_break() {
                break;
            }
        }

        Ok(())
    }

    /// Ask for name and age; `None` if input ended first.
    fn start_session(&mut self) -> Result<Option<Session>> {
        let name = loop {
            let Some(name) = self.prompt("What's your name? ")? else {
                return Ok(None);
            };
            if !name.is_empty() {
                break name;
            }
        };
        writeln!(self.output, "Welcome {name}, nice to see you!")?;

        let Some(raw_age) = self.prompt("What's your age? ")? else {
            return Ok(None);
        };
        let (age, defaulted) = Session::age_from_input(&raw_age);
        if defaulted {
            debug!(value = raw_age.as_str(), "unparsable age, defaulting to 0");
            writeln!(self.output, "Invalid age. Defaulting to 0.")?;
        }

        Ok(Some(Session::new(name, age)))
    }

    /// Perform one action for the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal or the database fails. Invalid
    /// numeric input is not an error here.
    pub fn execute(&mut self, session: &Session, action: Action) -> Result<ControlFlow<()>> {
        match action {
            Action::AddRecord => return self.add_record(session),
            Action::ViewRecords => match Reporter::new(self.storage).history(&session.user)? {
                Some(history) => writeln!(self.output, "{history}")?,
                None => writeln!(self.output, "{NO_RECORDS_MESSAGE}")?,
            },
            Action::ShowAverages => match Analyzer::new(self.storage).averages(&session.user)? {
                Some(averages) => writeln!(self.output, "{averages}")?,
                None => writeln!(self.output, "{NO_AVERAGES_MESSAGE}")?,
            },
            Action::AnalyzeRisk => match Analyzer::new(self.storage).risk(&session.user)? {
                Some(risk) => writeln!(self.output, "{risk}")?,
                None => writeln!(self.output, "{NO_RISK_MESSAGE}")?,
            },
            Action::DeveloperInfo => writeln!(self.output, "{DEVELOPER_INFO}")?,
            Action::Exit => {
                writeln!(self.output, "Goodbye! Stay healthy.")?;
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn add_record(&mut self, session: &Session) -> Result<ControlFlow<()>> {
        let Some(sugar) = self.prompt("Enter your blood sugar level (mg/dL): ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(systolic) = self.prompt("Enter systolic BP (upper number): ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(diastolic) = self.prompt("Enter diastolic BP (lower number): ")? else {
            return Ok(ControlFlow::Break(()));
        };

        match Recorder::new(self.storage).record(session, &sugar, &systolic, &diastolic) {
            Ok(feedback) => writeln!(self.output, "{feedback}")?,
            Err(err) if err.is_invalid_input() => writeln!(self.output, "{err}")?,
            Err(err) => return Err(err),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Print `text` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Consume the menu and hand back the output stream.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }
}
