//! Reporting utilities for run results.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::config::{OutputFormat, RunnerOptions};

/// The outcome of one observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The observation passed.
    Passed,
    /// An assertion in the observation failed.
    Failure(String),
    /// The observation, or one of the lifecycle hooks around it, raised an error.
    Error(String),
}

impl Outcome {
    /// Returns whether the observation passed.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns the failure or error message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failure(message) | Self::Error(message) => Some(message.as_str()),
        }
    }
}

/// Result of running a single observation.
#[derive(Clone, Debug)]
pub struct ObservationResult {
    /// Name of the observation.
    pub name: &'static str,
    /// What happened.
    pub outcome: Outcome,
    /// How long the full lifecycle took.
    pub duration: Duration,
}

/// Aggregated results of running one or more observations.
#[derive(Clone, Debug, Default)]
pub struct RunResults {
    /// Name of the concern the observations belong to.
    pub name: Option<String>,
    /// Per-observation results, in run order.
    pub observation_results: Vec<ObservationResult>,
    /// Number of passed observations.
    pub success_count: u32,
    /// Number of failed observations.
    pub failure_count: u32,
    /// Number of observations that raised errors.
    pub error_count: u32,
    /// Number of observations excluded by filters.
    pub skip_count: u32,
}

impl RunResults {
    /// Creates an empty result set for the named concern.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Records the result of one observation.
    pub fn record(&mut self, result: ObservationResult) {
        match result.outcome {
            Outcome::Passed => self.success_count += 1,
            Outcome::Failure(_) => self.failure_count += 1,
            Outcome::Error(_) => self.error_count += 1,
        }

        self.observation_results.push(result);
    }

    /// Returns whether no observation failed or raised an error.
    pub const fn was_successful(&self) -> bool {
        self.failure_count == 0 && self.error_count == 0
    }

    /// Returns the number of observations that ran.
    pub const fn run_count(&self) -> u32 {
        self.success_count + self.failure_count + self.error_count
    }

    /// Returns the result for the named observation.
    pub fn result(&self, name: &str) -> Option<&ObservationResult> {
        self.observation_results.iter().find(|r| r.name == name)
    }

    /// Writes the results to a writer in the configured format.
    pub fn report<W: Write>(&self, mut writer: W, options: &RunnerOptions) -> Result<()> {
        match options.format {
            OutputFormat::Pretty => {
                for result in &self.observation_results {
                    write_result_details(&mut writer, result, options)?;
                }
                self.write_summary(&mut writer)
            }
            OutputFormat::Terse => self.write_terse(&mut writer),
        }
    }

    /// Reports the results to stderr.
    pub fn report_pretty(&self, options: &RunnerOptions) -> Result<()> {
        self.report(std::io::stderr(), options)
    }

    fn write_summary<W: Write>(&self, writer: &mut W) -> Result<()> {
        let formatted_failure_count = if self.failure_count > 0 {
            self.failure_count.to_string().red()
        } else {
            self.failure_count.to_string().green()
        };

        let formatted_error_count = if self.error_count > 0 {
            self.error_count.to_string().bright_red()
        } else {
            self.error_count.to_string().green()
        };

        let formatted_skip_count = if self.skip_count > 0 {
            self.skip_count.to_string().cyan()
        } else {
            self.skip_count.to_string().green()
        };

        writeln!(
            writer,
            "================================================================================"
        )?;
        writeln!(
            writer,
            "{}: {} observation(s) ran: {} passed, {} failed, {} errored, {} skipped.",
            self.name.as_deref().unwrap_or("(unnamed)").italic(),
            self.run_count(),
            self.success_count.to_string().green(),
            formatted_failure_count,
            formatted_error_count,
            formatted_skip_count,
        )?;
        writeln!(
            writer,
            "================================================================================"
        )?;

        Ok(())
    }

    fn write_terse<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "{}: ran={} passed={} failed={} errored={} skipped={}",
            self.name.as_deref().unwrap_or("(unnamed)"),
            self.run_count(),
            self.success_count,
            self.failure_count,
            self.error_count,
            self.skip_count,
        )?;

        Ok(())
    }
}

fn write_result_details<W: Write>(
    writer: &mut W,
    result: &ObservationResult,
    options: &RunnerOptions,
) -> Result<()> {
    if result.outcome.is_success() && !options.verbose {
        return Ok(());
    }

    write!(
        writer,
        "* {}: [{}]... ",
        "Observation".bright_yellow(),
        result.name.italic()
    )?;

    match &result.outcome {
        Outcome::Passed => writeln!(writer, "{} ({:?})", "ok.".bright_green(), result.duration)?,
        Outcome::Failure(message) => {
            writeln!(writer, "{}", "FAILED.".bright_red())?;
            writeln!(writer, "    {message}")?;
        }
        Outcome::Error(message) => {
            writeln!(writer, "{}", "ERROR.".bright_magenta())?;
            writeln!(writer, "    {message}")?;
        }
    }

    Ok(())
}
