//! Configuration types for the runner.

use clap::Parser;

use crate::TraceEvent;

/// Output format for run results.
#[derive(Clone, Copy, Default, clap::ValueEnum, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Minimal output.
    Terse,
}

/// Command-line options for the runner.
#[derive(Clone, Parser, Debug, Default)]
#[clap(about, disable_version_flag = true)]
pub struct RunnerOptions {
    /// Output format for results.
    #[clap(long = "format", default_value = "pretty")]
    pub format: OutputFormat,

    /// Display details regarding successful observations.
    #[clap(short = 'v', long = "verbose", env = "CONTEXTSPEC_VERBOSE")]
    pub verbose: bool,

    /// List available observations without running them.
    #[clap(long = "list")]
    pub list_only: bool,

    /// Exactly match filters (not just substring match).
    #[clap(long = "exact")]
    pub exact_match: bool,

    /// Enable debug tracing for the given categories.
    #[clap(long = "trace")]
    pub trace_events: Vec<TraceEvent>,

    /// Patterns for observations to be excluded.
    #[clap(long = "skip")]
    pub exclude_filters: Vec<String>,

    /// Patterns for observations to be included.
    pub include_filters: Vec<String>,
}

impl RunnerOptions {
    /// Returns whether an observation should run based on include/exclude filters.
    ///
    /// Observations are named `<concern>::<observation>`.
    pub fn should_run(&self, qualified_name: &str) -> bool {
        // If any include filters were given, then we are in opt-in mode.
        if !self.include_filters.is_empty()
            && !self.matches_filters(qualified_name, &self.include_filters)
        {
            return false;
        }

        !self.matches_filters(qualified_name, &self.exclude_filters)
    }

    fn matches_filters(&self, qualified_name: &str, filters: &[String]) -> bool {
        if self.exact_match {
            filters.iter().any(|f| f == qualified_name)
        } else {
            filters.iter().any(|f| qualified_name.contains(f.as_str()))
        }
    }
}
