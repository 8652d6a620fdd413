//! Host runner adapter for `contextspec` concerns.
//!
//! The runner plays the part a conventional unit-test runner plays for a
//! Context/Specification base class: for every observation it creates a fresh concern,
//! invokes the concern's pre-observation entry point, runs the observation body, and
//! always invokes the post-observation entry point afterwards. Each observation yields
//! exactly one outcome:
//!
//! - **passed**: the body returned `Ok`, or returned the error it was expected to raise;
//! - **failure**: the body panicked (e.g. a failed `assert!`), raised a different error
//!   than expected, or did not raise an expected error;
//! - **error**: any other error, from the lifecycle hooks or the body.

mod config;
mod events;
mod observation;
mod reporting;
mod runner;

pub use config::{OutputFormat, RunnerOptions};
pub use events::{TraceConfig, TraceEvent};
pub use observation::{ConcernSuite, ExpectedError, Observation};
pub use reporting::{ObservationResult, Outcome, RunResults};
pub use runner::{ConcernRun, ConcernRunner};
