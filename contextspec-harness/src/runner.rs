//! Runner implementation.

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use contextspec::Concern;

use crate::config::RunnerOptions;
use crate::events::TraceConfig;
use crate::observation::{ConcernSuite, Observation};
use crate::reporting::{ObservationResult, Outcome, RunResults};

const RUNNER: &str = "runner";

/// Results of running every observation of one concern, together with the concern
/// instances that ran them (one per observation, in run order).
pub struct ConcernRun<C> {
    /// Aggregated results.
    pub results: RunResults,
    /// The concern instance used for each observation that ran.
    pub instances: Vec<C>,
}

/// Drives concerns through their lifecycle, one observation per instance.
#[derive(Clone, Debug, Default)]
pub struct ConcernRunner {
    options: RunnerOptions,
}

impl ConcernRunner {
    /// Creates a new runner with the given options.
    pub const fn new(options: RunnerOptions) -> Self {
        Self { options }
    }

    /// Returns the runner's options.
    pub const fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Installs tracing for the events selected in the runner's options.
    pub fn init_tracing(&self) -> TraceConfig {
        TraceConfig::init(&self.options.trace_events)
    }

    /// Runs every observation of `C`, each against a freshly created instance.
    pub fn run_concern<C: ConcernSuite + Default>(&self) -> ConcernRun<C> {
        let concern_name = C::name();
        let mut results = RunResults::named(concern_name);
        let mut instances = vec![];

        for observation in C::observations() {
            let qualified_name = format!("{concern_name}::{}", observation.name());

            if !self.options.should_run(&qualified_name) {
                results.skip_count += 1;
                continue;
            }

            if self.options.list_only {
                println!("{qualified_name}: test");
                continue;
            }

            let mut concern = C::default();
            results.record(self.run_observation(&mut concern, &observation));
            instances.push(concern);
        }

        ConcernRun { results, instances }
    }

    /// Runs one observation against `concern`: pre-observation, the observation body,
    /// then post-observation, which is attempted even when an earlier step failed or
    /// panicked.
    pub fn run_observation<C: Concern>(
        &self,
        concern: &mut C,
        observation: &Observation<C>,
    ) -> ObservationResult {
        let start = Instant::now();
        tracing::debug!(target: RUNNER, "running observation: {}", observation.name());

        let mut outcome = match guarded(|| concern.run_pre_observation()) {
            Ok(()) => observe(concern, observation),
            Err(outcome) => outcome,
        };

        if let Err(teardown) = guarded(|| concern.run_post_observation()) {
            if outcome.is_success() {
                outcome = teardown;
            } else {
                tracing::warn!(target: RUNNER, "teardown of {} also failed: {teardown:?}", observation.name());
            }
        }

        tracing::debug!(target: RUNNER, "observation {}: {outcome:?}", observation.name());

        ObservationResult {
            name: observation.name(),
            outcome,
            duration: start.elapsed(),
        }
    }
}

fn observe<C: Concern>(concern: &mut C, observation: &Observation<C>) -> Outcome {
    if let Err(err) = concern.lifecycle_mut().enter_observation() {
        return Outcome::Error(err.to_string());
    }

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| observation.invoke(concern)));

    match (result, observation.expected_error()) {
        (Err(payload), _) => Outcome::Failure(panic_message(&*payload)),
        (Ok(Ok(())), None) => Outcome::Passed,
        (Ok(Ok(())), Some(expected)) => Outcome::Failure(format!(
            "expected error {} was not raised",
            expected.description()
        )),
        (Ok(Err(err)), Some(expected)) => {
            if expected.matches(&err) {
                Outcome::Passed
            } else {
                Outcome::Failure(format!(
                    "expected error {}, but got: {err:#}",
                    expected.description()
                ))
            }
        }
        (Ok(Err(err)), None) => Outcome::Error(format!("{err:#}")),
    }
}

/// Runs a lifecycle entry point, turning an error or a panic into the outcome it
/// implies.
fn guarded(hook: impl FnOnce() -> anyhow::Result<()>) -> Result<(), Outcome> {
    match std::panic::catch_unwind(AssertUnwindSafe(hook)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(Outcome::Error(format!("{err:#}"))),
        Err(payload) => Err(Outcome::Failure(panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("panicked")
    }
}
