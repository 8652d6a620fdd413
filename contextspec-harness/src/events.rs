//! Tracing setup for lifecycle diagnostics.

use std::{collections::HashSet, fmt::Display};

use tracing_subscriber::{
    Layer, filter::Targets, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Category of lifecycle event to trace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces lifecycle phase changes.
    #[clap(name = "lifecycle")]
    Lifecycle,
    /// Traces deferral, capture and release of state transitions.
    #[clap(name = "deferral")]
    Deferral,
    /// Traces system-under-test acquisition.
    #[clap(name = "sut")]
    Sut,
    /// Traces the runner itself.
    #[clap(name = "runner")]
    Runner,
}

impl TraceEvent {
    pub(crate) const fn target(self) -> &'static str {
        match self {
            Self::Lifecycle => "lifecycle",
            Self::Deferral => "deferral",
            Self::Sut => "sut",
            Self::Runner => "runner",
        }
    }
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.target())
    }
}

/// Installed tracing configuration.
#[derive(Debug, Default)]
pub struct TraceConfig {
    enabled_trace_events: HashSet<TraceEvent>,
    installed: bool,
}

impl TraceConfig {
    /// Installs a global stderr subscriber with debug output for the given events.
    ///
    /// Installation fails if another global subscriber is already set; the runner
    /// proceeds regardless.
    pub fn init(enabled_events: &[TraceEvent]) -> Self {
        let mut config = Self {
            enabled_trace_events: enabled_events.iter().copied().collect(),
            installed: false,
        };

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_filter(config.compose_filter());

        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            config.installed = true;
        } else {
            // Another subscriber won; observations still run untraced.
            eprintln!("warning: failed to initialize tracing.");
        }

        config
    }

    fn compose_filter(&self) -> Targets {
        Targets::new()
            .with_default(tracing_subscriber::filter::LevelFilter::INFO)
            .with_targets(
                self.enabled_trace_events
                    .iter()
                    .map(|event| (event.target(), tracing::Level::DEBUG)),
            )
    }

    /// Returns the events enabled for debug output.
    pub const fn enabled_events(&self) -> &HashSet<TraceEvent> {
        &self.enabled_trace_events
    }

    /// Returns whether the subscriber was installed.
    pub const fn is_installed(&self) -> bool {
        self.installed
    }
}
