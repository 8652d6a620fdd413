//! The fixed per-observation lifecycle and its deferred-exception protocol.

use std::sync::Arc;

use crate::{ConcernError, FlagValue, SutAcquisition, trace_categories};

/// A state transition hook, bound for later invocation.
pub type Transition<C> = fn(&mut C) -> anyhow::Result<()>;

/// The lifecycle phase a concern instance has reached.
///
/// Phases only move forward. `Captured` and `Released` may be re-entered any number
/// of times while observing a concern whose transition was deferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// The instance exists; nothing has run yet.
    Created,
    /// The context hook is running.
    EstablishingContext,
    /// The context hook completed.
    ContextEstablished,
    /// The system under test (if any) is available.
    SutReady,
    /// The state transition ran during pre-observation.
    TransitionApplied,
    /// The state transition was bound for later invocation instead of running.
    TransitionDeferred,
    /// The observation body is running.
    Observing,
    /// A deferred transition was triggered via `capture_exception`.
    Captured,
    /// A deferred transition was triggered via `release_exception`.
    Released,
    /// Teardown ran. Terminal.
    Decontextualized,
}

/// An error raised by a deferred state transition and captured by the lifecycle.
///
/// The captured error is shared: the copy kept on the concern and the copy handed to
/// the caller (or re-raised by `release_exception`) refer to the same error.
#[derive(Clone, Debug)]
pub struct CapturedError(Arc<anyhow::Error>);

impl CapturedError {
    /// Returns the underlying error.
    pub fn error(&self) -> &anyhow::Error {
        &self.0
    }

    /// Returns whether the captured error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        self.0.is::<E>()
    }

    /// Returns the captured error as `E`, if it is one.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }
}

impl From<anyhow::Error> for CapturedError {
    fn from(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }
}

impl std::fmt::Display for CapturedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for CapturedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Per-instance lifecycle state, embedded in every [`Concern`].
pub struct LifecycleState<C> {
    phase: Phase,
    deferral_enabled: bool,
    deferred_transition: Option<Transition<C>>,
    captured: Option<CapturedError>,
}

impl<C> Default for LifecycleState<C> {
    fn default() -> Self {
        Self {
            phase: Phase::Created,
            deferral_enabled: false,
            deferred_transition: None,
            captured: None,
        }
    }
}

impl<C> std::fmt::Debug for LifecycleState<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleState")
            .field("phase", &self.phase)
            .field("deferral_enabled", &self.deferral_enabled)
            .field("transition_bound", &self.deferred_transition.is_some())
            .field("captured", &self.captured)
            .finish()
    }
}

impl<C> LifecycleState<C> {
    /// Returns the phase the instance has reached.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns whether the state transition is deferred for this instance.
    pub const fn deferral_enabled(&self) -> bool {
        self.deferral_enabled
    }

    /// Returns whether a state transition has been bound for deferred invocation.
    pub const fn transition_bound(&self) -> bool {
        self.deferred_transition.is_some()
    }

    /// Returns the most recent error captured from the deferred state transition.
    pub const fn captured_exception(&self) -> Option<&CapturedError> {
        self.captured.as_ref()
    }

    /// Marks the start of the observation body.
    ///
    /// Host runners call this between pre-observation and the observation itself.
    pub fn enter_observation(&mut self) -> Result<(), ConcernError> {
        match self.phase {
            Phase::TransitionApplied | Phase::TransitionDeferred => {
                self.advance(Phase::Observing);
                Ok(())
            }
            actual => Err(ConcernError::PhaseOrder {
                expected: if self.deferral_enabled {
                    Phase::TransitionDeferred
                } else {
                    Phase::TransitionApplied
                },
                actual,
            }),
        }
    }

    fn advance(&mut self, phase: Phase) {
        tracing::trace!(target: trace_categories::LIFECYCLE, "phase: {} => {phase}", self.phase);
        self.phase = phase;
    }

    /// Records that a deferred transition was triggered from the observation body.
    /// Outside of an observation the phase is left alone.
    fn record_trigger(&mut self, phase: Phase) {
        if matches!(
            self.phase,
            Phase::Observing | Phase::Captured | Phase::Released
        ) {
            self.advance(phase);
        }
    }

    fn require_phase(&self, expected: Phase) -> Result<(), ConcernError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ConcernError::PhaseOrder {
                expected,
                actual: self.phase,
            })
        }
    }

    fn bound_transition(&self, operation: &'static str) -> Result<Transition<C>, ConcernError> {
        if !self.deferral_enabled {
            return Err(ConcernError::NotConfiguredForExceptions { operation });
        }

        self.deferred_transition
            .ok_or(ConcernError::TransitionNotBound)
    }
}

/// A test case grouping one context and one state transition with its observations.
///
/// Implementors embed a [`LifecycleState`] and expose it through [`Concern::lifecycle`]
/// and [`Concern::lifecycle_mut`]; the provided methods drive the lifecycle.
///
/// ```
/// use contextspec::{Concern, LifecycleState, NoSystemUnderTest};
///
/// #[derive(Default)]
/// struct WhenDoublingANumber {
///     lifecycle: LifecycleState<Self>,
///     result: i32,
/// }
///
/// impl Concern for WhenDoublingANumber {
///     type Acquisition = NoSystemUnderTest;
///
///     fn lifecycle(&self) -> &LifecycleState<Self> {
///         &self.lifecycle
///     }
///
///     fn lifecycle_mut(&mut self) -> &mut LifecycleState<Self> {
///         &mut self.lifecycle
///     }
///
///     fn establish_context(&mut self) -> anyhow::Result<()> {
///         Ok(())
///     }
///
///     fn state_transition(&mut self) -> anyhow::Result<()> {
///         self.result = 21 * 2;
///         Ok(())
///     }
/// }
///
/// let mut concern = WhenDoublingANumber::default();
/// concern.run_pre_observation()?;
/// assert_eq!(concern.result, 42);
/// concern.run_post_observation()?;
/// # anyhow::Ok(())
/// ```
pub trait Concern: Sized {
    /// How this concern acquires its system under test.
    type Acquisition: SutAcquisition<Self>;

    /// Returns the concern's lifecycle state.
    fn lifecycle(&self) -> &LifecycleState<Self>;

    /// Returns the concern's lifecycle state for mutation.
    fn lifecycle_mut(&mut self) -> &mut LifecycleState<Self>;

    /// Establishes the context for one observation. May enable deferred exceptions.
    fn establish_context(&mut self) -> anyhow::Result<()>;

    /// Performs the single state transition under test.
    fn state_transition(&mut self) -> anyhow::Result<()>;

    /// Undoes the context after one observation.
    fn decontext(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs context establishment, system-under-test initialization and the state
    /// transition, in that order.
    ///
    /// When deferral is enabled the transition is not invoked; it is bound for later use
    /// by [`Concern::capture_exception`] and [`Concern::release_exception`]. Otherwise any
    /// error it raises is returned immediately.
    fn run_pre_observation(&mut self) -> anyhow::Result<()> {
        self.lifecycle().require_phase(Phase::Created)?;

        self.lifecycle_mut().advance(Phase::EstablishingContext);
        self.establish_context()?;
        self.lifecycle_mut().advance(Phase::ContextEstablished);

        Self::Acquisition::initialize(self)?;
        self.lifecycle_mut().advance(Phase::SutReady);

        if self.lifecycle().deferral_enabled {
            tracing::debug!(target: trace_categories::DEFERRAL, "deferring state transition");

            let state = self.lifecycle_mut();
            state.deferred_transition = Some(Self::state_transition);
            state.advance(Phase::TransitionDeferred);
        } else {
            self.state_transition()?;
            self.lifecycle_mut().advance(Phase::TransitionApplied);
        }

        Ok(())
    }

    /// Runs teardown. Errors from [`Concern::decontext`] are returned to the caller; the
    /// concern is decontextualized either way.
    fn run_post_observation(&mut self) -> anyhow::Result<()> {
        let actual = self.lifecycle().phase;
        if matches!(actual, Phase::Created | Phase::Decontextualized) {
            return Err(ConcernError::PhaseOrder {
                expected: Phase::Observing,
                actual,
            }
            .into());
        }

        let result = self.decontext();
        self.lifecycle_mut().advance(Phase::Decontextualized);

        result
    }

    /// Sets whether the state transition is deferred. Only valid while establishing
    /// context; anything other than a boolean is rejected.
    fn enable_deferred_exception(&mut self, flag: impl Into<FlagValue>) -> Result<(), ConcernError> {
        let enabled = flag.into().as_bool()?;

        let state = self.lifecycle_mut();
        if state.phase != Phase::EstablishingContext {
            return Err(ConcernError::DeferralOutsideContext(state.phase));
        }

        tracing::debug!(target: trace_categories::DEFERRAL, "deferred exceptions: {enabled}");
        state.deferral_enabled = enabled;

        Ok(())
    }

    /// Shorthand for `enable_deferred_exception(true)`.
    fn defer_exceptions(&mut self) -> Result<(), ConcernError> {
        self.enable_deferred_exception(true)
    }

    /// Invokes the deferred state transition and captures whatever it raises.
    ///
    /// Returns `None` if the transition completed without error, in which case any
    /// previously captured error is left in place. Each call invokes the transition
    /// again.
    fn capture_exception(&mut self) -> Result<Option<CapturedError>, ConcernError> {
        capture(self, "capture_exception")
    }

    /// Invokes the deferred state transition and returns whatever it raised as an
    /// error, so that an observation can hand it to an expected-error check.
    ///
    /// This never returns `Ok`. If the transition raised nothing, the returned error is
    /// [`ConcernError::NothingToRelease`].
    fn release_exception(&mut self) -> anyhow::Result<()> {
        let released = match capture(self, "release_exception")? {
            Some(captured) => anyhow::Error::new(captured),
            None => ConcernError::NothingToRelease.into(),
        };

        self.lifecycle_mut().record_trigger(Phase::Released);

        Err(released)
    }
}

fn capture<C: Concern>(
    concern: &mut C,
    operation: &'static str,
) -> Result<Option<CapturedError>, ConcernError> {
    let transition = concern.lifecycle().bound_transition(operation)?;

    tracing::debug!(target: trace_categories::DEFERRAL, "{operation}: invoking state transition");
    let result = transition(concern);

    let state = concern.lifecycle_mut();
    state.record_trigger(Phase::Captured);

    match result {
        Ok(()) => Ok(None),
        Err(error) => {
            tracing::debug!(target: trace_categories::DEFERRAL, "captured: {error:#}");

            let captured = CapturedError::from(error);
            state.captured = Some(captured.clone());
            Ok(Some(captured))
        }
    }
}
