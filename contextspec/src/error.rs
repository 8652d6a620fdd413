use crate::Phase;

/// Errors raised by the concern lifecycle itself.
///
/// Errors raised by user hooks are carried as [`anyhow::Error`] and are never wrapped
/// in this type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConcernError {
    /// A non-boolean value was supplied for the deferred-exception flag.
    #[error("expected boolean; \"{0}\" given")]
    NonBooleanFlag(String),

    /// A deferred transition was requested on a concern that never enabled deferral.
    #[error(
        "must configure concern for an exception-throwing state transition prior to calling \"{operation}\""
    )]
    NotConfiguredForExceptions {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The deferred-exception flag was set outside of context establishment.
    #[error("deferred exceptions may only be configured while establishing context (phase: {0})")]
    DeferralOutsideContext(Phase),

    /// Deferral was enabled, but the state transition was never bound for later use.
    #[error("state transition has not been bound for deferred invocation")]
    TransitionNotBound,

    /// An exception was released, but the deferred state transition raised nothing.
    #[error("released exception from state transition, but the transition raised nothing")]
    NothingToRelease,

    /// The system under test was already installed and cannot be replaced.
    #[error("system under test is already installed")]
    SutAlreadyInstalled,

    /// The system under test was accessed before it was initialized.
    #[error("system under test has not been initialized")]
    SutNotInitialized,

    /// A lifecycle entry point was invoked out of order.
    #[error("lifecycle out of order: expected phase {expected}, found {actual}")]
    PhaseOrder {
        /// The phase the entry point requires.
        expected: Phase,
        /// The phase the concern was actually in.
        actual: Phase,
    },
}
