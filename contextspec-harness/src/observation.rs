//! Observations and expected errors.

use contextspec::{CapturedError, Concern};

/// A concern together with the observations it defines.
pub trait ConcernSuite: Concern {
    /// Returns the concern's observations, in the order they should run.
    fn observations() -> Vec<Observation<Self>>;

    /// Returns the concern's display name.
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Self>();
        type_name.rsplit("::").next().unwrap_or(type_name)
    }
}

/// One independent, assertion-bearing check against a concern.
pub struct Observation<C> {
    name: &'static str,
    body: fn(&mut C) -> anyhow::Result<()>,
    expected_error: Option<ExpectedError>,
}

impl<C> Clone for Observation<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Observation<C> {}

impl<C> std::fmt::Debug for Observation<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observation")
            .field("name", &self.name)
            .field("expected_error", &self.expected_error)
            .finish_non_exhaustive()
    }
}

impl<C> Observation<C> {
    /// Creates an observation from its name and body.
    pub const fn new(name: &'static str, body: fn(&mut C) -> anyhow::Result<()>) -> Self {
        Self {
            name,
            body,
            expected_error: None,
        }
    }

    /// Registers an error the body is expected to raise.
    #[must_use]
    pub const fn expecting(mut self, expected: ExpectedError) -> Self {
        self.expected_error = Some(expected);
        self
    }

    /// Returns the observation's name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the error the body is expected to raise, if any.
    pub const fn expected_error(&self) -> Option<ExpectedError> {
        self.expected_error
    }

    pub(crate) fn invoke(&self, concern: &mut C) -> anyhow::Result<()> {
        (self.body)(concern)
    }
}

/// An error an observation body is expected to raise.
#[derive(Clone, Copy)]
pub struct ExpectedError {
    description: &'static str,
    matcher: fn(&anyhow::Error) -> bool,
}

impl std::fmt::Debug for ExpectedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description)
    }
}

impl ExpectedError {
    /// Expects an error of type `E`, whether raised directly or re-raised from a
    /// deferred state transition.
    pub fn of<E>() -> Self
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        Self {
            description: std::any::type_name::<E>(),
            matcher: error_is::<E>,
        }
    }

    /// Expects any error at all.
    pub const fn any() -> Self {
        Self {
            description: "any error",
            matcher: any_error,
        }
    }

    /// Returns whether `error` satisfies this expectation.
    pub fn matches(&self, error: &anyhow::Error) -> bool {
        (self.matcher)(error)
    }

    /// Returns a description of the expected error.
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

fn error_is<E>(error: &anyhow::Error) -> bool
where
    E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
{
    error.is::<E>()
        || error
            .downcast_ref::<CapturedError>()
            .is_some_and(|captured| captured.is::<E>())
}

const fn any_error(_error: &anyhow::Error) -> bool {
    true
}
