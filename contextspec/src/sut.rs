//! System-under-test acquisition strategies.

use crate::{ConcernError, trace_categories};

/// Strategy for making a concern's system under test available before its state
/// transition runs.
pub trait SutAcquisition<C> {
    /// Initializes the system under test for `concern`, if the strategy has one.
    fn initialize(concern: &mut C) -> anyhow::Result<()>;
}

/// Acquisition strategy for concerns that test free functions or static behavior.
/// Never creates anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSystemUnderTest;

impl<C> SutAcquisition<C> for NoSystemUnderTest {
    fn initialize(_concern: &mut C) -> anyhow::Result<()> {
        tracing::trace!(target: trace_categories::SUT, "concern has no system under test");
        Ok(())
    }
}

/// Acquisition strategy for [`StatefulConcern`]s: invokes the factory at most once,
/// and not at all if the context already installed a system under test.
#[derive(Clone, Copy, Debug, Default)]
pub struct CreatesSystemUnderTest;

impl<C: StatefulConcern> SutAcquisition<C> for CreatesSystemUnderTest {
    fn initialize(concern: &mut C) -> anyhow::Result<()> {
        if concern.sut_slot().is_installed() {
            tracing::debug!(target: trace_categories::SUT, "keeping system under test installed by context");
            return Ok(());
        }

        let sut = concern.create_system_under_test()?;
        concern.sut_slot_mut().install(sut)?;

        tracing::debug!(target: trace_categories::SUT, "created system under test");
        Ok(())
    }
}

/// A concern that owns a system under test shared across its phases.
pub trait StatefulConcern {
    /// The type of the system under test.
    type Sut;

    /// Returns the slot holding the system under test.
    fn sut_slot(&self) -> &SutSlot<Self::Sut>;

    /// Returns the slot holding the system under test, for mutation.
    fn sut_slot_mut(&mut self) -> &mut SutSlot<Self::Sut>;

    /// Creates a fully initialized system under test.
    fn create_system_under_test(&mut self) -> anyhow::Result<Self::Sut>;

    /// Returns the system under test.
    fn sut(&self) -> Result<&Self::Sut, ConcernError> {
        self.sut_slot().get().ok_or(ConcernError::SutNotInitialized)
    }

    /// Returns the system under test, for mutation.
    fn sut_mut(&mut self) -> Result<&mut Self::Sut, ConcernError> {
        self.sut_slot_mut()
            .get_mut()
            .ok_or(ConcernError::SutNotInitialized)
    }
}

/// Write-once holder for a system under test. Once filled it is never replaced.
#[derive(Debug)]
pub struct SutSlot<T>(Option<T>);

impl<T> Default for SutSlot<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> SutSlot<T> {
    /// Returns whether a system under test has been installed.
    pub const fn is_installed(&self) -> bool {
        self.0.is_some()
    }

    /// Installs the system under test. Fails if one is already installed.
    pub fn install(&mut self, sut: T) -> Result<(), ConcernError> {
        if self.0.is_some() {
            return Err(ConcernError::SutAlreadyInstalled);
        }

        self.0 = Some(sut);
        Ok(())
    }

    /// Returns the installed system under test, if any.
    pub const fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Returns the installed system under test for mutation, if any.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_mut()
    }
}
