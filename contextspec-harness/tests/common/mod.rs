//! Concern fixtures shared by the integration tests.

#![allow(dead_code)]

use contextspec::{
    Concern, CreatesSystemUnderTest, LifecycleState, NoSystemUnderTest, StatefulConcern, SutSlot,
};
use contextspec_harness::{ConcernSuite, Observation};

/// How many times each hook and observation ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub context: u32,
    pub state_transition: u32,
    pub create_sut: u32,
    pub decontext: u32,
    pub test_something: u32,
    pub test_something_else: u32,
}

impl std::ops::Add for Counts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            context: self.context + other.context,
            state_transition: self.state_transition + other.state_transition,
            create_sut: self.create_sut + other.create_sut,
            decontext: self.decontext + other.decontext,
            test_something: self.test_something + other.test_something,
            test_something_else: self.test_something_else + other.test_something_else,
        }
    }
}

/// The error raised by [`StandardExceptionConcern`]'s state transition.
#[derive(thiserror::Error, Debug)]
#[error("state transition failed")]
pub struct TransitionFailed;

/// Implements the lifecycle plumbing shared by every fixture.
macro_rules! lifecycle_accessors {
    () => {
        fn lifecycle(&self) -> &LifecycleState<Self> {
            &self.lifecycle
        }

        fn lifecycle_mut(&mut self) -> &mut LifecycleState<Self> {
            &mut self.lifecycle
        }
    };
}

/// Implements a recording factory that leaves a unit system under test.
macro_rules! recording_factory {
    ($ty:ty) => {
        impl StatefulConcern for $ty {
            type Sut = ();

            fn sut_slot(&self) -> &SutSlot<()> {
                &self.sut
            }

            fn sut_slot_mut(&mut self) -> &mut SutSlot<()> {
                &mut self.sut
            }

            fn create_system_under_test(&mut self) -> anyhow::Result<()> {
                self.counts.create_sut += 1;
                self.call_log.push("create_system_under_test");
                Ok(())
            }
        }
    };
}

// ==================== Stateful concern ====================

/// A stateful concern that records every hook it receives.
#[derive(Default)]
pub struct StandardConcern {
    lifecycle: LifecycleState<Self>,
    sut: SutSlot<()>,
    pub counts: Counts,
    pub call_log: Vec<&'static str>,
}

impl Concern for StandardConcern {
    type Acquisition = CreatesSystemUnderTest;

    lifecycle_accessors!();

    fn establish_context(&mut self) -> anyhow::Result<()> {
        self.counts.context += 1;
        self.call_log.push("context");
        Ok(())
    }

    fn state_transition(&mut self) -> anyhow::Result<()> {
        self.counts.state_transition += 1;
        self.call_log.push("state_transition");
        Ok(())
    }

    fn decontext(&mut self) -> anyhow::Result<()> {
        self.counts.decontext += 1;
        self.call_log.push("decontext");
        Ok(())
    }
}

recording_factory!(StandardConcern);

impl StandardConcern {
    pub fn test_something(&mut self) -> anyhow::Result<()> {
        self.counts.test_something += 1;
        self.call_log.push("test_something");
        assert!(!self.call_log.is_empty());
        Ok(())
    }

    pub fn test_something_else(&mut self) -> anyhow::Result<()> {
        self.counts.test_something_else += 1;
        Ok(())
    }
}

impl ConcernSuite for StandardConcern {
    fn observations() -> Vec<Observation<Self>> {
        vec![
            Observation::new("test_something", Self::test_something),
            Observation::new("test_something_else", Self::test_something_else),
        ]
    }
}

// ==================== Stateless concern ====================

/// A stateless concern that nonetheless provides a factory, to prove it is never used.
#[derive(Default)]
pub struct StandardStaticConcern {
    pub lifecycle: LifecycleState<Self>,
    pub sut: SutSlot<()>,
    pub defer: bool,
    pub counts: Counts,
    pub call_log: Vec<&'static str>,
}

impl Concern for StandardStaticConcern {
    type Acquisition = NoSystemUnderTest;

    lifecycle_accessors!();

    fn establish_context(&mut self) -> anyhow::Result<()> {
        self.enable_deferred_exception(self.defer)?;
        self.counts.context += 1;
        self.call_log.push("context");
        Ok(())
    }

    fn state_transition(&mut self) -> anyhow::Result<()> {
        self.counts.state_transition += 1;
        self.call_log.push("state_transition");
        Ok(())
    }

    fn decontext(&mut self) -> anyhow::Result<()> {
        self.counts.decontext += 1;
        self.call_log.push("decontext");
        Ok(())
    }
}

recording_factory!(StandardStaticConcern);

impl StandardStaticConcern {
    pub fn test_something(&mut self) -> anyhow::Result<()> {
        self.counts.test_something += 1;
        self.call_log.push("test_something");
        Ok(())
    }

    pub fn capture_in_observation(&mut self) -> anyhow::Result<()> {
        self.call_log.push("capture_in_observation");
        self.capture_exception()?;
        self.call_log.push("capture_in_observation_end");
        Ok(())
    }
}

// ==================== Deferred exceptions ====================

/// A stateful concern whose state transition always fails, with deferral enabled.
#[derive(Default)]
pub struct StandardExceptionConcern {
    lifecycle: LifecycleState<Self>,
    sut: SutSlot<()>,
    pub counts: Counts,
    pub call_log: Vec<&'static str>,
}

impl Concern for StandardExceptionConcern {
    type Acquisition = CreatesSystemUnderTest;

    lifecycle_accessors!();

    fn establish_context(&mut self) -> anyhow::Result<()> {
        self.defer_exceptions()?;
        self.counts.context += 1;
        self.call_log.push("context");
        Ok(())
    }

    fn state_transition(&mut self) -> anyhow::Result<()> {
        self.counts.state_transition += 1;
        self.call_log.push("state_transition");
        Err(TransitionFailed.into())
    }

    fn decontext(&mut self) -> anyhow::Result<()> {
        self.counts.decontext += 1;
        self.call_log.push("decontext");
        Ok(())
    }
}

recording_factory!(StandardExceptionConcern);

impl StandardExceptionConcern {
    pub fn not_using_exception(&mut self) -> anyhow::Result<()> {
        self.call_log.push("not_using_exception");
        Ok(())
    }

    pub fn using_capture_exception(&mut self) -> anyhow::Result<()> {
        self.call_log.push("using_capture_exception");
        self.capture_exception()?;
        self.call_log.push("using_capture_exception_end");
        Ok(())
    }

    pub fn using_release_exception(&mut self) -> anyhow::Result<()> {
        self.call_log.push("using_release_exception");
        self.release_exception()
    }

    pub fn capturing_twice(&mut self) -> anyhow::Result<()> {
        self.capture_exception()?;
        self.capture_exception()?;
        Ok(())
    }
}

/// A stateless concern that passes a non-boolean value as the deferral flag.
#[derive(Default)]
pub struct NonBooleanFlagConcern {
    lifecycle: LifecycleState<Self>,
}

impl Concern for NonBooleanFlagConcern {
    type Acquisition = NoSystemUnderTest;

    lifecycle_accessors!();

    fn establish_context(&mut self) -> anyhow::Result<()> {
        self.enable_deferred_exception("This is not a boolean value")?;
        Ok(())
    }

    fn state_transition(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl NonBooleanFlagConcern {
    pub fn test_nothing(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl ConcernSuite for NonBooleanFlagConcern {
    fn observations() -> Vec<Observation<Self>> {
        vec![Observation::new("test_nothing", Self::test_nothing)]
    }
}

/// A stateless concern that explicitly disables deferral, then tries to use it.
#[derive(Default)]
pub struct DeferralNotEnabledConcern {
    lifecycle: LifecycleState<Self>,
    pub transitions: u32,
}

impl Concern for DeferralNotEnabledConcern {
    type Acquisition = NoSystemUnderTest;

    lifecycle_accessors!();

    fn establish_context(&mut self) -> anyhow::Result<()> {
        self.enable_deferred_exception(false)?;
        Ok(())
    }

    fn state_transition(&mut self) -> anyhow::Result<()> {
        self.transitions += 1;
        Ok(())
    }
}

impl DeferralNotEnabledConcern {
    pub fn test_releasing(&mut self) -> anyhow::Result<()> {
        self.release_exception()
    }

    pub fn test_capturing(&mut self) -> anyhow::Result<()> {
        self.capture_exception()?;
        Ok(())
    }
}

impl ConcernSuite for DeferralNotEnabledConcern {
    fn observations() -> Vec<Observation<Self>> {
        vec![
            Observation::new("test_releasing", Self::test_releasing),
            Observation::new("test_capturing", Self::test_capturing),
        ]
    }
}

/// A stateless concern with deferral enabled whose state transition succeeds.
#[derive(Default)]
pub struct ExceptionNotThrownConcern {
    lifecycle: LifecycleState<Self>,
    pub transitions: u32,
}

impl Concern for ExceptionNotThrownConcern {
    type Acquisition = NoSystemUnderTest;

    lifecycle_accessors!();

    fn establish_context(&mut self) -> anyhow::Result<()> {
        self.defer_exceptions()?;
        Ok(())
    }

    fn state_transition(&mut self) -> anyhow::Result<()> {
        self.transitions += 1;
        Ok(())
    }
}

impl ExceptionNotThrownConcern {
    pub fn observe_nothing(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl ConcernSuite for ExceptionNotThrownConcern {
    fn observations() -> Vec<Observation<Self>> {
        vec![Observation::new("observe_nothing", Self::observe_nothing)]
    }
}
