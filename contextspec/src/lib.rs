//! Context/Specification lifecycle for unit tests.
//!
//! A *concern* groups one shared context and one state transition with any number of
//! independent observations. For every observation, a host runner drives the concern
//! through a fixed sequence of phases:
//!
//! 1. [`Concern::establish_context`] sets up preconditions.
//! 2. The concern's [`SutAcquisition`] strategy initializes the system under test (once).
//! 3. [`Concern::state_transition`] performs the single action under test, unless the
//!    concern deferred it with [`Concern::enable_deferred_exception`].
//! 4. The observation body runs; a deferred transition may be triggered from here with
//!    [`Concern::capture_exception`] or [`Concern::release_exception`].
//! 5. [`Concern::decontext`] tears down.
//!
//! Phases 1-3 are run by [`Concern::run_pre_observation`] and phase 5 by
//! [`Concern::run_post_observation`].
//!
//! # Stateful and stateless concerns
//!
//! Concerns that exercise an object pick [`CreatesSystemUnderTest`] as their acquisition
//! strategy and implement [`StatefulConcern`]. Concerns that exercise free functions or
//! static behavior pick [`NoSystemUnderTest`], and no factory is ever invoked.

mod error;
mod flag;
mod lifecycle;
mod sut;
mod trace_categories;

pub use error::ConcernError;
pub use flag::FlagValue;
pub use lifecycle::{CapturedError, Concern, LifecycleState, Phase, Transition};
pub use sut::{CreatesSystemUnderTest, NoSystemUnderTest, StatefulConcern, SutAcquisition, SutSlot};
