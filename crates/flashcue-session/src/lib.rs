//! Listen-Mode session engine.
//!
//! Turns an ordered list of [`StudyItem`](flashcue_core::StudyItem)s into a
//! timed, hands-free audio session:
//!
//! - [`Sequencer`]: card order, shuffling, next/previous resolution
//! - [`PhaseMachine`]: the front → pause → back → transition cycle
//! - [`SessionController`]: the task that owns the session state and
//!   drives a [`SpeechPort`](flashcue_core::SpeechPort)
//!
//! The UI talks to a running session through a [`SessionHandle`].
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod controller;
pub mod error;
pub mod phase;
pub mod sequencer;

// Re-export key types for convenience
pub use config::EngineConfig;
pub use controller::{Intent, SessionController, SessionHandle};
pub use error::SessionError;
pub use phase::{PhaseEffect, PhaseMachine, PhaseStep};
pub use sequencer::{Advance, Sequencer};

// Silence unused dev-dependency warnings; used by the integration tests
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use flashcue_speech as _;
#[cfg(test)]
use tokio_test as _;
