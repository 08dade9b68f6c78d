//! Speech adapter for flashcue Listen Mode.
//!
//! [`SpeechAdapter`] implements the [`SpeechPort`](flashcue_core::SpeechPort)
//! contract on top of any [`SpeechBackend`], the raw platform text-to-speech
//! capability. Platform backends live with the application shell; this crate
//! only ships [`UnavailableBackend`] for platforms without speech.
#![deny(unused_crate_dependencies)]

pub mod adapter;
pub mod backend;
pub mod error;
pub mod keepalive;
pub mod speakable;
pub mod voices;

// Re-export key types for convenience
pub use adapter::{SpeechAdapter, SpeechAdapterConfig};
pub use backend::{SpeechBackend, UnavailableBackend, Utterance};
pub use error::BackendError;
pub use keepalive::{DEFAULT_KEEPALIVE_INTERVAL, Keepalive};
pub use voices::{DEFAULT_VOICE_LOAD_TIMEOUT, VoiceCache};

// Silence unused dev-dependency warnings; used by the integration tests
#[cfg(test)]
use tokio_test as _;
