//! Core domain types and port definitions for flashcue Listen Mode.
//!
//! Listen Mode turns an ordered deck of flashcards into a hands-free audio
//! study session: each card is narrated front, paused, then narrated back.
//! This crate holds the types shared by the speech adapter, the session
//! engine and the UI layer. It has no adapter dependencies.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    CardRecord, CardSide, CardTag, DEFAULT_PAUSE_SECS, LoopMode, MAX_PAUSE_SECS, MAX_RATE,
    MIN_PAUSE_SECS, MIN_RATE, Phase, PlaybackSettings, SessionState, Side, StudyItem,
};
pub use events::SessionEvent;
pub use ports::{
    CardFilter, CardSource, CardSourceError, SpeechError, SpeechPort, Voice, VoiceOptions,
};

// Used by the integration tests only
#[cfg(test)]
use tokio as _;
