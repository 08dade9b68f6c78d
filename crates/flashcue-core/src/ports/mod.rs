//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the Listen-Mode engine expects from
//! infrastructure. They contain no implementation details and use only domain
//! types.

pub mod card_source;
pub mod speech;

pub use card_source::{CardFilter, CardSource, CardSourceError};
pub use speech::{SpeechError, SpeechPort, Voice, VoiceOptions};
