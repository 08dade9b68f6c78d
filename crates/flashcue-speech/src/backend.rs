//! Speech engine backend trait: the raw platform text-to-speech capability.
//!
//! [`SpeechBackend`] is deliberately close to what platforms actually offer:
//! a voice list that may still be loading, a "voices changed" signal that may
//! never fire, a `speak` that can stall on long text, and a `cancel` that
//! makes the in-flight `speak` fail with "interrupted". The
//! [`SpeechAdapter`](crate::adapter::SpeechAdapter) turns this into the
//! well-behaved [`SpeechPort`](flashcue_core::SpeechPort) contract.

use async_trait::async_trait;
use flashcue_core::{Voice, VoiceOptions};

use crate::error::BackendError;

// ── Shared types ───────────────────────────────────────────────────

/// A single unit of speech handed to the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Plain text, already normalised for speaking.
    pub text: String,

    /// Voice identifier; `None` selects the platform default.
    pub voice_id: Option<String>,

    /// Rate multiplier (1.0 = normal).
    pub rate: f32,

    /// Pitch multiplier (1.0 = normal).
    pub pitch: f32,

    /// Volume (0.0–1.0).
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, options: &VoiceOptions) -> Self {
        Self {
            text: text.into(),
            voice_id: options.voice_id.clone(),
            rate: options.rate,
            pitch: options.pitch,
            volume: options.volume,
        }
    }
}

// ── Backend trait ──────────────────────────────────────────────────

/// Backend-agnostic platform speech engine.
///
/// Implementations must be `Send + Sync`; the adapter shares them with its
/// keepalive task.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Whether the platform has any speech capability.
    fn is_available(&self) -> bool;

    /// Current voice catalog snapshot (may be empty while still loading).
    fn voices(&self) -> Vec<Voice>;

    /// Resolves when the platform signals its voice catalog changed.
    ///
    /// May never resolve; callers must bound the wait.
    async fn voices_changed(&self);

    /// Speak an utterance, resolving when it finishes.
    ///
    /// `cancel()` makes an in-flight call resolve with
    /// [`BackendError::Interrupted`].
    async fn speak(&self, utterance: Utterance) -> Result<(), BackendError>;

    /// Cancel the in-flight utterance. Must be safe when idle.
    fn cancel(&self);

    /// Pause the in-flight utterance.
    fn pause(&self);

    /// Resume a paused utterance.
    fn resume(&self);

    /// Whether the engine reports it is currently speaking.
    fn is_speaking(&self) -> bool;

    /// Change volume of the in-flight utterance, if the engine supports it.
    fn set_volume(&self, _volume: f32) -> bool {
        false
    }
}

// ── Unavailable backend ────────────────────────────────────────────

/// Backend for platforms with no speech synthesis.
///
/// Sessions on top of it run in degraded mode: phases advance on fixed
/// timers instead of speech completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

#[async_trait]
impl SpeechBackend for UnavailableBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn voices_changed(&self) {
        std::future::pending::<()>().await;
    }

    async fn speak(&self, _utterance: Utterance) -> Result<(), BackendError> {
        Err(BackendError::Unavailable)
    }

    fn cancel(&self) {}

    fn pause(&self) {}

    fn resume(&self) {}

    fn is_speaking(&self) -> bool {
        false
    }
}
