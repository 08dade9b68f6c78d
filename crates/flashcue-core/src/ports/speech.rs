//! Speech port: the contract the session engine requires from text-to-speech.
//!
//! # Design Rules
//!
//! - At most one utterance is ever in flight; `speak` stops the previous one.
//! - A stop that the platform reports as "interrupted"/"canceled" is a
//!   normal completion, not an error.
//! - Blank text completes immediately without touching the platform.
//! - `stop()` is idempotent and safe to call when nothing is speaking.
//!
//! Implemented by `SpeechAdapter` in `flashcue-speech`. Consumed by the
//! session controller in `flashcue-session`, which is the only caller while
//! Listen Mode is active.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// A voice offered by the platform speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Voice identifier passed back in [`VoiceOptions::voice_id`].
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// BCP-47 locale (e.g. `"en-US"`).
    pub locale: String,
}

/// Per-utterance voice parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceOptions {
    /// `None` selects the platform default voice.
    pub voice_id: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            voice_id: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// Speech failures surfaced to the session engine.
///
/// None of these is fatal to a session: the controller stores them as
/// `last_error` and pauses.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum SpeechError {
    /// The platform offers no speech capability at all.
    #[error("Speech synthesis is not available on this platform")]
    Unavailable,

    /// The platform reported a genuine engine error.
    #[error("Speech engine error: {0}")]
    Engine(String),

    /// The platform has no voices to choose from; the default voice is used.
    #[error("No speech voices available")]
    NoVoicesAvailable,
}

impl SpeechError {
    /// Whether retrying `play()` can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Engine(_))
    }
}

// ── Port trait ────────────────────────────────────────────────────────────────

/// Port trait for the speech adapter.
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Whether any speech engine is present.
    fn is_available(&self) -> bool;

    /// List the voices the platform offers.
    ///
    /// Always resolves, possibly with an empty list, even if the platform
    /// never signals that its voice catalog finished loading.
    async fn list_voices(&self) -> Vec<Voice>;

    /// Reload the voice catalog, dropping anything cached.
    async fn refresh_voices(&self) -> Vec<Voice> {
        self.list_voices().await
    }

    /// Speak `text`, resolving when the utterance finishes.
    async fn speak(&self, text: &str, options: &VoiceOptions) -> Result<(), SpeechError>;

    /// Speak a code side. `text` reaches the engine as written; no markup is
    /// stripped.
    async fn speak_code(&self, text: &str, options: &VoiceOptions) -> Result<(), SpeechError> {
        self.speak(text, options).await
    }

    /// Stop the in-flight utterance, if any.
    fn stop(&self);

    /// Apply a volume change to the in-flight utterance.
    ///
    /// Returns `false` when the engine cannot change volume mid-utterance; the
    /// new volume then applies from the next utterance.
    fn apply_live_volume(&self, _volume: f32) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_engine_errors_are_retryable() {
        assert!(SpeechError::Engine("synthesis-failed".into()).is_retryable());
        assert!(!SpeechError::Unavailable.is_retryable());
        assert!(!SpeechError::NoVoicesAvailable.is_retryable());
    }

    #[test]
    fn error_serializes_with_kind_tag() {
        let json = serde_json::to_value(SpeechError::Engine("boom".into())).unwrap();
        assert_eq!(json["kind"], "engine");
        assert_eq!(json["message"], "boom");
    }
}
