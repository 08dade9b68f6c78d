//! `SpeechAdapter`: the adapter that implements `SpeechPort`.
//!
//! Wraps a [`SpeechBackend`] and hides its quirks:
//!
//! - voice catalogs that load late ([`VoiceCache`]),
//! - engines that stall on long utterances ([`Keepalive`]),
//! - "interrupted"/"canceled" errors that merely echo our own `stop()`,
//! - markdown in card text ([`to_speakable`]).
//!
//! # Locking discipline
//!
//! The only lock held by the adapter guards the keepalive token of the
//! in-flight utterance. It is a std mutex and is never held across an
//! `.await` point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use flashcue_core::{SpeechError, SpeechPort, Voice, VoiceOptions};
use tokio_util::sync::CancellationToken;

use crate::backend::{SpeechBackend, Utterance};
use crate::error::into_port_result;
use crate::keepalive::{DEFAULT_KEEPALIVE_INTERVAL, Keepalive};
use crate::speakable::to_speakable;
use crate::voices::{DEFAULT_VOICE_LOAD_TIMEOUT, VoiceCache};

/// Adapter timing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechAdapterConfig {
    /// Pause/resume nudge interval while an utterance is in flight.
    pub keepalive_interval: Duration,
    /// Bounded wait for the platform's "voices changed" signal.
    pub voice_load_timeout: Duration,
}

impl Default for SpeechAdapterConfig {
    fn default() -> Self {
        Self {
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            voice_load_timeout: DEFAULT_VOICE_LOAD_TIMEOUT,
        }
    }
}

/// Keepalive token of the in-flight utterance, tagged with its generation.
type InFlight = (u64, CancellationToken);

/// Implements [`SpeechPort`] on top of a platform [`SpeechBackend`].
pub struct SpeechAdapter {
    backend: Arc<dyn SpeechBackend>,
    voices: VoiceCache,
    keepalive_interval: Duration,
    generation: AtomicU64,
    in_flight: Mutex<Option<InFlight>>,
}

impl SpeechAdapter {
    /// Create an adapter with default timings.
    pub fn new(backend: Arc<dyn SpeechBackend>) -> Self {
        Self::with_config(backend, SpeechAdapterConfig::default())
    }

    pub fn with_config(backend: Arc<dyn SpeechBackend>, config: SpeechAdapterConfig) -> Self {
        if !backend.is_available() {
            tracing::warn!("Speech synthesis unavailable - sessions will run on timers");
        }
        Self {
            backend,
            voices: VoiceCache::new(config.voice_load_timeout),
            keepalive_interval: config.keepalive_interval,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Send prepared text to the backend; empty text completes at once.
    async fn speak_prepared(&self, text: String, options: &VoiceOptions) -> Result<(), SpeechError> {
        if text.is_empty() {
            tracing::debug!("Blank utterance - completing immediately");
            return Ok(());
        }
        if !self.backend.is_available() {
            return Err(SpeechError::Unavailable);
        }

        // At most one utterance in flight.
        self.stop();

        let (generation, token) = self.arm();
        let keepalive = Keepalive::spawn(
            Arc::clone(&self.backend),
            self.keepalive_interval,
            token,
        );

        tracing::debug!(
            generation,
            chars = text.len(),
            voice = ?options.voice_id,
            "Speaking utterance"
        );
        let result = self.backend.speak(Utterance::new(text, options)).await;

        keepalive.cancel();
        self.disarm(generation);

        if let Err(ref e) = result {
            if !e.is_stop_echo() {
                tracing::warn!(generation, error = %e, "Utterance failed");
            }
        }
        into_port_result(result)
    }

    fn arm(&self) -> (u64, CancellationToken) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        *self.lock_in_flight() = Some((generation, token.clone()));
        (generation, token)
    }

    /// Clear the in-flight slot if it still belongs to `generation`.
    fn disarm(&self, generation: u64) {
        let mut slot = self.lock_in_flight();
        if slot.as_ref().is_some_and(|(g, _)| *g == generation) {
            if let Some((_, token)) = slot.take() {
                token.cancel();
            }
        }
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SpeechPort for SpeechAdapter {
    fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    async fn list_voices(&self) -> Vec<Voice> {
        self.voices.get(self.backend.as_ref()).await
    }

    async fn refresh_voices(&self) -> Vec<Voice> {
        self.voices.invalidate().await;
        self.list_voices().await
    }

    async fn speak(&self, text: &str, options: &VoiceOptions) -> Result<(), SpeechError> {
        self.speak_prepared(to_speakable(text), options).await
    }

    async fn speak_code(&self, text: &str, options: &VoiceOptions) -> Result<(), SpeechError> {
        let text = if text.trim().is_empty() {
            String::new()
        } else {
            text.to_owned()
        };
        self.speak_prepared(text, options).await
    }

    fn stop(&self) {
        if let Some((generation, token)) = self.lock_in_flight().take() {
            tracing::debug!(generation, "Stopping utterance");
            token.cancel();
        }
        self.backend.cancel();
    }

    fn apply_live_volume(&self, volume: f32) -> bool {
        self.backend.set_volume(volume)
    }
}

impl Drop for SpeechAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}
