//! Voice catalog cache.
//!
//! Platform voice catalogs load lazily: the first snapshot is often empty and
//! the "voices changed" signal may or may not follow. [`VoiceCache`] waits for
//! that signal for a bounded time, then settles for whatever is there.
//!
//! The cache belongs to one adapter instance. A non-empty catalog is kept
//! until [`VoiceCache::invalidate`]; an empty result is never cached, so the
//! next lookup asks the platform again.

use std::time::Duration;

use flashcue_core::Voice;
use tokio::sync::Mutex;

use crate::backend::SpeechBackend;

/// How long to wait for the platform's "voices changed" signal.
pub const DEFAULT_VOICE_LOAD_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct VoiceCache {
    cached: Mutex<Option<Vec<Voice>>>,
    load_timeout: Duration,
}

impl VoiceCache {
    #[must_use]
    pub fn new(load_timeout: Duration) -> Self {
        Self {
            cached: Mutex::new(None),
            load_timeout,
        }
    }

    /// Return the cached catalog, loading it from `backend` on first use.
    ///
    /// Concurrent callers share a single load.
    pub async fn get(&self, backend: &dyn SpeechBackend) -> Vec<Voice> {
        let mut cached = self.cached.lock().await;
        if let Some(voices) = cached.as_ref() {
            return voices.clone();
        }

        let voices = self.load(backend).await;
        if !voices.is_empty() {
            *cached = Some(voices.clone());
        }
        voices
    }

    /// Drop the cached catalog; the next [`get`](Self::get) reloads it.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn load(&self, backend: &dyn SpeechBackend) -> Vec<Voice> {
        let voices = backend.voices();
        if !voices.is_empty() || !backend.is_available() {
            return voices;
        }

        if tokio::time::timeout(self.load_timeout, backend.voices_changed())
            .await
            .is_err()
        {
            tracing::warn!(
                timeout_ms = self.load_timeout.as_millis(),
                "Voice catalog did not signal readiness in time"
            );
        }

        let voices = backend.voices();
        tracing::debug!(count = voices.len(), "Voice catalog loaded");
        voices
    }
}

impl Default for VoiceCache {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE_LOAD_TIMEOUT)
    }
}
