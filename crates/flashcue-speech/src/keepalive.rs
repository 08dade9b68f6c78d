//! Long-utterance keepalive.
//!
//! Some platform engines silently stall on long text and report "speaking"
//! forever. While an utterance is in flight, the keepalive nudges the engine
//! with a pause/resume cycle at a fixed interval. It only ever nudges while
//! the engine still reports speaking, and it is cancelled the moment the
//! utterance ends or is stopped.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::backend::SpeechBackend;

/// Default nudge interval.
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);

/// Handle to a running keepalive task. Dropping it cancels the task.
#[derive(Debug)]
pub struct Keepalive {
    cancel_token: CancellationToken,
}

impl Keepalive {
    /// Start nudging `backend` every `every` until `cancel_token` fires.
    ///
    /// The first nudge happens one full interval after start. A zero
    /// interval disables nudging and spawns nothing.
    pub fn spawn(
        backend: Arc<dyn SpeechBackend>,
        every: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        if every.is_zero() {
            tracing::trace!("Keepalive disabled (zero interval)");
            return Self { cancel_token };
        }
        let token = cancel_token.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if token.is_cancelled() || !backend.is_speaking() {
                            continue;
                        }
                        tracing::debug!(
                            interval_ms = every.as_millis(),
                            "Nudging speech engine (pause/resume)"
                        );
                        backend.pause();
                        backend.resume();
                    }
                }
            }
        });

        Self { cancel_token }
    }

    /// Stop nudging. Idempotent.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for Keepalive {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
