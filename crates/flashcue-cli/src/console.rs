//! Console speech backend.
//!
//! Stands in for a platform speech engine in a terminal: each utterance is
//! printed and then "spoken" for as long as reading it aloud would take.
//! `cancel` cuts the wait short and reports the utterance as interrupted,
//! exactly like a real engine does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use flashcue_core::Voice;
use flashcue_speech::{BackendError, SpeechBackend, Utterance};
use tokio::sync::Notify;

/// Reading speed at rate 1.0.
const WORDS_PER_MINUTE: f32 = 160.0;

/// Shortest time any utterance takes.
const MIN_UTTERANCE: Duration = Duration::from_millis(400);

/// How long reading `text` aloud takes at `rate`.
#[must_use]
pub fn estimate_duration(text: &str, rate: f32) -> Duration {
    #[allow(clippy::cast_precision_loss)]
    let words = text.split_whitespace().count() as f32;
    let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
    let secs = words * 60.0 / (WORDS_PER_MINUTE * rate);
    Duration::from_secs_f32(secs).max(MIN_UTTERANCE)
}

pub struct ConsoleBackend {
    voices: Vec<Voice>,
    speaking: AtomicBool,
    cancelled: Notify,
}

impl ConsoleBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            voices: vec![Voice {
                id: "console".to_string(),
                display_name: "Console narrator".to_string(),
                locale: "en-US".to_string(),
            }],
            speaking: AtomicBool::new(false),
            cancelled: Notify::new(),
        }
    }
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechBackend for ConsoleBackend {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn voices_changed(&self) {
        std::future::pending::<()>().await;
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), BackendError> {
        let duration = estimate_duration(&utterance.text, utterance.rate);
        println!("  \u{1f50a} {}", utterance.text);

        self.speaking.store(true, Ordering::SeqCst);
        let result = tokio::select! {
            () = tokio::time::sleep(duration) => Ok(()),
            () = self.cancelled.notified() => Err(BackendError::Interrupted),
        };
        self.speaking.store(false, Ordering::SeqCst);
        result
    }

    fn cancel(&self) {
        self.cancelled.notify_waiters();
    }

    fn pause(&self) {
        tracing::trace!("Console narrator paused");
    }

    fn resume(&self) {
        tracing::trace!("Console narrator resumed");
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use flashcue_core::VoiceOptions;

    use super::*;

    #[test]
    fn duration_scales_with_words_and_rate() {
        let text = "one two three four five six seven eight nine ten";
        let normal = estimate_duration(text, 1.0);
        let fast = estimate_duration(text, 2.0);

        assert_eq!(normal, Duration::from_secs_f32(10.0 * 60.0 / 160.0));
        assert!(fast < normal);
        assert_eq!(estimate_duration("hi", 1.0), MIN_UTTERANCE);
        assert_eq!(estimate_duration("hi", f32::NAN), MIN_UTTERANCE);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_the_utterance() {
        let backend = Arc::new(ConsoleBackend::new());
        let speaking = {
            let backend = Arc::clone(&backend);
            tokio::spawn(async move {
                backend
                    .speak(Utterance::new("a long answer to read", &VoiceOptions::default()))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(backend.is_speaking());

        backend.cancel();
        assert_eq!(speaking.await.unwrap(), Err(BackendError::Interrupted));
        assert!(!backend.is_speaking());
    }

    #[tokio::test(start_paused = true)]
    async fn finishes_after_the_estimated_duration() {
        let backend = ConsoleBackend::new();
        let start = tokio::time::Instant::now();
        backend
            .speak(Utterance::new("hola", &VoiceOptions::default()))
            .await
            .unwrap();
        assert!(start.elapsed() >= MIN_UTTERANCE);
        assert!(!backend.is_speaking());
    }
}
