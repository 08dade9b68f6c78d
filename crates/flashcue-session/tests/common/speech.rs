//! Recording `SpeechPort` test double.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flashcue_core::{SpeechError, SpeechPort, Voice, VoiceOptions};

/// One observed call on the port.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Speak(String),
    SpeakCode(String),
    Stop,
    Volume(f32),
}

/// Speaks every utterance for a fixed duration and records the call order.
pub struct RecordingSpeech {
    available: bool,
    duration: Duration,
    calls: Mutex<Vec<Call>>,
    fail_next: Mutex<Option<SpeechError>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingSpeech {
    pub fn new(duration: Duration) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            duration,
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    /// A platform without speech synthesis.
    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            duration: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Speak(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Make the next utterance fail with `error`.
    pub fn fail_next(&self, error: SpeechError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn port(self: &Arc<Self>) -> Arc<dyn SpeechPort> {
        Arc::clone(self) as Arc<dyn SpeechPort>
    }

    async fn utter(&self, call: Call) -> Result<(), SpeechError> {
        self.calls.lock().unwrap().push(call);
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}

/// Decrements the in-flight count even when the utterance is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SpeechPort for RecordingSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn list_voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(&self, text: &str, _options: &VoiceOptions) -> Result<(), SpeechError> {
        self.utter(Call::Speak(text.to_string())).await
    }

    async fn speak_code(&self, text: &str, _options: &VoiceOptions) -> Result<(), SpeechError> {
        self.utter(Call::SpeakCode(text.to_string())).await
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push(Call::Stop);
    }

    fn apply_live_volume(&self, volume: f32) -> bool {
        self.calls.lock().unwrap().push(Call::Volume(volume));
        true
    }
}
