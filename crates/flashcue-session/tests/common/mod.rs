//! Shared fixtures for the session engine integration tests.

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]

pub mod speech;

use std::time::Duration;

use flashcue_core::{Phase, PlaybackSettings, SessionEvent, StudyItem};
use flashcue_session::EngineConfig;
use tokio::sync::mpsc::UnboundedReceiver;

/// `n` plain items `c0..`, fronts `front i`, backs `back i`.
pub fn items(n: usize) -> Vec<StudyItem> {
    (0..n)
        .map(|i| StudyItem::plain(format!("c{i}"), format!("front {i}"), format!("back {i}")))
        .collect()
}

pub fn ids(items: &[StudyItem]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

/// Shortest pause the settings allow.
pub fn quick_settings() -> PlaybackSettings {
    let mut settings = PlaybackSettings::default();
    settings.set_pause_duration(5);
    settings
}

/// Deterministic shuffles.
pub fn seeded_config() -> EngineConfig {
    EngineConfig {
        shuffle_seed: Some(1234),
        ..EngineConfig::default()
    }
}

/// Receive events until `stop` matches one (inclusive).
pub async fn events_until(
    rx: &mut UnboundedReceiver<SessionEvent>,
    mut stop: impl FnMut(&SessionEvent) -> bool,
) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(600), rx.recv())
            .await
            .expect("timed out waiting for a session event")
            .expect("event channel closed");
        let done = stop(&event);
        seen.push(event);
        if done {
            return seen;
        }
    }
}

/// Wait for the given phase to be entered.
pub async fn until_phase(
    rx: &mut UnboundedReceiver<SessionEvent>,
    target: Phase,
) -> Vec<SessionEvent> {
    events_until(rx, |e| matches!(e, SessionEvent::PhaseEntered { phase, .. } if *phase == target)).await
}

/// Phases entered, in order.
pub fn phases(events: &[SessionEvent]) -> Vec<Phase> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::PhaseEntered { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect()
}

/// Let the controller task poll its live wait.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Sleep past the navigation debounce window.
pub async fn past_debounce() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}
