//! Settings intents and shuffle behaviour.

mod common;

use std::time::Duration;

use common::speech::{Call, RecordingSpeech};
use common::{ids, items, past_debounce, quick_settings, seeded_config, settle};
use flashcue_core::{LoopMode, Phase, PlaybackSettings};
use flashcue_session::{EngineConfig, SessionController};

fn original(n: usize) -> Vec<String> {
    ids(&items(n))
}

#[tokio::test(start_paused = true)]
async fn toggling_shuffle_twice_restores_the_original_order() {
    let speech = RecordingSpeech::new(Duration::from_secs(1));
    let (handle, _events) =
        SessionController::spawn(items(20), quick_settings(), speech.port(), seeded_config())
            .unwrap();

    let shuffled = handle.toggle_shuffle().await.unwrap();
    assert!(shuffled.settings.shuffled);
    assert_eq!(shuffled.current_index, 0);
    assert_ne!(ids(&shuffled.items), original(20));

    let restored = handle.toggle_shuffle().await.unwrap();
    assert!(!restored.settings.shuffled);
    assert_eq!(ids(&restored.items), original(20));
    assert_eq!(restored.current_index, 0);
}

#[tokio::test(start_paused = true)]
async fn shuffled_settings_permute_once_at_start() {
    let speech = RecordingSpeech::new(Duration::from_secs(1));
    let settings = PlaybackSettings {
        shuffled: true,
        ..quick_settings()
    };
    let (handle, _events) =
        SessionController::spawn(items(20), settings, speech.port(), seeded_config()).unwrap();

    let state = handle.state();
    assert!(state.settings.shuffled);
    assert_ne!(ids(&state.items), original(20));

    let mut sorted = ids(&state.items);
    sorted.sort_by_key(|id| id[1..].parse::<usize>().unwrap());
    assert_eq!(sorted, original(20));
}

/// Mid-session, turning shuffle on must not swap the card being played.
/// Every other position is permuted around it.
#[tokio::test(start_paused = true)]
async fn shuffle_mid_session_keeps_the_current_card() {
    let speech = RecordingSpeech::new(Duration::from_secs(10));
    let (handle, _events) =
        SessionController::spawn(items(12), quick_settings(), speech.port(), seeded_config())
            .unwrap();

    handle.play().await.unwrap();
    settle().await;
    past_debounce().await;
    handle.next().await.unwrap();
    settle().await;
    speech.clear_calls();

    let state = handle.toggle_shuffle().await.unwrap();
    settle().await;

    assert!(state.settings.shuffled);
    assert!(state.is_playing);
    assert_eq!(state.phase, Phase::Front);
    assert_eq!(state.current_index, 1);
    assert_eq!(state.current_item().map(|i| i.id()), Some("c1"));
    assert_ne!(ids(&state.items), original(12));
    let mut sorted = ids(&state.items);
    sorted.sort_by_key(|id| id[1..].parse::<usize>().unwrap());
    assert_eq!(sorted, original(12));
    // The utterance in flight was left alone.
    assert!(speech.calls().is_empty());

    // The new order applies from the next advance.
    past_debounce().await;
    let after = handle.next().await.unwrap();
    assert_eq!(after.current_index, 2);
    assert_eq!(after.current_item(), state.items.get(2));
}

#[tokio::test(start_paused = true)]
async fn shuffle_at_the_last_card_reorders_the_wrapped_cycle() {
    let speech = RecordingSpeech::new(Duration::from_secs(10));
    let settings = PlaybackSettings {
        loop_mode: LoopMode::All,
        ..quick_settings()
    };
    let (handle, _events) =
        SessionController::spawn(items(20), settings, speech.port(), seeded_config()).unwrap();

    handle.play().await.unwrap();
    for _ in 0..19 {
        past_debounce().await;
        handle.next().await.unwrap();
    }
    assert_eq!(handle.state().current_index, 19);

    let state = handle.toggle_shuffle().await.unwrap();
    assert!(state.settings.shuffled);
    assert_eq!(state.current_index, 19);
    assert_eq!(state.current_item().map(|i| i.id()), Some("c19"));
    assert_ne!(ids(&state.items), original(20));

    past_debounce().await;
    let wrapped = handle.next().await.unwrap();
    assert_eq!(wrapped.current_index, 0);
    assert_eq!(ids(&wrapped.items), ids(&state.items));
    assert_ne!(ids(&wrapped.items), original(20));
}

#[tokio::test(start_paused = true)]
async fn unshuffle_mid_session_keeps_the_current_card() {
    let speech = RecordingSpeech::new(Duration::from_secs(10));
    let settings = PlaybackSettings {
        shuffled: true,
        ..quick_settings()
    };
    let (handle, _events) =
        SessionController::spawn(items(10), settings, speech.port(), seeded_config()).unwrap();

    handle.play().await.unwrap();
    past_debounce().await;
    let playing = handle.next().await.unwrap();
    let id = playing.current_item().map(|i| i.id().to_string());

    let state = handle.toggle_shuffle().await.unwrap();

    assert!(!state.settings.shuffled);
    assert_eq!(ids(&state.items), original(10));
    assert_eq!(state.current_item().map(|i| i.id().to_string()), id);
    assert!(state.is_playing);
}

#[tokio::test(start_paused = true)]
async fn pause_duration_and_volume_are_clamped() {
    let speech = RecordingSpeech::new(Duration::from_secs(1));
    let (handle, _events) =
        SessionController::spawn(items(2), quick_settings(), speech.port(), EngineConfig::default())
            .unwrap();

    assert_eq!(handle.set_pause_duration(2).await.unwrap().settings.pause_duration_seconds, 5);
    assert_eq!(handle.set_pause_duration(90).await.unwrap().settings.pause_duration_seconds, 60);
    assert_eq!(handle.set_pause_duration(12).await.unwrap().settings.pause_duration_seconds, 12);

    let volume = handle.set_volume(3.0).await.unwrap().settings.volume;
    assert!((volume - 1.0).abs() < f32::EPSILON);
    let volume = handle.set_volume(-1.0).await.unwrap().settings.volume;
    assert!(volume.abs() < f32::EPSILON);

    let rate = handle.set_rate(4.0).await.unwrap().settings.rate;
    assert!((rate - 2.0).abs() < f32::EPSILON);
    let pitch = handle.set_pitch(0.1).await.unwrap().settings.pitch;
    assert!((pitch - 0.5).abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn settings_do_not_interrupt_the_current_phase() {
    let speech = RecordingSpeech::new(Duration::from_secs(10));
    let (handle, _events) =
        SessionController::spawn(items(2), quick_settings(), speech.port(), EngineConfig::default())
            .unwrap();

    handle.play().await.unwrap();
    settle().await;
    speech.clear_calls();

    handle.set_voice(Some("fr-FR-1".into())).await.unwrap();
    handle.set_pause_duration(20).await.unwrap();
    handle.set_loop_mode(LoopMode::All).await.unwrap();
    let state = handle.set_volume(0.4).await.unwrap();

    assert_eq!(state.phase, Phase::Front);
    assert!(state.is_playing);
    assert_eq!(state.settings.voice_id.as_deref(), Some("fr-FR-1"));
    assert_eq!(speech.calls(), vec![Call::Volume(0.4)]);
}

#[tokio::test(start_paused = true)]
async fn new_pause_duration_applies_to_the_next_countdown() {
    let speech = RecordingSpeech::new(Duration::from_secs(1));
    let (handle, _events) =
        SessionController::spawn(items(2), quick_settings(), speech.port(), EngineConfig::default())
            .unwrap();

    handle.play().await.unwrap();
    // Inside the first countdown (front ends at 1s).
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let state = handle.set_pause_duration(30).await.unwrap();
    assert_eq!(state.phase, Phase::Pause);
    assert_eq!(state.pause_seconds_remaining, 5);

    let state = handle.skip_to_phase(Phase::Pause).await.unwrap();
    assert_eq!(state.pause_seconds_remaining, 30);
}
