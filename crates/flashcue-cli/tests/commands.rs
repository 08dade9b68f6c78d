//! Typed commands driving a silent session.

use std::ops::ControlFlow;
use std::sync::Arc;

use async_trait::async_trait;
use flashcue_cli::{ReplCommand, execute, load_engine_config};
use flashcue_core::{
    LoopMode, Phase, PlaybackSettings, SpeechError, SpeechPort, StudyItem, Voice, VoiceOptions,
};
use flashcue_session::{EngineConfig, SessionController, SessionHandle};
use flashcue_speech::{SpeechAdapter, UnavailableBackend};
use mockall::mock;

mock! {
    Speech {}

    #[async_trait]
    impl SpeechPort for Speech {
        fn is_available(&self) -> bool;
        async fn list_voices(&self) -> Vec<Voice>;
        async fn refresh_voices(&self) -> Vec<Voice>;
        async fn speak(&self, text: &str, options: &VoiceOptions) -> Result<(), SpeechError>;
        fn stop(&self);
    }
}

fn silent_session() -> (SessionHandle, Arc<dyn SpeechPort>) {
    session_over(Arc::new(SpeechAdapter::new(Arc::new(UnavailableBackend))))
}

fn session_over(speech: Arc<dyn SpeechPort>) -> (SessionHandle, Arc<dyn SpeechPort>) {
    let items = vec![
        StudyItem::plain("1", "hablar", "to speak"),
        StudyItem::plain("2", "comer", "to eat"),
    ];
    let (handle, _events) = SessionController::spawn(
        items,
        PlaybackSettings::default(),
        Arc::clone(&speech),
        EngineConfig::default(),
    )
    .unwrap();
    (handle, speech)
}

async fn run(handle: &SessionHandle, speech: &Arc<dyn SpeechPort>, line: &str) -> ControlFlow<()> {
    let command: ReplCommand = line.parse().unwrap();
    execute(handle, speech.as_ref(), command).await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn settings_commands_reach_the_session() {
    let (handle, speech) = silent_session();

    run(&handle, &speech, "delay 15").await;
    run(&handle, &speech, "loop single").await;
    run(&handle, &speech, "volume 3").await;

    let settings = handle.state().settings;
    assert_eq!(settings.pause_duration_seconds, 15);
    assert_eq!(settings.loop_mode, LoopMode::Single);
    assert!((settings.volume - 1.0).abs() < f32::EPSILON);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn transport_commands_move_through_the_deck() {
    let (handle, speech) = silent_session();

    run(&handle, &speech, "skip back").await;
    let state = handle.state();
    assert_eq!(state.phase, Phase::Back);
    assert!(state.is_playing);

    run(&handle, &speech, "pause").await;
    run(&handle, &speech, "next").await;
    let state = handle.state();
    assert_eq!(state.current_index, 1);
    assert!(!state.is_playing);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn informational_commands_continue_and_quit_breaks() {
    let (handle, speech) = silent_session();

    assert!(run(&handle, &speech, "status").await.is_continue());
    assert!(run(&handle, &speech, "voices").await.is_continue());
    assert!(run(&handle, &speech, "help").await.is_continue());
    assert!(run(&handle, &speech, "quit").await.is_break());
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn voices_refresh_reloads_the_catalog() {
    let mut speech = MockSpeech::new();
    speech.expect_is_available().return_const(false);
    speech.expect_stop().return_const(());
    speech.expect_list_voices().times(1).returning(Vec::new);
    speech.expect_refresh_voices().times(1).returning(|| {
        vec![Voice {
            id: "fr-1".into(),
            display_name: "Chloe".into(),
            locale: "fr-FR".into(),
        }]
    });
    let (handle, speech) = session_over(Arc::new(speech));

    assert!(run(&handle, &speech, "voices").await.is_continue());
    assert!(run(&handle, &speech, "voices refresh").await.is_continue());
    handle.shutdown().await;
}

#[test]
fn engine_config_file_overrides_defaults() {
    use std::io::Write;

    assert_eq!(load_engine_config(None).unwrap(), EngineConfig::default());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{ "transition_delay_ms": 900 }"#).unwrap();
    let config = load_engine_config(Some(file.path())).unwrap();
    assert_eq!(config.transition_delay_ms, 900);
    assert_eq!(config.tick_interval_ms, EngineConfig::default().tick_interval_ms);

    let mut broken = tempfile::NamedTempFile::new().unwrap();
    broken.write_all(b"[").unwrap();
    assert!(load_engine_config(Some(broken.path())).is_err());
}
