//! Session controller: the sole owner and mutation point of `SessionState`.
//!
//! The controller runs as a single task. UI intents arrive over a command
//! channel and are applied one at a time; between intents the task awaits
//! the one live wait of the current phase (an utterance, a countdown tick or
//! the transition delay).
//!
//! ```text
//!   SessionHandle ──Intent──▶ SessionController task ──speak/stop──▶ SpeechPort
//!        ▲                        │
//!        └──── watch<SessionState> ┴──── mpsc<SessionEvent> ──▶ UI
//! ```
//!
//! # Cancellation
//!
//! At most one live wait exists. Every navigation intent first calls
//! [`SpeechPort::stop`] and drops the live wait before doing anything else,
//! so two utterances or two countdowns can never coexist. Settings intents
//! leave the live wait alone and take effect on the next phase.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use flashcue_core::{
    CardSide, LoopMode, Phase, PlaybackSettings, SessionEvent, SessionState, SpeechError,
    SpeechPort, StudyItem,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

use crate::config::EngineConfig;
use crate::error::SessionError;
use crate::phase::{PhaseEffect, PhaseMachine, PhaseStep};
use crate::sequencer::{Advance, Sequencer};

// ── Intents ────────────────────────────────────────────────────────

/// A UI request applied by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Play,
    Pause,
    Next,
    Previous,
    /// Re-enter the current item at `front`, `pause` or `back`.
    SkipTo(Phase),
    Restart,
    SetVoice(Option<String>),
    SetPauseDuration(u32),
    SetVolume(f32),
    SetRate(f32),
    SetPitch(f32),
    SetLoopMode(LoopMode),
    ToggleShuffle,
    ClearError,
    /// Tear the session down and start over with a new item list.
    ReplaceItems(Vec<StudyItem>),
}

impl Intent {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::SkipTo(_) => "skip_to_phase",
            Self::Restart => "restart",
            Self::SetVoice(_) => "set_voice",
            Self::SetPauseDuration(_) => "set_pause_duration",
            Self::SetVolume(_) => "set_volume",
            Self::SetRate(_) => "set_rate",
            Self::SetPitch(_) => "set_pitch",
            Self::SetLoopMode(_) => "set_loop_mode",
            Self::ToggleShuffle => "toggle_shuffle",
            Self::ClearError => "clear_error",
            Self::ReplaceItems(_) => "replace_items",
        }
    }
}

type Reply = oneshot::Sender<Result<SessionState, SessionError>>;

#[derive(Debug)]
enum Command {
    Intent { intent: Intent, reply: Reply },
    Shutdown { done: oneshot::Sender<()> },
}

// ── Live wait ──────────────────────────────────────────────────────

/// Why the live wait resolved.
#[derive(Debug)]
enum Wake {
    Spoken(Result<(), SpeechError>),
    /// A speaking phase ran out its fixed duration without speech.
    Silent,
    Tick,
    Delay,
}

type LiveWait = Pin<Box<dyn Future<Output = Wake> + Send>>;

enum Step {
    Command(Option<Command>),
    Wake(Wake),
}

fn sleep_then(duration: Duration, wake: Wake) -> LiveWait {
    Box::pin(async move {
        tokio::time::sleep(duration).await;
        wake
    })
}

async fn wait_live(live: &mut Option<LiveWait>) -> Wake {
    match live {
        Some(wait) => wait.as_mut().await,
        None => std::future::pending().await,
    }
}

// ── Controller ─────────────────────────────────────────────────────

pub struct SessionController {
    sequencer: Sequencer,
    machine: PhaseMachine,
    settings: PlaybackSettings,
    is_playing: bool,
    is_complete: bool,
    last_error: Option<SpeechError>,
    speech_available: bool,

    speech: Arc<dyn SpeechPort>,
    config: EngineConfig,
    live: Option<LiveWait>,
    /// Time and direction (`true` = forward) of the last accepted navigation.
    last_nav: Option<(Instant, bool)>,
    closed: bool,

    event_tx: mpsc::UnboundedSender<SessionEvent>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionController {
    /// Start a session task over `items`.
    ///
    /// Items are permuted once up front when `settings.shuffled` is set.
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        items: Vec<StudyItem>,
        settings: PlaybackSettings,
        speech: Arc<dyn SpeechPort>,
        config: EngineConfig,
    ) -> Result<(SessionHandle, mpsc::UnboundedReceiver<SessionEvent>), SessionError> {
        let (controller, event_rx) = Self::new(items, settings, speech, config)?;
        let (commands, command_rx) = mpsc::unbounded_channel();
        let state = controller.state_tx.subscribe();

        tokio::spawn(controller.run(command_rx));

        Ok((SessionHandle { commands, state }, event_rx))
    }

    fn new(
        items: Vec<StudyItem>,
        settings: PlaybackSettings,
        speech: Arc<dyn SpeechPort>,
        config: EngineConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), SessionError> {
        let settings = settings.normalized();
        let mut sequencer = Sequencer::new(items, config.shuffle_seed)?;
        if settings.shuffled {
            sequencer.shuffle();
        }
        let speech_available = speech.is_available();

        let initial = SessionState {
            items: sequencer.items(),
            current_index: sequencer.current_index(),
            phase: Phase::Idle,
            is_playing: false,
            pause_seconds_remaining: 0,
            is_complete: false,
            last_error: None,
            speech_available,
            can_go_next: sequencer.can_advance(settings.loop_mode),
            can_go_previous: sequencer.can_retreat(),
            settings: settings.clone(),
        };
        let (state_tx, _) = watch::channel(initial);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let controller = Self {
            sequencer,
            machine: PhaseMachine::new(),
            settings,
            is_playing: false,
            is_complete: false,
            last_error: None,
            speech_available,
            speech,
            config,
            live: None,
            last_nav: None,
            closed: false,
            event_tx,
            state_tx,
        };

        if !speech_available {
            tracing::warn!("Speech unavailable - phases will advance on timers");
            controller.emit(SessionEvent::SpeechUnavailable);
        }

        Ok((controller, event_rx))
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        tracing::info!(
            items = self.sequencer.len(),
            shuffled = self.sequencer.is_shuffled(),
            loop_mode = %self.settings.loop_mode,
            "Listen-Mode session started"
        );

        loop {
            let step = tokio::select! {
                biased;
                command = commands.recv() => Step::Command(command),
                wake = wait_live(&mut self.live) => Step::Wake(wake),
            };

            match step {
                Step::Command(Some(Command::Intent { intent, reply })) => {
                    let result = self.handle(intent);
                    let _ = reply.send(result);
                }
                Step::Command(Some(Command::Shutdown { done })) => {
                    self.teardown();
                    let _ = done.send(());
                    return;
                }
                Step::Command(None) => break,
                Step::Wake(wake) => {
                    self.live = None;
                    self.on_wake(wake);
                    self.publish();
                }
            }
        }

        self.teardown();
    }

    // ── Intent handling ────────────────────────────────────────────

    fn handle(&mut self, intent: Intent) -> Result<SessionState, SessionError> {
        tracing::debug!(intent = intent.label(), "Applying intent");

        match intent {
            Intent::Play => self.play(),
            Intent::Pause => self.pause(),
            Intent::Next => self.navigate(true),
            Intent::Previous => self.navigate(false),
            Intent::SkipTo(phase) => self.skip_to(phase),
            Intent::Restart => self.restart(),
            Intent::SetVoice(voice_id) => self.settings.set_voice(voice_id),
            Intent::SetPauseDuration(seconds) => {
                // The running countdown keeps its length; the next one uses the new value.
                self.settings.set_pause_duration(seconds);
            }
            Intent::SetVolume(volume) => self.set_volume(volume),
            Intent::SetRate(rate) => {
                self.settings.set_rate(rate);
            }
            Intent::SetPitch(pitch) => {
                self.settings.set_pitch(pitch);
            }
            Intent::SetLoopMode(mode) => self.settings.set_loop_mode(mode),
            Intent::ToggleShuffle => self.toggle_shuffle(),
            Intent::ClearError => self.last_error = None,
            Intent::ReplaceItems(items) => self.replace_items(items)?,
        }

        Ok(self.publish())
    }

    fn play(&mut self) {
        if self.is_playing {
            return;
        }
        self.last_error = None;
        if self.is_complete {
            self.rewind();
        }

        let phase = match self.machine.phase() {
            Phase::Idle => Phase::Front,
            phase => phase,
        };
        self.set_playing(true);
        self.enter(phase);
    }

    /// Idempotent; the phase label is kept so `play` re-enters it.
    fn pause(&mut self) {
        if !self.is_playing {
            return;
        }
        self.cancel_live();
        self.set_playing(false);
    }

    fn navigate(&mut self, forward: bool) {
        let allowed = if forward {
            self.sequencer.can_advance(self.settings.loop_mode)
        } else {
            self.sequencer.can_retreat()
        };
        if !allowed {
            tracing::debug!(forward, index = self.sequencer.current_index(), "Navigation at boundary ignored");
            return;
        }

        let now = Instant::now();
        if let Some((last, last_forward)) = self.last_nav {
            if last_forward == forward && now.duration_since(last) < self.config.nav_debounce() {
                tracing::debug!(forward, "Repeated navigation ignored");
                return;
            }
        }
        self.last_nav = Some((now, forward));

        self.cancel_live();
        let moved = if forward {
            self.sequencer.advance(self.settings.loop_mode).moved()
        } else {
            self.sequencer.retreat()
        };
        self.is_complete = false;
        if moved {
            self.emit_item_changed();
        }

        if self.is_playing {
            self.enter(Phase::Front);
        } else if self.machine.phase() != Phase::Idle {
            // Paused: land on the new item's front; narration starts on play.
            self.machine.suspend_in(Phase::Front);
        }
    }

    fn skip_to(&mut self, phase: Phase) {
        if !phase.is_skip_target() {
            tracing::debug!(phase = %phase, "Not a skip target");
            return;
        }
        self.cancel_live();
        self.is_complete = false;
        self.last_error = None;
        self.set_playing(true);
        self.enter(phase);
    }

    fn restart(&mut self) {
        self.cancel_live();
        self.rewind();
        self.set_playing(false);
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = self.settings.set_volume(volume);
        let speaking = self.live.is_some() && matches!(self.machine.phase(), Phase::Front | Phase::Back);
        if speaking && self.speech.apply_live_volume(volume) {
            tracing::debug!(volume, "Volume applied to the current utterance");
        }
    }

    /// Mid-session, the current item never moves: shuffling on permutes the
    /// whole list around it (effective from the next advance), and shuffling
    /// off restores the original order around it. With no session in
    /// progress the whole order changes and playback starts over at item 0.
    fn toggle_shuffle(&mut self) {
        let in_progress = self.in_progress();
        let before = self.current_key();

        if self.sequencer.is_shuffled() {
            self.sequencer.unshuffle(in_progress);
        } else if in_progress {
            self.sequencer.shuffle_keeping_current();
        } else {
            self.sequencer.shuffle();
        }
        self.settings.shuffled = self.sequencer.is_shuffled();

        if !in_progress {
            self.is_complete = false;
            self.machine.reset();
        }
        if self.current_key() != before {
            self.emit_item_changed();
        }
        tracing::debug!(
            shuffled = self.settings.shuffled,
            in_progress,
            index = self.sequencer.current_index(),
            "Shuffle toggled"
        );
    }

    fn replace_items(&mut self, items: Vec<StudyItem>) -> Result<(), SessionError> {
        let mut sequencer = Sequencer::new(items, self.config.shuffle_seed)?;
        if self.settings.shuffled {
            sequencer.shuffle();
        }

        self.cancel_live();
        self.sequencer = sequencer;
        self.machine.reset();
        self.is_complete = false;
        self.last_error = None;
        self.last_nav = None;
        self.set_playing(false);
        self.emit_item_changed();

        tracing::info!(items = self.sequencer.len(), "Session items replaced");
        Ok(())
    }

    // ── Phase driving ──────────────────────────────────────────────

    fn enter(&mut self, phase: Phase) {
        let old = self.machine.phase();
        let effect = self
            .machine
            .enter(phase, self.settings.pause_duration_seconds);
        let index = self.sequencer.current_index();
        tracing::debug!(old = ?old, new = ?phase, index, "Phase transition");
        self.emit(SessionEvent::PhaseEntered { phase, index });

        match effect {
            PhaseEffect::Speak(side) => self.start_speaking(side),
            PhaseEffect::Countdown(0) => self.phase_done(),
            PhaseEffect::Countdown(remaining) => {
                self.emit(SessionEvent::Countdown { remaining });
                self.live = Some(sleep_then(self.config.tick_interval(), Wake::Tick));
            }
            PhaseEffect::Delay => {
                self.live = Some(sleep_then(self.config.transition_delay(), Wake::Delay));
            }
            PhaseEffect::None => {}
        }
    }

    fn start_speaking(&mut self, side: CardSide) {
        let content = self.sequencer.current_item().side(side);
        if content.is_blank() {
            tracing::debug!(side = ?side, "Blank side - skipping narration");
            self.phase_done();
            return;
        }

        if !self.speech_available {
            self.live = Some(sleep_then(self.config.silent_phase_duration(), Wake::Silent));
            return;
        }

        let speech = Arc::clone(&self.speech);
        let text = content.content().to_owned();
        let is_code = content.is_code();
        let options = self.settings.voice_options();
        self.live = Some(Box::pin(async move {
            let result = if is_code {
                speech.speak_code(&text, &options).await
            } else {
                speech.speak(&text, &options).await
            };
            Wake::Spoken(result)
        }));
    }

    fn on_wake(&mut self, wake: Wake) {
        match wake {
            Wake::Spoken(Ok(())) | Wake::Silent | Wake::Delay => self.phase_done(),
            Wake::Tick => {
                let remaining = self.machine.tick();
                self.emit(SessionEvent::Countdown { remaining });
                if remaining == 0 {
                    self.phase_done();
                } else {
                    self.live = Some(sleep_then(self.config.tick_interval(), Wake::Tick));
                }
            }
            Wake::Spoken(Err(SpeechError::Unavailable)) => {
                tracing::warn!("Speech engine went away - continuing on timers");
                self.speech_available = false;
                self.emit(SessionEvent::SpeechUnavailable);
                let phase = self.machine.phase();
                self.enter(phase);
            }
            Wake::Spoken(Err(error)) => {
                tracing::warn!(
                    error = %error,
                    phase = %self.machine.phase(),
                    index = self.sequencer.current_index(),
                    "Speech failed - pausing playback"
                );
                self.last_error = Some(error.clone());
                self.set_playing(false);
                self.emit(SessionEvent::Error { error });
            }
        }
    }

    /// The live wait of the current phase finished normally.
    fn phase_done(&mut self) {
        let at_end = self.sequencer.is_last() && self.settings.loop_mode == LoopMode::None;
        match self.machine.step(at_end) {
            PhaseStep::Enter(phase) => self.enter(phase),
            PhaseStep::AdvanceItem => match self.sequencer.advance(self.settings.loop_mode) {
                Advance::Completed => self.complete(),
                outcome => {
                    if outcome.moved() {
                        self.emit_item_changed();
                    }
                    self.enter(Phase::Front);
                }
            },
            PhaseStep::Complete => self.complete(),
        }
    }

    fn complete(&mut self) {
        if self.is_complete {
            return;
        }
        self.machine.reset();
        self.is_complete = true;
        self.set_playing(false);
        self.emit(SessionEvent::Completed);
        tracing::info!(items = self.sequencer.len(), "Listen-Mode session complete");
    }

    // ── Helpers ────────────────────────────────────────────────────

    /// Universal cancellation: stop speech, drop the live wait.
    fn cancel_live(&mut self) {
        self.speech.stop();
        self.live = None;
    }

    /// First item, idle, not complete.
    fn rewind(&mut self) {
        let before = self.sequencer.current_index();
        self.sequencer.reset();
        self.machine.reset();
        self.is_complete = false;
        if before != 0 {
            self.emit_item_changed();
        }
    }

    fn in_progress(&self) -> bool {
        self.machine.phase() != Phase::Idle && !self.is_complete
    }

    fn current_key(&self) -> (usize, String) {
        (
            self.sequencer.current_index(),
            self.sequencer.current_item().id().to_owned(),
        )
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.is_playing != is_playing {
            self.is_playing = is_playing;
            self.emit(SessionEvent::PlayingChanged { is_playing });
        }
    }

    fn emit_item_changed(&self) {
        self.emit(SessionEvent::ItemChanged {
            index: self.sequencer.current_index(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Session event receiver dropped");
        }
    }

    fn snapshot(&self) -> SessionState {
        SessionState {
            items: self.sequencer.items(),
            current_index: self.sequencer.current_index(),
            phase: self.machine.phase(),
            is_playing: self.is_playing,
            pause_seconds_remaining: self.machine.remaining(),
            is_complete: self.is_complete,
            last_error: self.last_error.clone(),
            speech_available: self.speech_available,
            can_go_next: self.sequencer.can_advance(self.settings.loop_mode),
            can_go_previous: self.sequencer.can_retreat(),
            settings: self.settings.clone(),
        }
    }

    fn publish(&self) -> SessionState {
        let snapshot = self.snapshot();
        self.state_tx.send_replace(snapshot.clone());
        snapshot
    }

    /// Release the speech engine and clear every timer.
    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.cancel_live();
        self.set_playing(false);
        self.closed = true;
        self.publish();
        self.emit(SessionEvent::Closed);
        tracing::info!("Listen-Mode session closed");
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if !self.closed {
            self.speech.stop();
        }
    }
}

// ── Handle ─────────────────────────────────────────────────────────

/// Cloneable front door to a running session.
///
/// Every intent resolves with the state snapshot right after it was applied.
/// The session ends when [`shutdown`](Self::shutdown) is called or the last
/// handle is dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub async fn send(&self, intent: Intent) -> Result<SessionState, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Intent { intent, reply })
            .map_err(|_| SessionError::ControllerGone)?;
        response.await.map_err(|_| SessionError::ControllerGone)?
    }

    pub async fn play(&self) -> Result<SessionState, SessionError> {
        self.send(Intent::Play).await
    }

    pub async fn pause(&self) -> Result<SessionState, SessionError> {
        self.send(Intent::Pause).await
    }

    pub async fn next(&self) -> Result<SessionState, SessionError> {
        self.send(Intent::Next).await
    }

    pub async fn previous(&self) -> Result<SessionState, SessionError> {
        self.send(Intent::Previous).await
    }

    pub async fn skip_to_phase(&self, phase: Phase) -> Result<SessionState, SessionError> {
        self.send(Intent::SkipTo(phase)).await
    }

    pub async fn restart(&self) -> Result<SessionState, SessionError> {
        self.send(Intent::Restart).await
    }

    pub async fn set_voice(&self, voice_id: Option<String>) -> Result<SessionState, SessionError> {
        self.send(Intent::SetVoice(voice_id)).await
    }

    /// Clamped to 5–60 seconds.
    pub async fn set_pause_duration(&self, seconds: u32) -> Result<SessionState, SessionError> {
        self.send(Intent::SetPauseDuration(seconds)).await
    }

    /// Clamped to 0–1; applied to the current utterance when the engine can.
    pub async fn set_volume(&self, volume: f32) -> Result<SessionState, SessionError> {
        self.send(Intent::SetVolume(volume)).await
    }

    pub async fn set_rate(&self, rate: f32) -> Result<SessionState, SessionError> {
        self.send(Intent::SetRate(rate)).await
    }

    pub async fn set_pitch(&self, pitch: f32) -> Result<SessionState, SessionError> {
        self.send(Intent::SetPitch(pitch)).await
    }

    pub async fn set_loop_mode(&self, mode: LoopMode) -> Result<SessionState, SessionError> {
        self.send(Intent::SetLoopMode(mode)).await
    }

    pub async fn toggle_shuffle(&self) -> Result<SessionState, SessionError> {
        self.send(Intent::ToggleShuffle).await
    }

    pub async fn clear_error(&self) -> Result<SessionState, SessionError> {
        self.send(Intent::ClearError).await
    }

    pub async fn replace_items(&self, items: Vec<StudyItem>) -> Result<SessionState, SessionError> {
        self.send(Intent::ReplaceItems(items)).await
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Whether the controller task has ended.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Stop speech, clear timers and end the controller task.
    ///
    /// Resolves once teardown is done. Safe to call more than once.
    pub async fn shutdown(&self) {
        let (done, finished) = oneshot::channel();
        if self.commands.send(Command::Shutdown { done }).is_ok() {
            let _ = finished.await;
        }
    }
}
