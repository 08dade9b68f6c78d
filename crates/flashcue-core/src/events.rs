//! Events emitted by a Listen-Mode session to the UI layer.
//!
//! The state snapshot tells the UI *what is*; these events tell it *what just
//! happened*, in order, so it can animate card flips and countdowns without
//! diffing snapshots.

use serde::Serialize;

use crate::domain::Phase;
use crate::ports::speech::SpeechError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// A phase was entered (or re-entered) for the item at `index`.
    PhaseEntered { phase: Phase, index: usize },

    /// Pause countdown value changed.
    Countdown { remaining: u32 },

    /// The current item changed through navigation or automatic advance.
    ItemChanged { index: usize },

    /// Playback started or stopped.
    PlayingChanged { is_playing: bool },

    /// The last item finished with looping off.
    Completed,

    /// A speech failure was captured; playback is paused.
    Error { error: SpeechError },

    /// No speech engine; phases run on fixed timers.
    SpeechUnavailable,

    /// The session was torn down and released the speech engine.
    Closed,
}

impl SessionEvent {
    /// Short label for logs and console output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PhaseEntered { .. } => "phase_entered",
            Self::Countdown { .. } => "countdown",
            Self::ItemChanged { .. } => "item_changed",
            Self::PlayingChanged { .. } => "playing_changed",
            Self::Completed => "completed",
            Self::Error { .. } => "error",
            Self::SpeechUnavailable => "speech_unavailable",
            Self::Closed => "closed",
        }
    }
}
