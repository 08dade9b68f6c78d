//! Listen-Mode session snapshot types.
//!
//! [`SessionState`] is owned by the session controller; the UI only ever sees
//! cloned snapshots of it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::settings::PlaybackSettings;
use super::study_item::StudyItem;
use crate::ports::speech::SpeechError;

// ── Phase ──────────────────────────────────────────────────────────

/// Playback stage of the current card.
///
/// ```text
///   Idle → Front → Pause → Back → Transition → (next card) Front …
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing started yet (or the session was restarted / completed).
    #[default]
    Idle,

    /// Narrating the front text.
    Front,

    /// Counting down before the answer.
    Pause,

    /// Narrating the back text.
    Back,

    /// Silent gap while the card flips to the next one.
    Transition,
}

impl Phase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Front => "front",
            Self::Pause => "pause",
            Self::Back => "back",
            Self::Transition => "transition",
        }
    }

    /// Phases that `skipToPhase` may target.
    #[must_use]
    pub const fn is_skip_target(self) -> bool {
        matches!(self, Self::Front | Self::Pause | Self::Back)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "front" => Ok(Self::Front),
            "pause" => Ok(Self::Pause),
            "back" => Ok(Self::Back),
            "transition" => Ok(Self::Transition),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

// ── Session state ──────────────────────────────────────────────────

/// Read-only snapshot of a Listen-Mode session.
// The bools are independent UI flags (playing, complete, speech present,
// navigation enabled); grouping them would only obscure the snapshot.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Items in playback order (shuffled if shuffle is on).
    pub items: Arc<[StudyItem]>,

    pub current_index: usize,

    pub phase: Phase,

    pub is_playing: bool,

    /// Seconds left in the pause countdown (0 outside the pause phase).
    pub pause_seconds_remaining: u32,

    pub is_complete: bool,

    /// Last speech failure; playback is paused while this is set.
    pub last_error: Option<SpeechError>,

    /// Whether a speech engine is present. When `false` phases advance on
    /// fixed timers instead of speech completion.
    pub speech_available: bool,

    pub can_go_next: bool,

    pub can_go_previous: bool,

    pub settings: PlaybackSettings,
}

impl SessionState {
    /// Item at `current_index`.
    #[must_use]
    pub fn current_item(&self) -> Option<&StudyItem> {
        self.items.get(self.current_index)
    }

    /// Completion percentage, 0–100.
    ///
    /// `current_index / items.len()`; only reaches 100 once the session is
    /// complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.is_complete {
            return 100.0;
        }
        if self.items.is_empty() {
            return 0.0;
        }
        (self.current_index as f64 / self.items.len() as f64 * 100.0).min(100.0)
    }
}
