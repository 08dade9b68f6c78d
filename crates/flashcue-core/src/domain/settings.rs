//! Playback settings for a Listen-Mode session.
//!
//! Settings are session-scoped and live in memory. Every setter clamps its
//! input to the valid range and returns the value actually stored, so callers
//! never need to validate before calling.

use serde::{Deserialize, Serialize};

use crate::ports::speech::VoiceOptions;

/// Shortest allowed pause between front and back (seconds).
pub const MIN_PAUSE_SECS: u32 = 5;

/// Longest allowed pause between front and back (seconds).
pub const MAX_PAUSE_SECS: u32 = 60;

/// Default pause between front and back (seconds).
pub const DEFAULT_PAUSE_SECS: u32 = 10;

/// Allowed speech rate / pitch multiplier range.
pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;

/// What happens after the last card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Stop after the last card.
    #[default]
    None,
    /// Start over from the first card.
    All,
    /// Repeat the last card indefinitely.
    Single,
}

impl LoopMode {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::All => "all",
            Self::Single => "single",
        }
    }
}

impl std::str::FromStr for LoopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "all" => Ok(Self::All),
            "single" | "one" => Ok(Self::Single),
            other => Err(format!("unknown loop mode: {other}")),
        }
    }
}

impl std::fmt::Display for LoopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User-adjustable playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackSettings {
    /// Selected voice; `None` means the platform default.
    pub voice_id: Option<String>,

    /// Countdown length of the pause phase (5–60 s).
    pub pause_duration_seconds: u32,

    /// Output volume (0.0–1.0).
    pub volume: f32,

    /// Speech rate multiplier (0.5–2.0).
    pub rate: f32,

    /// Speech pitch multiplier (0.5–2.0).
    pub pitch: f32,

    pub loop_mode: LoopMode,

    pub shuffled: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            voice_id: None,
            pause_duration_seconds: DEFAULT_PAUSE_SECS,
            volume: 1.0,
            rate: 1.0,
            pitch: 1.0,
            loop_mode: LoopMode::None,
            shuffled: false,
        }
    }
}

impl PlaybackSettings {
    /// Return a copy with every field forced into its valid range.
    ///
    /// Used when settings come from outside (CLI flags, deserialised JSON).
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.set_pause_duration(self.pause_duration_seconds);
        self.set_volume(self.volume);
        self.set_rate(self.rate);
        self.set_pitch(self.pitch);
        self
    }

    pub fn set_voice(&mut self, voice_id: Option<String>) {
        self.voice_id = voice_id.filter(|id| !id.trim().is_empty());
    }

    pub fn set_pause_duration(&mut self, seconds: u32) -> u32 {
        self.pause_duration_seconds = seconds.clamp(MIN_PAUSE_SECS, MAX_PAUSE_SECS);
        self.pause_duration_seconds
    }

    /// Non-finite input leaves the volume unchanged.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
        self.volume
    }

    pub fn set_rate(&mut self, rate: f32) -> f32 {
        if rate.is_finite() {
            self.rate = rate.clamp(MIN_RATE, MAX_RATE);
        }
        self.rate
    }

    pub fn set_pitch(&mut self, pitch: f32) -> f32 {
        if pitch.is_finite() {
            self.pitch = pitch.clamp(MIN_RATE, MAX_RATE);
        }
        self.pitch
    }

    pub const fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Options handed to the speech adapter for the next utterance.
    #[must_use]
    pub fn voice_options(&self) -> VoiceOptions {
        VoiceOptions {
            voice_id: self.voice_id.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}
