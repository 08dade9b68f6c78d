//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use flashcue_core::{CardFilter, LoopMode, PlaybackSettings};

/// Hands-free audio study of a flashcard deck.
///
/// Cards are read aloud front first, then after a countdown the back.
/// Type commands (`help` for the list) while the session runs.
#[derive(Debug, Parser)]
#[command(name = "flashcue")]
#[command(about = "Listen Mode for flashcard decks")]
#[command(version)]
pub struct Cli {
    /// Deck library (JSON file with a `decks` array)
    #[arg(long, short = 'l', env = "FLASHCUE_LIBRARY")]
    pub library: PathBuf,

    /// Deck to study
    #[arg(long, short = 'd', env = "FLASHCUE_DECK")]
    pub deck: String,

    /// Only cards whose front or back contains this text
    #[arg(long)]
    pub text: Option<String>,

    /// Only cards with this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Seconds between front and back (5-60)
    #[arg(long, short = 'p', env = "FLASHCUE_PAUSE")]
    pub pause: Option<u32>,

    /// Volume (0.0-1.0)
    #[arg(long, env = "FLASHCUE_VOLUME")]
    pub volume: Option<f32>,

    /// Speech rate multiplier (0.5-2.0)
    #[arg(long, env = "FLASHCUE_RATE")]
    pub rate: Option<f32>,

    /// Speech pitch multiplier (0.5-2.0)
    #[arg(long)]
    pub pitch: Option<f32>,

    /// Voice identifier
    #[arg(long, env = "FLASHCUE_VOICE")]
    pub voice: Option<String>,

    /// What happens after the last card: none, all, single
    #[arg(long = "loop", value_name = "MODE", env = "FLASHCUE_LOOP")]
    pub loop_mode: Option<LoopMode>,

    /// Shuffle the cards (defaults to the deck's own setting)
    #[arg(long, conflicts_with = "no_shuffle")]
    pub shuffle: bool,

    /// Keep deck order even if the deck asks for shuffling
    #[arg(long)]
    pub no_shuffle: bool,

    /// Engine timing overrides (JSON)
    #[arg(long, value_name = "PATH")]
    pub engine_config: Option<PathBuf>,

    /// Start playing immediately
    #[arg(long, short = 'a')]
    pub autoplay: bool,

    /// Run without speech; phases advance on timers
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn filter(&self) -> CardFilter {
        CardFilter {
            text: self.text.clone().filter(|t| !t.trim().is_empty()),
            tag: self.tag.clone().filter(|t| !t.trim().is_empty()),
        }
    }

    /// Settings from flags, falling back to the deck's shuffle preference.
    #[must_use]
    pub fn playback_settings(&self, deck_shuffles: bool) -> PlaybackSettings {
        let mut settings = PlaybackSettings::default();
        settings.set_voice(self.voice.clone());
        if let Some(pause) = self.pause {
            settings.set_pause_duration(pause);
        }
        if let Some(volume) = self.volume {
            settings.set_volume(volume);
        }
        if let Some(rate) = self.rate {
            settings.set_rate(rate);
        }
        if let Some(pitch) = self.pitch {
            settings.set_pitch(pitch);
        }
        if let Some(mode) = self.loop_mode {
            settings.set_loop_mode(mode);
        }
        settings.shuffled = if self.shuffle {
            true
        } else if self.no_shuffle {
            false
        } else {
            deck_shuffles
        };
        settings
    }
}
