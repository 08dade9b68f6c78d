//! Pure domain types for Listen Mode.

pub mod session;
pub mod settings;
pub mod study_item;

pub use session::{Phase, SessionState};
pub use settings::{
    DEFAULT_PAUSE_SECS, LoopMode, MAX_PAUSE_SECS, MAX_RATE, MIN_PAUSE_SECS, MIN_RATE,
    PlaybackSettings,
};
pub use study_item::{CardRecord, CardSide, CardTag, Side, StudyItem};
