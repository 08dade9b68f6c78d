//! Engine timing configuration.
//!
//! All durations are stored as milliseconds so the config reads naturally
//! as JSON; use the accessor methods for [`Duration`] values.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing knobs for a Listen-Mode session.
///
/// Deserialises with defaults for missing fields, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Silent gap between an item's back and the next item's front.
    pub transition_delay_ms: u64,

    /// Pause countdown tick.
    pub tick_interval_ms: u64,

    /// How long a speaking phase lasts when no speech engine is present.
    pub silent_phase_duration_ms: u64,

    /// A repeat of the same `next` or `previous` inside this window is ignored.
    pub nav_debounce_ms: u64,

    /// Speech adapter keepalive interval; 0 disables keepalive nudges.
    pub keepalive_interval_ms: u64,

    /// Bounded wait for the platform voice catalog.
    pub voice_load_timeout_ms: u64,

    /// Fixed shuffle seed for reproducible orderings.
    pub shuffle_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: 600,
            tick_interval_ms: 1_000,
            silent_phase_duration_ms: 2_000,
            nav_debounce_ms: 250,
            keepalive_interval_ms: 10_000,
            voice_load_timeout_ms: 1_000,
            shuffle_seed: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    /// Never zero; a zero tick would spin the countdown.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    #[must_use]
    pub const fn silent_phase_duration(&self) -> Duration {
        Duration::from_millis(self.silent_phase_duration_ms)
    }

    #[must_use]
    pub const fn nav_debounce(&self) -> Duration {
        Duration::from_millis(self.nav_debounce_ms)
    }

    #[must_use]
    pub const fn keepalive_interval(&self) -> Duration {
        Duration::from_millis(self.keepalive_interval_ms)
    }

    #[must_use]
    pub const fn voice_load_timeout(&self) -> Duration {
        Duration::from_millis(self.voice_load_timeout_ms)
    }
}
