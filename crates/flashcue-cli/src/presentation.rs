//! Console rendering of session events and snapshots.
//!
//! Format-only: everything here turns a [`SessionEvent`] or [`SessionState`]
//! into text and never touches the session.

use std::fmt::Write as _;

use flashcue_core::{Phase, SessionEvent, SessionState, SpeechError, Voice};

/// One console line for `event`, or `None` when the event has nothing to show.
///
/// Card text is printed here only when no speech engine is present; otherwise
/// the narrator prints what it reads.
#[must_use]
pub fn render_event(event: &SessionEvent, state: &SessionState) -> Option<String> {
    match event {
        SessionEvent::PhaseEntered { phase, index } => {
            let item = state.items.get(*index)?;
            let position = format!("[{}/{}]", index + 1, state.items.len());
            let text = match phase {
                Phase::Front => item.front_text(),
                Phase::Back => item.back_text(),
                _ => return None,
            };
            if state.speech_available {
                Some(format!("{position} {phase}"))
            } else {
                Some(format!("{position} {phase}: {text}"))
            }
        }
        SessionEvent::Countdown { remaining } if *remaining > 0 => {
            Some(format!("  ... {remaining}"))
        }
        SessionEvent::PlayingChanged { is_playing } => Some(
            if *is_playing { "\u{25b6} playing" } else { "\u{23f8} paused" }.to_string(),
        ),
        SessionEvent::Completed => Some(format!(
            "\u{2714} Session complete ({} cards). Type 'play' to go again.",
            state.items.len()
        )),
        SessionEvent::Error { error } => {
            let hint = if error.is_retryable() {
                "Type 'play' to retry or 'clear' to dismiss."
            } else {
                "Type 'clear' to dismiss."
            };
            Some(format!("\u{26a0} {error}. {hint}"))
        }
        SessionEvent::SpeechUnavailable => {
            Some("Speech unavailable; cards advance on timers.".to_string())
        }
        SessionEvent::Countdown { .. } | SessionEvent::ItemChanged { .. } | SessionEvent::Closed => {
            None
        }
    }
}

/// Single status line for the `status` command.
#[must_use]
pub fn describe(state: &SessionState) -> String {
    let playback = if state.is_complete {
        "complete"
    } else if state.is_playing {
        "playing"
    } else {
        "paused"
    };

    let mut line = format!(
        "Card {}/{} | {} | {} | {:.0}% | pause {}s | loop {} | shuffle {}",
        state.current_index + 1,
        state.items.len(),
        state.phase,
        playback,
        state.progress(),
        state.settings.pause_duration_seconds,
        state.settings.loop_mode,
        if state.settings.shuffled { "on" } else { "off" },
    );
    if state.phase == Phase::Pause && state.pause_seconds_remaining > 0 {
        let _ = write!(line, " | {}s left", state.pause_seconds_remaining);
    }
    if !state.speech_available {
        line.push_str(" | silent");
    }
    if let Some(error) = &state.last_error {
        let _ = write!(line, "\n  last error: {error}");
    }
    line
}

/// Voice catalog listing for the `voices` command.
#[must_use]
pub fn format_voices(voices: &[Voice], selected: Option<&str>) -> String {
    if voices.is_empty() {
        return format!(
            "{}; the platform default voice is used.",
            SpeechError::NoVoicesAvailable
        );
    }
    voices
        .iter()
        .map(|voice| {
            let marker = if Some(voice.id.as_str()) == selected { '*' } else { ' ' };
            format!("{marker} {:<24} {:<8} {}", voice.id, voice.locale, voice.display_name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
