//! Phase state machine for the current card.
//!
//! ```text
//!   Idle → Front → Pause → Back → Transition → (next card) Front …
//!                                   │
//!                                   └→ Complete (last item, loop off)
//! ```
//!
//! The machine is pure: it records the phase and the pause countdown and
//! tells the controller which side effect to run. Awaiting speech and timers
//! is the controller's job.

use flashcue_core::{CardSide, Phase};

/// Side effect to run on entering a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEffect {
    /// Narrate one side of the current item.
    Speak(CardSide),
    /// Start the pause countdown at this many seconds.
    Countdown(u32),
    /// Wait out the fixed transition delay.
    Delay,
    /// Nothing to run.
    None,
}

/// What follows once the current phase's wait is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    /// Enter the given phase on the same item.
    Enter(Phase),
    /// Move the sequencer on and start the next item's front.
    AdvanceItem,
    /// The session is over.
    Complete,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PhaseMachine {
    phase: Phase,
    remaining: u32,
}

impl PhaseMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            remaining: 0,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the pause countdown.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Enter `phase` from the start and return its side effect.
    pub const fn enter(&mut self, phase: Phase, pause_secs: u32) -> PhaseEffect {
        self.phase = phase;
        self.remaining = 0;
        match phase {
            Phase::Idle => PhaseEffect::None,
            Phase::Front => PhaseEffect::Speak(CardSide::Front),
            Phase::Pause => {
                self.remaining = pause_secs;
                PhaseEffect::Countdown(pause_secs)
            }
            Phase::Back => PhaseEffect::Speak(CardSide::Back),
            Phase::Transition => PhaseEffect::Delay,
        }
    }

    /// Record `phase` without running its side effect (paused navigation).
    pub const fn suspend_in(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining = 0;
    }

    /// One countdown tick. Returns the seconds left; the countdown is over at 0.
    pub const fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// The current phase's wait finished.
    ///
    /// `at_end` is true when the current item is the last one and looping is
    /// off: the back of that item ends the session without a transition.
    #[must_use]
    pub const fn step(&self, at_end: bool) -> PhaseStep {
        match self.phase {
            Phase::Idle => PhaseStep::Enter(Phase::Front),
            Phase::Front => PhaseStep::Enter(Phase::Pause),
            Phase::Pause => PhaseStep::Enter(Phase::Back),
            Phase::Back if at_end => PhaseStep::Complete,
            Phase::Back => PhaseStep::Enter(Phase::Transition),
            Phase::Transition => PhaseStep::AdvanceItem,
        }
    }

    pub const fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.remaining = 0;
    }
}
