//! Session sequencer: card ordering and next/previous resolution.
//!
//! The sequencer keeps the original item list untouched and plays through a
//! permutation of indices into it. Shuffling only rewrites that permutation,
//! so the original order is always recoverable.

use std::sync::Arc;

use flashcue_core::{LoopMode, StudyItem};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::SessionError;

/// Result of [`Sequencer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the following item.
    Moved,
    /// Was at the last item; wrapped to the first (`LoopMode::All`).
    Wrapped,
    /// Was at the last item; stays on it (`LoopMode::Single`).
    Repeated,
    /// Was at the last item with looping off. The index is unchanged.
    Completed,
}

impl Advance {
    /// Whether the current index changed.
    #[must_use]
    pub const fn moved(self) -> bool {
        matches!(self, Self::Moved | Self::Wrapped)
    }
}

#[derive(Debug)]
pub struct Sequencer {
    original: Arc<[StudyItem]>,
    /// Playback order as indices into `original`.
    order: Vec<usize>,
    /// `original` materialised in playback order.
    ordered: Arc<[StudyItem]>,
    current: usize,
    shuffled: bool,
    rng: StdRng,
}

impl Sequencer {
    /// Create a sequencer over `items` in their given order.
    ///
    /// `seed` fixes the shuffle order; `None` seeds from the OS.
    pub fn new(items: Vec<StudyItem>, seed: Option<u64>) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::EmptyItemList);
        }
        let original: Arc<[StudyItem]> = items.into();
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Ok(Self {
            order: (0..original.len()).collect(),
            ordered: Arc::clone(&original),
            original,
            current: 0,
            shuffled: false,
            rng,
        })
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Items in playback order.
    #[must_use]
    pub fn items(&self) -> Arc<[StudyItem]> {
        Arc::clone(&self.ordered)
    }

    /// Items in the order they were supplied.
    #[must_use]
    pub fn original(&self) -> &[StudyItem] {
        &self.original
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_item(&self) -> &StudyItem {
        &self.ordered[self.current]
    }

    #[must_use]
    pub const fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len()
    }

    /// True even at the last item when looping is on.
    #[must_use]
    pub fn can_advance(&self, loop_mode: LoopMode) -> bool {
        !self.is_last() || loop_mode != LoopMode::None
    }

    #[must_use]
    pub const fn can_retreat(&self) -> bool {
        self.current > 0
    }

    // ── Navigation ─────────────────────────────────────────────────

    pub fn advance(&mut self, loop_mode: LoopMode) -> Advance {
        if !self.is_last() {
            self.current += 1;
            return Advance::Moved;
        }
        match loop_mode {
            LoopMode::All => {
                self.current = 0;
                Advance::Wrapped
            }
            LoopMode::Single => Advance::Repeated,
            LoopMode::None => Advance::Completed,
        }
    }

    /// Step back one item. Returns `false` at the first item.
    pub const fn retreat(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Back to the first item of the current ordering.
    pub const fn reset(&mut self) {
        self.current = 0;
    }

    // ── Ordering ───────────────────────────────────────────────────

    /// New uniform permutation of the whole list; index back to 0.
    pub fn shuffle(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.current = 0;
        self.shuffled = true;
        self.rebuild();
        tracing::debug!(items = self.len(), "Shuffled items");
    }

    /// New uniform permutation of the whole list with the current item
    /// pinned at the current index.
    ///
    /// Every other position is reshuffled, so later cycles under
    /// `LoopMode::All` play in the new order too.
    pub fn shuffle_keeping_current(&mut self) {
        let pinned = self.order[self.current];
        self.order.shuffle(&mut self.rng);
        if let Some(at) = self.order.iter().position(|&i| i == pinned) {
            self.order.swap(at, self.current);
        }
        self.shuffled = true;
        self.rebuild();
        tracing::debug!(
            pinned_at = self.current,
            items = self.len(),
            "Shuffled items around the current one"
        );
    }

    /// Restore the original order.
    ///
    /// With `keep_current` the current item stays current and the index moves
    /// to its original position; otherwise the index resets to 0.
    pub fn unshuffle(&mut self, keep_current: bool) {
        let original_position = self.order[self.current];
        self.order = (0..self.original.len()).collect();
        self.current = if keep_current { original_position } else { 0 };
        self.shuffled = false;
        self.ordered = Arc::clone(&self.original);
    }

    fn rebuild(&mut self) {
        self.ordered = self
            .order
            .iter()
            .map(|&i| self.original[i].clone())
            .collect();
    }
}
