//! Card source port: where Listen Mode gets its cards.
//!
//! The card store itself (decks, tags, persistence) lives outside this
//! workspace. Pre-filtering by text or tag is the caller's job and happens
//! before items reach the session engine; the engine never filters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CardRecord, StudyItem};

/// Errors returned by [`CardSource`] implementations.
#[derive(Debug, Error)]
pub enum CardSourceError {
    /// No deck with the requested identifier.
    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    /// Storage backend error (file, database, network).
    #[error("Card storage error: {0}")]
    Storage(String),
}

/// Port trait for loading the cards of a deck, in deck order.
#[async_trait]
pub trait CardSource: Send + Sync {
    async fn load_cards_for_deck(&self, deck_id: &str) -> Result<Vec<CardRecord>, CardSourceError>;
}

/// Caller-side pre-filter applied before a session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    /// Case-insensitive substring matched against front and back.
    pub text: Option<String>,
    /// Exact tag name.
    pub tag: Option<String>,
}

impl CardFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.tag.is_none()
    }

    #[must_use]
    pub fn matches(&self, record: &CardRecord) -> bool {
        if let Some(tag) = &self.tag {
            if !record.has_tag(tag) {
                return false;
            }
        }
        match &self.text {
            Some(needle) => {
                let needle = needle.to_lowercase();
                record.front.to_lowercase().contains(&needle)
                    || record.back.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Filter `records` (keeping deck order) and snapshot them as study items.
    #[must_use]
    pub fn apply(&self, records: &[CardRecord]) -> Vec<StudyItem> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .map(StudyItem::from_record)
            .collect()
    }
}
