//! JSON deck library: the command-line stand-in for the card store.
//!
//! ```json
//! {
//!   "decks": [
//!     {
//!       "id": "spanish",
//!       "name": "Spanish verbs",
//!       "shuffleCards": false,
//!       "cards": [{ "id": "1", "front": "hablar", "back": "to speak" }]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use flashcue_core::{CardRecord, CardSource, CardSourceError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub decks: Vec<Deck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Deck-level shuffle preference.
    #[serde(default)]
    pub shuffle_cards: bool,
    #[serde(default)]
    pub cards: Vec<CardRecord>,
}

/// [`CardSource`] over a library loaded into memory.
#[derive(Debug, Clone)]
pub struct JsonDeckSource {
    library: Library,
}

impl JsonDeckSource {
    #[must_use]
    pub const fn new(library: Library) -> Self {
        Self { library }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let library: Library = serde_json::from_str(json).context("Invalid deck library JSON")?;
        Ok(Self::new(library))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deck library {}", path.display()))?;
        let source = Self::from_json(&json)
            .with_context(|| format!("Failed to load deck library {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            decks = source.library.decks.len(),
            "Deck library loaded"
        );
        Ok(source)
    }

    #[must_use]
    pub fn deck(&self, id: &str) -> Option<&Deck> {
        self.library.decks.iter().find(|deck| deck.id == id)
    }

    #[must_use]
    pub fn deck_ids(&self) -> Vec<&str> {
        self.library.decks.iter().map(|deck| deck.id.as_str()).collect()
    }
}

#[async_trait]
impl CardSource for JsonDeckSource {
    async fn load_cards_for_deck(&self, deck_id: &str) -> Result<Vec<CardRecord>, CardSourceError> {
        let deck = self
            .deck(deck_id)
            .ok_or_else(|| CardSourceError::DeckNotFound(deck_id.to_string()))?;

        Ok(deck
            .cards
            .iter()
            .cloned()
            .map(|mut card| {
                if card.deck_id.is_empty() {
                    card.deck_id.clone_from(&deck.id);
                }
                card
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const LIBRARY: &str = r#"{
        "decks": [
            {
                "id": "rust",
                "name": "Rust basics",
                "shuffleCards": true,
                "cards": [
                    { "id": "r1", "front": "Ownership", "back": "One owner at a time",
                      "tags": [{ "id": "t1", "name": "memory" }] },
                    { "id": "r2", "front": "let x = 5;", "frontType": "code",
                      "frontLanguage": "rust", "back": "Immutable binding" }
                ]
            },
            { "id": "empty", "name": "Nothing yet" }
        ]
    }"#;

    #[test]
    fn parses_decks_and_card_records() {
        let source = JsonDeckSource::from_json(LIBRARY).unwrap();
        assert_eq!(source.deck_ids(), vec!["rust", "empty"]);

        let deck = source.deck("rust").unwrap();
        assert!(deck.shuffle_cards);
        assert_eq!(deck.cards[1].front_type, "code");
        assert_eq!(deck.cards[0].front_type, "text");
        assert!(source.deck("empty").unwrap().cards.is_empty());
    }

    #[test]
    fn loads_cards_in_deck_order_with_deck_id() {
        let source = JsonDeckSource::from_json(LIBRARY).unwrap();
        let cards = tokio_test::block_on(source.load_cards_for_deck("rust")).unwrap();

        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert!(cards.iter().all(|c| c.deck_id == "rust"));
    }

    #[test]
    fn unknown_deck_is_reported() {
        let source = JsonDeckSource::from_json(LIBRARY).unwrap();
        let err = tokio_test::block_on(source.load_cards_for_deck("french")).unwrap_err();
        assert!(matches!(err, CardSourceError::DeckNotFound(id) if id == "french"));
    }

    #[test]
    fn reads_library_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LIBRARY.as_bytes()).unwrap();

        let source = JsonDeckSource::from_path(file.path()).unwrap();
        assert!(source.deck("rust").is_some());
    }

    #[test]
    fn broken_json_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = JsonDeckSource::from_path(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load deck library"));
    }
}
