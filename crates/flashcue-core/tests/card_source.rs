//! Integration tests for the `CardSource` port and caller-side filtering.
//!
//! An in-memory card store stands in for the external persistence layer.

use std::collections::HashMap;

use async_trait::async_trait;
use flashcue_core::{CardFilter, CardRecord, CardSource, CardSourceError, CardTag};

struct InMemoryCards {
    decks: HashMap<String, Vec<CardRecord>>,
}

#[async_trait]
impl CardSource for InMemoryCards {
    async fn load_cards_for_deck(&self, deck_id: &str) -> Result<Vec<CardRecord>, CardSourceError> {
        self.decks
            .get(deck_id)
            .cloned()
            .ok_or_else(|| CardSourceError::DeckNotFound(deck_id.to_string()))
    }
}

fn card(id: &str, front: &str, back: &str, tag: Option<&str>) -> CardRecord {
    CardRecord {
        id: id.to_string(),
        deck_id: "spanish".to_string(),
        front: front.to_string(),
        front_type: "text".to_string(),
        front_language: None,
        back: back.to_string(),
        back_type: "text".to_string(),
        back_language: None,
        notes: Some("not narrated".to_string()),
        tags: tag
            .map(|name| CardTag {
                id: format!("t-{name}"),
                name: name.to_string(),
            })
            .into_iter()
            .collect(),
    }
}

fn store() -> InMemoryCards {
    let mut decks = HashMap::new();
    decks.insert(
        "spanish".to_string(),
        vec![
            card("1", "perro", "dog", Some("animals")),
            card("2", "gato", "cat", Some("animals")),
            card("3", "casa", "house", None),
        ],
    );
    InMemoryCards { decks }
}

#[tokio::test]
async fn loaded_cards_become_items_in_deck_order() {
    let records = store().load_cards_for_deck("spanish").await.unwrap();
    let items = CardFilter::default().apply(&records);

    let fronts: Vec<&str> = items.iter().map(|i| i.front_text()).collect();
    assert_eq!(fronts, ["perro", "gato", "casa"]);
}

#[tokio::test]
async fn tag_filter_narrows_items_before_session_start() {
    let records = store().load_cards_for_deck("spanish").await.unwrap();
    let filter = CardFilter {
        text: None,
        tag: Some("animals".to_string()),
    };
    let items = filter.apply(&records);

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].back_text(), "cat");
}

#[tokio::test]
async fn unknown_deck_is_reported() {
    let err = store().load_cards_for_deck("french").await.unwrap_err();
    assert!(
        matches!(err, CardSourceError::DeckNotFound(ref id) if id == "french"),
        "expected DeckNotFound, got {err:?}"
    );
}
