//! Study items: immutable playback snapshots of flashcards.
//!
//! A [`StudyItem`] is built once per session from a [`CardRecord`] returned by
//! the card store and never mutated afterwards. The "is code" flag and the
//! code language only affect how a side is rendered; playback speaks the text
//! either way.

use serde::{Deserialize, Serialize};

// ── Card store records ─────────────────────────────────────────────

/// Content type label the card store uses for code sides.
pub const CODE_CONTENT_TYPE: &str = "code";

/// A tag attached to a card in the card store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTag {
    pub id: String,
    pub name: String,
}

/// Card as returned by the external card store.
///
/// Wire shape of `loadCardsForDeck`. Only `id`, `front` and `back` are
/// required; everything else falls back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: String,
    #[serde(default)]
    pub deck_id: String,
    pub front: String,
    #[serde(default = "default_content_type")]
    pub front_type: String,
    #[serde(default)]
    pub front_language: Option<String>,
    pub back: String,
    #[serde(default = "default_content_type")]
    pub back_type: String,
    #[serde(default)]
    pub back_language: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<CardTag>,
}

fn default_content_type() -> String {
    "text".to_string()
}

impl CardRecord {
    /// Whether the card carries a tag with exactly this name.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }
}

// ── Study item ─────────────────────────────────────────────────────

/// Which face of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardSide {
    Front,
    Back,
}

/// One face of a study item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Side {
    text: String,
    is_code: bool,
    language: Option<String>,
}

impl Side {
    /// A plain-text side.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_code: false,
            language: None,
        }
    }

    /// A code side, optionally tagged with its language for highlighting.
    pub fn code(text: impl Into<String>, language: Option<String>) -> Self {
        Self {
            text: text.into(),
            is_code: true,
            language,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_code(&self) -> bool {
        self.is_code
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Whether there is nothing to narrate on this side.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn from_parts(text: String, content_type: &str, language: Option<String>) -> Self {
        if content_type.eq_ignore_ascii_case(CODE_CONTENT_TYPE) {
            Self::code(text, language)
        } else {
            Self::text(text)
        }
    }
}

/// Immutable snapshot of one flashcard for playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyItem {
    id: String,
    front: Side,
    back: Side,
}

impl StudyItem {
    pub fn new(id: impl Into<String>, front: Side, back: Side) -> Self {
        Self {
            id: id.into(),
            front,
            back,
        }
    }

    /// Shorthand for a plain-text card.
    pub fn plain(
        id: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self::new(id, Side::text(front), Side::text(back))
    }

    /// Snapshot a card store record. Notes and tags are not played.
    #[must_use]
    pub fn from_record(record: &CardRecord) -> Self {
        Self {
            id: record.id.clone(),
            front: Side::from_parts(
                record.front.clone(),
                &record.front_type,
                record.front_language.clone(),
            ),
            back: Side::from_parts(
                record.back.clone(),
                &record.back_type,
                record.back_language.clone(),
            ),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn front(&self) -> &Side {
        &self.front
    }

    #[must_use]
    pub const fn back(&self) -> &Side {
        &self.back
    }

    #[must_use]
    pub const fn side(&self, side: CardSide) -> &Side {
        match side {
            CardSide::Front => &self.front,
            CardSide::Back => &self.back,
        }
    }

    #[must_use]
    pub fn front_text(&self) -> &str {
        self.front.content()
    }

    #[must_use]
    pub fn back_text(&self) -> &str {
        self.back.content()
    }
}

impl From<&CardRecord> for StudyItem {
    fn from(record: &CardRecord) -> Self {
        Self::from_record(record)
    }
}
