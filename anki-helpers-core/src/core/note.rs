//! Note and card records returned by AnkiConnect.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Deck name as reported by Anki.
pub type DeckName = String;

/// Note identifier assigned by Anki; stable for the life of the note.
pub type NoteId = i64;

/// Card identifier assigned by Anki.
pub type CardId = i64;

/// One field of a note. Only `value` is used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteField {
    pub value: String,
    #[serde(default)]
    pub order: i64,
}

/// A card reference inside a `notesInfo` record.
///
/// Plain AnkiConnect returns bare card ids; some builds return card objects
/// carrying scheduling data, which is where the due value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardRef {
    Id(CardId),
    Detailed {
        #[serde(rename = "cardId")]
        card_id: CardId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        due: Option<Value>,
    },
}

impl CardRef {
    pub fn card_id(&self) -> CardId {
        match self {
            Self::Id(id) => *id,
            Self::Detailed { card_id, .. } => *card_id,
        }
    }

    /// Numeric due value, if the card carries one.
    pub fn due(&self) -> Option<i64> {
        match self {
            Self::Id(_) => None,
            Self::Detailed { due, .. } => due
                .as_ref()
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))),
        }
    }
}

/// A note as returned by the `notesInfo` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub note_id: NoteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, NoteField>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cards: Vec<CardRef>,
}

impl NoteInfo {
    /// The field shown on the front of the card: the one with the lowest `order`.
    pub fn primary_field(&self) -> Option<(&str, &NoteField)> {
        lowest_order_field(&self.fields)
    }

    /// Due value of the note's primary (first) card.
    pub fn due(&self) -> Option<i64> {
        self.cards.first().and_then(CardRef::due)
    }
}

/// Field with the lowest `order`; ties go to the alphabetically first name.
pub fn lowest_order_field(fields: &BTreeMap<String, NoteField>) -> Option<(&str, &NoteField)> {
    fields
        .iter()
        .min_by(|(a_name, a), (b_name, b)| a.order.cmp(&b.order).then(a_name.cmp(b_name)))
        .map(|(name, field)| (name.as_str(), field))
}

/// A card as returned by the `cardsInfo` action. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    pub card_id: CardId,
    #[serde(rename = "note")]
    pub note_id: NoteId,
    #[serde(default)]
    pub deck_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub due: i64,
    #[serde(default)]
    pub interval: i64,
    #[serde(default)]
    pub queue: i64,
    #[serde(default)]
    pub fields: BTreeMap<String, NoteField>,
}

/// A flagged card joined with its note's fields and tags.
///
/// `card.interval` holds the value reported by `getIntervals`, which is
/// negative (seconds) for cards still in learning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedCard {
    #[serde(flatten)]
    pub card: CardInfo,
    #[serde(default)]
    pub note_fields: BTreeMap<String, NoteField>,
    #[serde(default)]
    pub note_tags: Vec<String>,
    /// Days until the note's next review, when it falls inside the due window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_in_days: Option<u32>,
}
