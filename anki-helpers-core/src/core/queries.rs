//! Read-only queries built on [`AnkiConnect::invoke`].

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::{
    AnkiConnect, AnkiError, CardId, CardInfo, DeckName, FlaggedCard, NoteId, NoteInfo, Result,
    Transport,
};

/// Search used to find flagged notes.
pub const FLAGGED_QUERY: &str = "tag:marked";

/// Search used by [`AnkiConnect::flagged_cards`] when none is given: red-flagged cards.
pub const RED_FLAG_QUERY: &str = "flag:1";

/// Last day (inclusive) probed when bucketing flagged notes by due date.
pub const DUE_WINDOW_DAYS: u32 = 14;

/// Decodes an action's result into `D`, reporting shape mismatches as malformed.
fn decode<D: DeserializeOwned>(action: &str, result: Value) -> Result<D> {
    serde_json::from_value(result)
        .map_err(|e| AnkiError::MalformedResponse(format!("unexpected `{action}` result: {e}")))
}

impl<T: Transport> AnkiConnect<T> {
    /// Lists all deck names in the order Anki returns them.
    ///
    /// # Errors
    ///
    /// Any [`invoke`](Self::invoke) error, or [`AnkiError::MalformedResponse`]
    /// if the result is not an array of strings.
    pub fn list_decks(&self) -> Result<Vec<DeckName>> {
        decode("deckNames", self.invoke("deckNames", json!({}))?)
    }

    /// Runs a note search and returns the matching ids.
    pub fn find_notes(&self, query: &str) -> Result<Vec<NoteId>> {
        decode("findNotes", self.invoke("findNotes", json!({ "query": query }))?)
    }

    /// Resolves note ids into full records, in the order of `ids`.
    ///
    /// Ids that Anki can no longer resolve (deleted since the search) are
    /// skipped with a warning. An empty `ids` slice sends no request.
    ///
    /// # Errors
    ///
    /// Any [`invoke`](Self::invoke) error, or [`AnkiError::MalformedResponse`]
    /// if the result is not an array of note records.
    pub fn notes_info(&self, ids: &[NoteId]) -> Result<Vec<NoteInfo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<Value> =
            decode("notesInfo", self.invoke("notesInfo", json!({ "notes": ids }))?)?;

        let mut by_id: HashMap<NoteId, NoteInfo> = HashMap::with_capacity(entries.len());
        for entry in entries {
            // AnkiConnect answers `{}` for ids it cannot find.
            let resolved = match &entry {
                Value::Object(map) => map.contains_key("noteId"),
                other => {
                    return Err(AnkiError::MalformedResponse(format!(
                        "unexpected `notesInfo` entry: {other}"
                    )))
                }
            };
            if !resolved {
                continue;
            }
            let note: NoteInfo = decode("notesInfo", entry)?;
            by_id.entry(note.note_id).or_insert(note);
        }

        let mut notes = Vec::with_capacity(ids.len());
        for id in ids {
            match by_id.remove(id) {
                Some(note) => notes.push(note),
                None => log::warn!("note {id} could not be resolved by notesInfo; skipping"),
            }
        }
        Ok(notes)
    }

    /// Lists flagged notes, most distant due date first.
    ///
    /// Notes without due metadata sort last; equal due values keep the order
    /// of the search. A positive `limit` truncates the list; `0` or `None`
    /// returns everything.
    ///
    /// # Errors
    ///
    /// [`AnkiError::Validation`] for a negative `limit` (nothing is sent),
    /// otherwise any error from [`find_notes`](Self::find_notes) or
    /// [`notes_info`](Self::notes_info).
    pub fn list_flagged(&self, limit: Option<i64>) -> Result<Vec<NoteInfo>> {
        if let Some(n) = limit.filter(|n| *n < 0) {
            return Err(AnkiError::Validation(format!(
                "limit must not be negative (got {n})"
            )));
        }

        let ids = self.find_notes(FLAGGED_QUERY)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut notes = self.notes_info(&ids)?;
        // `None` orders below every `Some`, so reversing the comparison puts
        // undated notes at the end. `sort_by` is stable.
        notes.sort_by(|a, b| b.due().cmp(&a.due()));

        if let Some(n) = limit.filter(|n| *n > 0) {
            notes.truncate(usize::try_from(n).unwrap_or(usize::MAX));
        }
        Ok(notes)
    }

    /// Runs a card search and returns the matching card ids.
    pub fn find_cards(&self, query: &str) -> Result<Vec<CardId>> {
        decode("findCards", self.invoke("findCards", json!({ "query": query }))?)
    }

    /// Fetches scheduling details for `cards`. An empty slice sends no request.
    pub fn cards_info(&self, cards: &[CardId]) -> Result<Vec<CardInfo>> {
        if cards.is_empty() {
            return Ok(Vec::new());
        }
        decode("cardsInfo", self.invoke("cardsInfo", json!({ "cards": cards }))?)
    }

    /// Returns the current interval of each card, paired with its id.
    ///
    /// # Errors
    ///
    /// [`AnkiError::MalformedResponse`] if Anki returns a different number of
    /// intervals than cards were asked for.
    pub fn intervals(&self, cards: &[CardId]) -> Result<Vec<(CardId, i64)>> {
        if cards.is_empty() {
            return Ok(Vec::new());
        }
        let intervals: Vec<i64> =
            decode("getIntervals", self.invoke("getIntervals", json!({ "cards": cards }))?)?;
        if intervals.len() != cards.len() {
            return Err(AnkiError::MalformedResponse(format!(
                "getIntervals returned {} values for {} cards",
                intervals.len(),
                cards.len()
            )));
        }
        Ok(cards.iter().copied().zip(intervals).collect())
    }

    /// Cards of the notes matching `query`, joined with note fields, tags and
    /// the current interval of each card.
    ///
    /// With `due_buckets`, notes are also searched with `prop:due=0` through
    /// `prop:due=14`; each card records the day its note matched and the list
    /// is ordered soonest first (stable, unbucketed cards last). Without it,
    /// cards keep the order of `cardsInfo`.
    ///
    /// # Errors
    ///
    /// Any error from the underlying actions. Nothing is partially returned.
    pub fn flagged_cards(&self, query: &str, due_buckets: bool) -> Result<Vec<FlaggedCard>> {
        let note_ids = self.find_notes(query)?;
        if note_ids.is_empty() {
            return Ok(Vec::new());
        }

        let nids: Vec<String> = note_ids.iter().map(NoteId::to_string).collect();
        let card_ids = self.find_cards(&format!("nid:{}", nids.join(",")))?;
        if card_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cards = self.cards_info(&card_ids)?;
        let intervals: HashMap<CardId, i64> = self.intervals(&card_ids)?.into_iter().collect();
        let notes: HashMap<NoteId, NoteInfo> = self
            .notes_info(&note_ids)?
            .into_iter()
            .map(|note| (note.note_id, note))
            .collect();

        let mut due_in: HashMap<NoteId, u32> = HashMap::new();
        if due_buckets {
            for days in 0..=DUE_WINDOW_DAYS {
                for id in self.find_notes(&format!("{query} prop:due={days}"))? {
                    due_in.entry(id).or_insert(days);
                }
            }
        }

        let mut joined: Vec<FlaggedCard> = cards
            .into_iter()
            .map(|mut card| {
                if let Some(interval) = intervals.get(&card.card_id) {
                    card.interval = *interval;
                }
                let (note_fields, note_tags) = match notes.get(&card.note_id) {
                    Some(note) => (note.fields.clone(), note.tags.clone()),
                    None => {
                        log::warn!(
                            "card {} belongs to unresolved note {}",
                            card.card_id,
                            card.note_id
                        );
                        Default::default()
                    }
                };
                FlaggedCard {
                    due_in_days: due_in.get(&card.note_id).copied(),
                    card,
                    note_fields,
                    note_tags,
                }
            })
            .collect();

        if due_buckets {
            joined.sort_by_key(|c| c.due_in_days.unwrap_or(u32::MAX));
        }
        Ok(joined)
    }

    /// Asks the plugin for its protocol version; useful as a reachability probe.
    pub fn version(&self) -> Result<u32> {
        decode("version", self.invoke("version", json!({}))?)
    }
}
