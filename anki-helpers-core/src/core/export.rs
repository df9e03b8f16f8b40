//! Plain-text rendering of note content.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::core::note::lowest_order_field;
use crate::{NoteField, NoteInfo};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|<[^>]*>").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strips markup from a field value and collapses whitespace.
fn clean_field(value: &str) -> String {
    let text = TAG_RE.replace_all(value, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    SPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Cleaned text of the lowest-order field in `fields`, if any.
pub fn front_text(fields: &BTreeMap<String, NoteField>) -> Option<String> {
    let (_, field) = lowest_order_field(fields)?;
    let text = clean_field(&field.value);
    (!text.is_empty()).then_some(text)
}

/// Cleaned text of a note's primary field, or `None` if it has nothing to show.
pub fn primary_text(note: &NoteInfo) -> Option<String> {
    front_text(&note.fields)
}

/// Renders one markdown list item per note, using each note's primary field.
///
/// Notes without displayable text are left out. The output is deterministic
/// and ends with a newline unless it is empty.
pub fn format_notes_as_markdown(notes: &[NoteInfo]) -> String {
    notes
        .iter()
        .filter_map(primary_text)
        .map(|text| format!("- {text}\n"))
        .collect()
}
