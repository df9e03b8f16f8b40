use anki_helpers_core::{primary_text, AnkiConnect, NoteInfo, Transport};
use anyhow::Result;
use std::fmt::Write;

use crate::OutputFormat;

pub fn run<T: Transport>(
    anki: &AnkiConnect<T>,
    limit: Option<i64>,
    format: &OutputFormat,
) -> Result<()> {
    let notes = anki.list_flagged(limit)?;
    print!("{}", render(&notes, format)?);
    Ok(())
}

fn render(notes: &[NoteInfo], format: &OutputFormat) -> Result<String> {
    if let OutputFormat::Json = format {
        return Ok(format!("{}\n", serde_json::to_string_pretty(notes)?));
    }

    if notes.is_empty() {
        return Ok("No flagged notes found.\n".to_string());
    }

    let id_width = notes
        .iter()
        .map(|n| n.note_id.to_string().len())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut out = String::new();
    writeln!(out, "{:<id_width$}  {:>6}  Front", "Note ID", "Due")?;
    let rule = |width: usize| "\u{2500}".repeat(width);
    writeln!(out, "{}  {}  {}", rule(id_width), rule(6), rule(5))?;
    for note in notes {
        let due = note.due().map_or_else(|| "-".to_string(), |d| d.to_string());
        let text = primary_text(note).unwrap_or_else(|| "(empty)".to_string());
        let tags: Vec<String> = note.tags.iter().map(|t| format!("#{t}")).collect();
        let line = format!("{:<id_width$}  {:>6}  {text}  {}", note.note_id, due, tags.join(" "));
        writeln!(out, "{}", line.trim_end())?;
    }
    writeln!(out, "\n{} flagged notes", notes.len())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, front: &str, due: Option<i64>) -> NoteInfo {
        let cards = match due {
            Some(d) => serde_json::json!([{"cardId": id, "due": d}]),
            None => serde_json::json!([]),
        };
        serde_json::from_value(serde_json::json!({
            "noteId": id,
            "tags": ["marked"],
            "fields": {"Front": {"value": front, "order": 0}},
            "cards": cards
        }))
        .unwrap()
    }

    #[test]
    fn test_plain_lists_each_note() {
        let notes = vec![note(1502298033753, "kissa", Some(20)), note(2, "<b>koira</b>", None)];
        let out = render(&notes, &OutputFormat::Plain).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Note ID"));
        assert!(lines[2].starts_with("1502298033753"));
        assert!(lines[2].contains("20  kissa  #marked"));
        assert!(lines[3].contains("-  koira"));
        assert!(out.ends_with("2 flagged notes\n"));
    }

    #[test]
    fn test_plain_empty() {
        assert_eq!(render(&[], &OutputFormat::Plain).unwrap(), "No flagged notes found.\n");
    }

    #[test]
    fn test_json_round_trips_ids() {
        let notes = vec![note(7, "talo", Some(1))];
        let out = render(&notes, &OutputFormat::Json).unwrap();
        let parsed: Vec<NoteInfo> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, notes);
    }
}
