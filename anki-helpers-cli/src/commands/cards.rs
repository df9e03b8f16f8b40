use anki_helpers_core::{front_text, AnkiConnect, FlaggedCard, Transport};
use anyhow::Result;
use std::fmt::Write;

use crate::OutputFormat;

pub fn run<T: Transport>(
    anki: &AnkiConnect<T>,
    query: &str,
    due_buckets: bool,
    format: &OutputFormat,
) -> Result<()> {
    let cards = anki.flagged_cards(query, due_buckets)?;
    print!("{}", render(&cards, format)?);
    Ok(())
}

/// Learning intervals come back as negative seconds, review intervals as days.
fn interval_label(interval: i64) -> String {
    if interval < 0 {
        format!("{}m", interval.unsigned_abs() / 60)
    } else {
        format!("{interval}d")
    }
}

fn render(cards: &[FlaggedCard], format: &OutputFormat) -> Result<String> {
    if let OutputFormat::Json = format {
        return Ok(format!("{}\n", serde_json::to_string_pretty(cards)?));
    }

    if cards.is_empty() {
        return Ok("No flagged cards found.\n".to_string());
    }

    let id_width = cards
        .iter()
        .map(|c| c.card.card_id.to_string().len())
        .max()
        .unwrap_or(7)
        .max(7);
    let deck_width = cards
        .iter()
        .map(|c| c.card.deck_name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    writeln!(
        out,
        "{:<id_width$}  {:<deck_width$}  {:>6}  {:>6}  Front",
        "Card ID", "Deck", "Ivl", "Due in"
    )?;
    for card in cards {
        let due_in = card
            .due_in_days
            .map_or_else(|| "-".to_string(), |d| format!("{d}d"));
        let text = front_text(&card.note_fields).unwrap_or_else(|| "(empty)".to_string());
        let tags: Vec<String> = card.note_tags.iter().map(|t| format!("#{t}")).collect();
        let line = format!(
            "{:<id_width$}  {:<deck_width$}  {:>6}  {:>6}  {text}  {}",
            card.card.card_id,
            card.card.deck_name,
            interval_label(card.card.interval),
            due_in,
            tags.join(" ")
        );
        writeln!(out, "{}", line.trim_end())?;
    }
    writeln!(out, "\n{} flagged cards", cards.len())?;
    Ok(out)
}
