use anki_helpers_core::{AnkiConnect, Transport};
use anyhow::Result;

use crate::OutputFormat;

pub fn run<T: Transport>(anki: &AnkiConnect<T>, format: &OutputFormat) -> Result<()> {
    let decks = anki.list_decks()?;
    print!("{}", render(&decks, format)?);
    Ok(())
}

fn render(decks: &[String], format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(decks)?),
        OutputFormat::Plain => decks.iter().map(|deck| format!("{deck}\n")).collect(),
    })
}
