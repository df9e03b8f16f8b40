use anki_helpers_core::{AnkiConnect, Transport};
use anyhow::Result;

use crate::OutputFormat;

pub fn run<T: Transport>(anki: &AnkiConnect<T>, format: &OutputFormat) -> Result<()> {
    let version = anki.version()?;
    let url = anki.config().url();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "url": url, "version": version });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("AnkiConnect is reachable at {url} (protocol version {version})");
        }
    }
    Ok(())
}
