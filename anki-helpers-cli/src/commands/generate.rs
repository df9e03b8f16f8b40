use anki_helpers_core::{
    generate_examples, AnkiConnect, ChatCompletionsGenerator, GeneratorConfig, Transport,
};
use anyhow::Result;
use std::path::Path;

use crate::OutputFormat;

pub fn run<T: Transport>(
    anki: &AnkiConnect<T>,
    config: GeneratorConfig,
    limit: Option<i64>,
    output_dir: &Path,
    format: &OutputFormat,
) -> Result<()> {
    let generator = ChatCompletionsGenerator::new(config)?;
    let report = generate_examples(anki, &generator, limit, output_dir)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "wordCount": report.word_count,
                "inputPath": report.input_path,
                "resultsPath": report.results_path,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match (&report.input_path, &report.results_path) {
            (Some(input), Some(results)) => {
                println!("Sent {} words to the generator.", report.word_count);
                println!("Words:    {}", input.display());
                println!("Examples: {}", results.display());
            }
            _ => println!("No flagged notes to generate examples for."),
        },
    }
    Ok(())
}
