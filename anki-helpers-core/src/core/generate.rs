//! Example-sentence generation for flagged notes.
//!
//! Flagged notes are rendered with [`format_notes_as_markdown`], wrapped in a
//! fixed prompt, and sent once to a [`TextGenerator`]. Once the generator has
//! answered, the word list and the reply are written to the output directory.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    format_notes_as_markdown, AnkiConnect, AnkiError, GeneratorConfig, Result, Transport,
};

/// File receiving the markdown word list sent to the generator.
pub const INPUT_WORDS_FILE: &str = "input-words.md";

/// File receiving the generator's reply, verbatim.
pub const RESULTS_FILE: &str = "results.md";

/// Wraps a markdown word list in the example-sentence prompt.
pub fn build_prompt(words_markdown: &str) -> String {
    format!(
        "I'm learning finnish language on level A2.
Please generate 5 example sentences for each words provided below with translation to english.
- one simple and short sentence (near 7 words)
- one medium (7-12 words) length sentence on theme of AI
- one medium (7-12 words) length sentence on theme of well-being
- one medium (7-12 words) length sentence on theme of ecology and responsible consumption
- one medium (7-12 words) length sentence on theme of cycling as a hobby in finland
Words:
{words_markdown}"
    )
}

/// Turns a prompt into text. One call, one request; no retries.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Pulls the first choice's text out of a chat completions response body.
fn extract_reply(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AnkiError::Generation(format!("unexpected response: {e}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AnkiError::Generation("response contained no text".to_string()))
}

/// [`TextGenerator`] for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Clone)]
pub struct ChatCompletionsGenerator {
    config: GeneratorConfig,
    api_key: String,
    client: Client,
}

impl ChatCompletionsGenerator {
    /// # Errors
    ///
    /// Returns [`AnkiError::Validation`] if no API key is configured, and
    /// [`AnkiError::Generation`] if the HTTP client cannot be built.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AnkiError::Validation(
                    "no API key configured for example generation (set OPENAI_API_KEY)".to_string(),
                )
            })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnkiError::Generation(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

impl TextGenerator for ChatCompletionsGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        log::debug!(
            "requesting examples from {} ({})",
            self.config.endpoint,
            self.config.model
        );
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| AnkiError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| AnkiError::Generation(format!("failed to read response: {e}")))?;
        if !status.is_success() {
            return Err(AnkiError::Generation(format!("HTTP {status}: {}", body.trim())));
        }
        extract_reply(&body)
    }
}

/// What [`generate_examples`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamplesReport {
    /// Number of words sent to the generator.
    pub word_count: usize,
    pub input_path: Option<PathBuf>,
    pub results_path: Option<PathBuf>,
}

/// Generates example sentences for flagged notes and writes them to `out_dir`.
///
/// When no flagged note has displayable text, nothing is written and the
/// generator is not called. A generator failure leaves `out_dir` untouched.
///
/// # Errors
///
/// Any error from [`AnkiConnect::list_flagged`] or the generator, or
/// [`AnkiError::Io`] if the output files cannot be written.
pub fn generate_examples<T, G>(
    anki: &AnkiConnect<T>,
    generator: &G,
    limit: Option<i64>,
    out_dir: &Path,
) -> Result<ExamplesReport>
where
    T: Transport,
    G: TextGenerator + ?Sized,
{
    let notes = anki.list_flagged(limit)?;
    let words = format_notes_as_markdown(&notes);
    let word_count = words.lines().count();
    if word_count == 0 {
        log::info!("no flagged notes with text; nothing to generate");
        return Ok(ExamplesReport {
            word_count: 0,
            input_path: None,
            results_path: None,
        });
    }

    // Nothing touches the output directory until the generator has answered.
    let reply = generator.generate(&build_prompt(&words))?;

    fs::create_dir_all(out_dir)?;
    let input_path = out_dir.join(INPUT_WORDS_FILE);
    fs::write(&input_path, &words)?;
    log::info!("wrote {word_count} words to {}", input_path.display());

    let results_path = out_dir.join(RESULTS_FILE);
    fs::write(&results_path, &reply)?;
    log::info!("wrote examples to {}", results_path.display());

    Ok(ExamplesReport {
        word_count,
        input_path: Some(input_path),
        results_path: Some(results_path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connector::test_support::{client, ScriptedTransport};
    use serde_json::json;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct FakeGenerator {
        reply: Result<String>,
        prompts: RefCell<Vec<String>>,
    }

    impl FakeGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for FakeGenerator {
        fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(AnkiError::Generation(e.to_string())),
            }
        }
    }

    fn flagged(words: &[(i64, &str, i64)]) -> ScriptedTransport {
        let ids: Vec<i64> = words.iter().map(|(id, _, _)| *id).collect();
        let infos: Vec<serde_json::Value> = words
            .iter()
            .map(|(id, word, due)| {
                json!({
                    "noteId": id,
                    "fields": {"Front": {"value": word, "order": 0}},
                    "cards": [{"cardId": id * 10, "due": due}]
                })
            })
            .collect();
        ScriptedTransport::new().reply(json!(ids)).reply(json!(infos))
    }

    #[test]
    fn test_build_prompt_contains_words() {
        let prompt = build_prompt("- kissa\n");
        assert!(prompt.contains("A2"));
        assert!(prompt.ends_with("Words:\n- kissa\n"));
    }

    #[test]
    fn test_generate_examples_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let anki = client(flagged(&[(1, "kissa", 3), (2, "koira", 9)]));
        let generator = FakeGenerator::replying("Kissa nukkuu.");

        let report = generate_examples(&anki, &generator, None, dir.path()).unwrap();

        assert_eq!(report.word_count, 2);
        let input = fs::read_to_string(dir.path().join(INPUT_WORDS_FILE)).unwrap();
        assert_eq!(input, "- koira\n- kissa\n");
        let results = fs::read_to_string(dir.path().join(RESULTS_FILE)).unwrap();
        assert_eq!(results, "Kissa nukkuu.");

        let prompts = generator.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- koira\n- kissa\n"));
    }

    #[test]
    fn test_generate_examples_respects_limit() {
        let dir = TempDir::new().unwrap();
        let anki = client(flagged(&[(1, "kissa", 3), (2, "koira", 9), (3, "talo", 1)]));
        let generator = FakeGenerator::replying("ok");

        let report = generate_examples(&anki, &generator, Some(1), dir.path()).unwrap();
        assert_eq!(report.word_count, 1);
        let input = fs::read_to_string(dir.path().join(INPUT_WORDS_FILE)).unwrap();
        assert_eq!(input, "- koira\n");
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested").join("out");
        let anki = client(flagged(&[(1, "kissa", 3)]));

        let report = generate_examples(&anki, &FakeGenerator::replying("ok"), None, &out).unwrap();
        assert_eq!(report.results_path, Some(out.join(RESULTS_FILE)));
        assert!(out.join(INPUT_WORDS_FILE).exists());
    }

    #[test]
    fn test_no_flagged_notes_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let anki = client(ScriptedTransport::new().reply(json!([])));
        let generator = FakeGenerator::replying("unused");

        let report = generate_examples(&anki, &generator, None, dir.path()).unwrap();
        assert_eq!(report.word_count, 0);
        assert!(report.input_path.is_none());
        assert!(generator.prompts.borrow().is_empty());
        assert!(!dir.path().join(INPUT_WORDS_FILE).exists());
    }

    #[test]
    fn test_generator_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let anki = client(flagged(&[(1, "kissa", 3)]));
        let generator = FakeGenerator {
            reply: Err(AnkiError::Generation("quota exceeded".to_string())),
            prompts: RefCell::new(Vec::new()),
        };

        let out = dir.path().join("out");

        let err = generate_examples(&anki, &generator, None, &out).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(generator.prompts.borrow().len(), 1);
        assert!(!out.join(INPUT_WORDS_FILE).exists());
        assert!(!out.join(RESULTS_FILE).exists());
        assert!(!out.exists());
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        let dir = TempDir::new().unwrap();
        let anki = client(ScriptedTransport::new());
        let err = generate_examples(&anki, &FakeGenerator::replying("x"), Some(-2), dir.path())
            .unwrap_err();
        assert!(matches!(err, AnkiError::Validation(_)));
    }

    #[test]
    fn test_missing_api_key_is_validation_error() {
        assert!(matches!(
            ChatCompletionsGenerator::new(GeneratorConfig::default()),
            Err(AnkiError::Validation(_))
        ));

        let blank = GeneratorConfig {
            api_key: Some("  ".to_string()),
            ..GeneratorConfig::default()
        };
        assert!(ChatCompletionsGenerator::new(blank).is_err());
    }

    #[test]
    fn test_extract_reply() {
        let body = r#"{"id": "x", "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "Hei!"}}
        ]}"#;
        assert_eq!(extract_reply(body).unwrap(), "Hei!");
    }

    #[test]
    fn test_extract_reply_without_choices() {
        let err = extract_reply(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, AnkiError::Generation(_)));
        let err = extract_reply("not json").unwrap_err();
        assert!(matches!(err, AnkiError::Generation(_)));
    }
}
