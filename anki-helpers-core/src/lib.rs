//! Core library for Anki Helpers, a small client for the AnkiConnect plugin.
//!
//! The primary entry point is [`AnkiConnect`], which sends actions to a running
//! Anki instance. Deck and flagged-note queries are methods on the client; the
//! [`generate`](core::generate) module turns flagged notes into example sentences
//! through an external text-generation service.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    config::{ConnectorConfig, GeneratorConfig, DEFAULT_HOST, DEFAULT_PORT, PROTOCOL_VERSION},
    connector::{AnkiConnect, HttpTransport, Transport},
    error::{AnkiError, Result},
    export::{format_notes_as_markdown, front_text, primary_text},
    generate::{
        build_prompt, generate_examples, ChatCompletionsGenerator, ExamplesReport, TextGenerator,
        INPUT_WORDS_FILE, RESULTS_FILE,
    },
    note::{CardId, CardInfo, CardRef, DeckName, FlaggedCard, NoteField, NoteId, NoteInfo},
    queries::{DUE_WINDOW_DAYS, FLAGGED_QUERY, RED_FLAG_QUERY},
    request::{ActionRequest, ActionResponse},
};

