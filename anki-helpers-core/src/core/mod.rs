//! Internal domain modules for the Anki Helpers core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod config;
pub mod connector;
pub mod error;
pub mod export;
pub mod generate;
pub mod note;
pub mod queries;
pub mod request;

#[doc(inline)]
pub use config::{ConnectorConfig, GeneratorConfig};
#[doc(inline)]
pub use connector::{AnkiConnect, HttpTransport, Transport};
#[doc(inline)]
pub use error::{AnkiError, Result};
#[doc(inline)]
pub use export::format_notes_as_markdown;
#[doc(inline)]
pub use generate::{generate_examples, ChatCompletionsGenerator, ExamplesReport, TextGenerator};
#[doc(inline)]
pub use note::{CardInfo, CardRef, FlaggedCard, NoteField, NoteInfo};
#[doc(inline)]
pub use request::{ActionRequest, ActionResponse};
