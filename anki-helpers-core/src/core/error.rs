//! Error types for the Anki Helpers core library.

use thiserror::Error;

/// All errors that can occur within the Anki Helpers core library.
#[derive(Debug, Error)]
pub enum AnkiError {
    /// AnkiConnect could not be reached, or the request timed out.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The response did not follow the `{result, error}` envelope, or the
    /// result did not have the shape the action promises.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// AnkiConnect answered with a non-null `error` field.
    #[error("AnkiConnect error: {0}")]
    RemoteAction(String),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The text-generation service failed or returned an unusable reply.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Writing generated files failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A request body could not be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`AnkiError`].
pub type Result<T> = std::result::Result<T, AnkiError>;

impl AnkiError {
    /// Builds the [`AnkiError::Connection`] variant for an unreachable endpoint.
    pub(crate) fn unreachable(url: &str, detail: impl std::fmt::Display) -> Self {
        Self::Connection(format!(
            "could not reach AnkiConnect at {url} ({detail}). \
             Is Anki running with the AnkiConnect plugin installed?"
        ))
    }

    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Connection(msg) => msg.clone(),
            Self::MalformedResponse(msg) => format!("Unexpected response from AnkiConnect: {msg}"),
            Self::RemoteAction(msg) => format!("AnkiConnect reported an error: {msg}"),
            Self::Validation(msg) => msg.clone(),
            Self::Generation(msg) => format!("Example generation failed: {msg}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
