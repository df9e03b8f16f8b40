//! Explicit configuration for the AnkiConnect client and the text generator.

use std::time::Duration;

/// Host AnkiConnect listens on unless told otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port AnkiConnect listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8765;

/// Protocol version sent in every request envelope.
pub const PROTOCOL_VERSION: u32 = 2;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_GENERATOR_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_GENERATOR_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 120;

/// Where and how to reach AnkiConnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub host: String,
    pub port: u16,
    /// Value of the `version` key in the request envelope.
    pub api_version: u32,
    /// Upper bound on a single round trip, connection included.
    pub timeout: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_version: PROTOCOL_VERSION,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConnectorConfig {
    /// Returns the endpoint URL, e.g. `http://127.0.0.1:8765`.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Settings for the OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GENERATOR_ENDPOINT.to_string(),
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_GENERATOR_TIMEOUT_SECS),
        }
    }
}
