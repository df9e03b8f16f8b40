//! Settings persistence and resolution for the Anki Helpers CLI.
//!
//! Settings live in a JSON file at an OS-appropriate location. Values are
//! resolved with the precedence: command-line flags, environment, settings
//! file, built-in defaults.

use anki_helpers_core::{ConnectorConfig, GeneratorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persisted CLI settings. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Host AnkiConnect listens on.
    pub host: String,
    pub port: u16,
    /// Protocol version sent with every action.
    pub api_version: u32,
    pub timeout_secs: u64,
    /// OpenAI-compatible chat completions URL used for example generation.
    pub generator_endpoint: String,
    pub generator_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        let connector = ConnectorConfig::default();
        let generator = GeneratorConfig::default();
        Self {
            host: connector.host,
            port: connector.port,
            api_version: connector.api_version,
            timeout_secs: connector.timeout.as_secs(),
            generator_endpoint: generator.endpoint,
            generator_model: generator.model,
        }
    }
}

/// Connection values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_version: Option<u32>,
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/anki-helpers/settings.json`
/// - Windows: `%APPDATA%/AnkiHelpers/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("AnkiHelpers").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("anki-helpers").join("settings.json")
    }
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable settings file {}: {e}", path.display());
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Loads settings from the default location.
pub fn load_settings() -> Settings {
    load_settings_from(&settings_file_path())
}

/// Builds the connector configuration from flags, environment and settings.
///
/// `env` looks up an environment variable; it is a parameter so resolution
/// can be exercised without touching the process environment.
pub fn connector_config(
    settings: &Settings,
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> ConnectorConfig {
    let env_port = env("ANKI_CONNECT_PORT").and_then(|raw| match raw.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            log::warn!("ignoring invalid ANKI_CONNECT_PORT={raw:?}");
            None
        }
    });

    let timeout = match settings.timeout_secs {
        0 => {
            log::warn!("ignoring timeoutSecs=0; using the default timeout");
            ConnectorConfig::default().timeout
        }
        secs => Duration::from_secs(secs),
    };

    ConnectorConfig {
        host: overrides
            .host
            .clone()
            .or_else(|| env("ANKI_CONNECT_HOST"))
            .unwrap_or_else(|| settings.host.clone()),
        port: overrides.port.or(env_port).unwrap_or(settings.port),
        api_version: overrides.api_version.unwrap_or(settings.api_version),
        timeout,
    }
}

/// Builds the text-generator configuration from environment and settings.
pub fn generator_config(
    settings: &Settings,
    env: impl Fn(&str) -> Option<String>,
) -> GeneratorConfig {
    GeneratorConfig {
        endpoint: settings.generator_endpoint.clone(),
        model: env("OPENAI_MODEL").unwrap_or_else(|| settings.generator_model.clone()),
        api_key: env("OPENAI_API_KEY"),
        ..GeneratorConfig::default()
    }
}
