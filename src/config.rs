//! Configuration management for the Larder gateway
//!
//! Defaults, overlaid by an optional TOML file (all fields optional),
//! overlaid by environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::voice::MAX_UPLOAD_BYTES;
use crate::{Error, Result};

/// Default STT endpoint (an OpenAI-compatible transcription API)
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default transcription model
const DEFAULT_MODEL: &str = "whisper-1";

/// Default provider round-trip deadline
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Larder gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Speech-to-text configuration
    pub stt: SttConfig,
}

/// Speech-to-text configuration
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// Provider credential; transcription is unavailable without one
    pub api_key: Option<String>,

    /// Transcription model identifier
    pub model: String,

    /// Provider API base URL
    pub base_url: String,

    /// Default language hint (ISO 639-1), overridable per call
    pub language: Option<String>,

    /// Provider round-trip deadline
    pub timeout: Duration,

    /// Upload ceiling in bytes
    pub max_upload_bytes: usize,

    /// Send the food-vocabulary bias prompt with requests
    pub food_bias: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            food_bias: true,
        }
    }
}

/// TOML configuration file schema; a partial overlay on top of defaults
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    stt: SttFileConfig,
}

/// STT section of the config file
#[derive(Debug, Default, Deserialize)]
struct SttFileConfig {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    language: Option<String>,
    timeout_secs: Option<u64>,
    max_upload_bytes: Option<usize>,
    food_bias: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file location and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be read or
    /// parsed, or if an environment override has an invalid value.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally from an explicit config file path.
    ///
    /// With an explicit path the file must exist; the default path is
    /// skipped silently when absent.
    ///
    /// # Errors
    ///
    /// Returns error on unreadable/unparseable file or invalid overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut stt = SttConfig::default();

        let file = match path {
            Some(explicit) => Some(read_config_file(explicit)?),
            None => match default_config_path() {
                Some(default) if default.exists() => Some(read_config_file(&default)?),
                _ => None,
            },
        };

        if let Some(file) = file {
            if let Some(api_key) = file.stt.api_key {
                stt.api_key = Some(api_key);
            }
            if let Some(model) = file.stt.model {
                stt.model = model;
            }
            if let Some(base_url) = file.stt.base_url {
                stt.base_url = base_url;
            }
            if let Some(language) = file.stt.language {
                stt.language = Some(language);
            }
            if let Some(timeout_secs) = file.stt.timeout_secs {
                stt.timeout = Duration::from_secs(timeout_secs);
            }
            if let Some(max_upload_bytes) = file.stt.max_upload_bytes {
                stt.max_upload_bytes = max_upload_bytes;
            }
            if let Some(food_bias) = file.stt.food_bias {
                stt.food_bias = food_bias;
            }
        }

        // env beats file; the provider-native key name is honored too
        if let Some(api_key) = env_var("LARDER_STT_API_KEY").or_else(|| env_var("OPENAI_API_KEY"))
        {
            stt.api_key = Some(api_key);
        }
        if let Some(model) = env_var("LARDER_STT_MODEL") {
            stt.model = model;
        }
        if let Some(base_url) = env_var("LARDER_STT_BASE_URL") {
            stt.base_url = base_url;
        }
        if let Some(language) = env_var("LARDER_STT_LANGUAGE") {
            stt.language = Some(language);
        }
        if let Some(raw) = env_var("LARDER_STT_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| Error::Config(format!("invalid LARDER_STT_TIMEOUT_SECS: {raw}")))?;
            stt.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = env_var("LARDER_FOOD_BIAS") {
            stt.food_bias = !matches!(raw.as_str(), "0" | "false" | "off");
        }

        tracing::debug!(
            model = %stt.model,
            base_url = %stt.base_url,
            has_credential = stt.api_key.is_some(),
            "loaded configuration"
        );

        Ok(Self { stt })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Platform config file location, e.g. `~/.config/larder/config.toml`
fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "larder", "larder")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let stt = SttConfig::default();
        assert_eq!(stt.api_key, None);
        assert_eq!(stt.model, "whisper-1");
        assert_eq!(stt.timeout, Duration::from_secs(30));
        assert_eq!(stt.max_upload_bytes, 50 * 1024 * 1024);
        assert!(stt.food_bias);
    }

    #[test]
    fn test_file_overlay_is_partial() {
        let file: ConfigFile = toml::from_str(
            r#"
            [stt]
            model = "whisper-large-v3"
            timeout_secs = 10
            "#,
        )
        .unwrap();
        assert_eq!(file.stt.model.as_deref(), Some("whisper-large-v3"));
        assert_eq!(file.stt.timeout_secs, Some(10));
        assert_eq!(file.stt.api_key, None);
        assert_eq!(file.stt.food_bias, None);
    }

    #[test]
    fn test_empty_file_parses() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert!(file.stt.model.is_none());
    }
}
