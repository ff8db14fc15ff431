//! Error types for the Larder gateway

use thiserror::Error;

/// Result type alias for Larder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Larder gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio payload in a format the provider does not accept
    #[error("unsupported audio format: {0:?}")]
    UnsupportedFormat(String),

    /// Audio payload over the upload ceiling
    #[error("audio payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },

    /// No speech-to-text credential configured
    #[error("no speech-to-text credential configured")]
    SttUnavailable,

    /// Provider-side transcription failure (timeout, non-2xx, bad body)
    #[error("transcription provider error{}: {message}", .status.map_or_else(String::new, |s| format!(" (status {s})")))]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// Provider returned an empty transcript
    #[error("no speech detected in audio")]
    NoSpeechDetected,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
