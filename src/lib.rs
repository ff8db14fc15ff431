//! Larder Gateway - voice command processing for household inventory
//!
//! This library turns a spoken or typed household command into a
//! structured, machine-actionable instruction:
//! - Transcription adaptation: validate an audio payload, hand it to an
//!   external speech-to-text provider, and normalize the response into a
//!   confidence-scored transcript
//! - Command parsing: turn free-form text into an action plus extracted
//!   items (name, quantity, unit, storage location, expiration date)
//!
//! # Architecture
//!
//! ```text
//! audio bytes ──▶ SpeechToText ──▶ TranscriptionResult
//!                                         │
//! raw text ───────────────────────────────▼
//!                                   CommandParser ──▶ CommandResult
//!                                         │
//!                                   VoicePipeline ──▶ VoiceCommandOutcome
//! ```
//!
//! Parsing is pure and synchronous; only the transcription adapter touches
//! the network, exactly once per call. What happens to a parsed command —
//! storage, scheduling, notifications — is the caller's business.

pub mod config;
pub mod error;
pub mod parser;
pub mod voice;

pub use config::{Config, SttConfig};
pub use error::{Error, Result};
pub use parser::{
    Action, CommandParser, CommandResult, EntityExtractor, Location, ParsedEntity, Unit,
};
pub use voice::{SpeechToText, TranscriptionResult, VoiceCommandOutcome, VoicePipeline};
