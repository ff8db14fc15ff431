//! End-to-end voice command processing
//!
//! The only place transcription and parsing are composed; neither stage
//! knows about the other. Provider and input errors propagate unchanged —
//! no retries, no fallback providers.

use serde::{Deserialize, Serialize};

use crate::parser::{CommandParser, CommandResult};
use crate::voice::stt::{SpeechToText, TranscriptionResult};
use crate::Result;

/// Transcription confidence above which the transcript is trusted
const MIN_TRANSCRIPTION_CONFIDENCE: f32 = 0.7;
/// Command confidence above which the parse is trusted
const MIN_COMMAND_CONFIDENCE: f32 = 0.5;

/// Combined result of transcribing and parsing one voice command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceCommandOutcome {
    /// Normalized transcription stage output
    pub transcription: TranscriptionResult,
    /// Parsed command stage output
    pub command: CommandResult,
    /// Derived: structural validity plus both confidence gates
    pub success: bool,
    /// End-user explanation when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Composes the transcription adapter and the command parser
pub struct VoicePipeline {
    stt: SpeechToText,
    parser: CommandParser,
}

impl VoicePipeline {
    #[must_use]
    pub fn new(stt: SpeechToText) -> Self {
        Self {
            stt,
            parser: CommandParser::new(),
        }
    }

    /// Transcribe an audio payload and parse the transcript.
    ///
    /// # Errors
    ///
    /// Transcription errors propagate unchanged; parsing itself never
    /// fails.
    pub async fn process(
        &self,
        audio: &[u8],
        filename: &str,
        content_type: &str,
        language: Option<&str>,
    ) -> Result<VoiceCommandOutcome> {
        let transcription = self
            .stt
            .transcribe(audio, filename, content_type, language)
            .await?;
        let command = self.parser.parse(&transcription.text);
        let is_valid = self.parser.validate(&command);
        let (success, message) = evaluate(&transcription, &command, is_valid);

        tracing::info!(
            action = command.action.as_str(),
            success,
            transcription_confidence = transcription.confidence,
            command_confidence = command.confidence,
            "voice command processed"
        );

        Ok(VoiceCommandOutcome {
            transcription,
            command,
            success,
            message,
        })
    }

    /// Text-only flow: parse and validate a raw string without a
    /// transcription stage.
    #[must_use]
    pub fn process_text(&self, text: &str) -> CommandResult {
        self.parser.parse(text)
    }
}

/// Derive the success flag and, on failure, the first applicable
/// explanation: unclear speech, then unclear intent, then missing items.
fn evaluate(
    transcription: &TranscriptionResult,
    command: &CommandResult,
    is_valid: bool,
) -> (bool, Option<String>) {
    let success = is_valid
        && transcription.confidence > MIN_TRANSCRIPTION_CONFIDENCE
        && command.confidence > MIN_COMMAND_CONFIDENCE;
    if success {
        return (true, None);
    }

    let message = if transcription.confidence <= MIN_TRANSCRIPTION_CONFIDENCE {
        "I couldn't hear that clearly. Please try again."
    } else if command.confidence <= MIN_COMMAND_CONFIDENCE {
        "I heard you, but I'm not sure what you want done. Try rephrasing."
    } else {
        "The command is missing the item it should apply to."
    };
    (false, Some(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Action;
    use serde_json::Map;

    fn transcription(confidence: f32) -> TranscriptionResult {
        TranscriptionResult {
            text: "add milk".to_string(),
            confidence,
            language_detected: Some("en".to_string()),
            processing_time_ms: 120,
            audio_duration_ms: 900,
        }
    }

    fn command(confidence: f32) -> CommandResult {
        CommandResult {
            action: Action::List,
            entities: Vec::new(),
            raw_text: "add milk".to_string(),
            confidence,
            errors: Vec::new(),
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_success_requires_all_three_gates() {
        let (success, message) = evaluate(&transcription(0.9), &command(0.8), true);
        assert!(success);
        assert_eq!(message, None);
    }

    #[test]
    fn test_unclear_speech_reported_first() {
        // both confidences are low; the transcription explanation wins
        let (success, message) = evaluate(&transcription(0.5), &command(0.2), false);
        assert!(!success);
        assert_eq!(
            message.as_deref(),
            Some("I couldn't hear that clearly. Please try again.")
        );
    }

    #[test]
    fn test_unclear_intent_reported_second() {
        let (success, message) = evaluate(&transcription(0.9), &command(0.4), true);
        assert!(!success);
        assert_eq!(
            message.as_deref(),
            Some("I heard you, but I'm not sure what you want done. Try rephrasing.")
        );
    }

    #[test]
    fn test_structural_failure_reported_last() {
        let (success, message) = evaluate(&transcription(0.9), &command(0.8), false);
        assert!(!success);
        assert_eq!(
            message.as_deref(),
            Some("The command is missing the item it should apply to.")
        );
    }

    #[test]
    fn test_boundary_confidences_do_not_pass() {
        // gates are strict inequalities
        let (success, _) = evaluate(&transcription(0.7), &command(0.8), true);
        assert!(!success);
        let (success, _) = evaluate(&transcription(0.9), &command(0.5), true);
        assert!(!success);
    }
}
