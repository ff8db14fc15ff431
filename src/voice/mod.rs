//! Voice processing: transcription adaptation and the command pipeline

mod pipeline;
mod stt;

pub use pipeline::{VoiceCommandOutcome, VoicePipeline};
pub use stt::{
    mime_for_extension, SpeechToText, TranscriptionResult, MAX_AUDIO_SECONDS, MAX_UPLOAD_BYTES,
    SUPPORTED_FORMATS,
};
