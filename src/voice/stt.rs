//! Speech-to-text transcription adapter
//!
//! Validates the audio payload, sends exactly one multipart request to the
//! configured provider, and normalizes the response. The provider reports
//! no confidence, so one is estimated from the transcript. Retries, if any,
//! are the caller's concern.

use std::time::Instant;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::SttConfig;
use crate::parser::vocabulary;
use crate::{Error, Result};

/// Maximum accepted upload size in bytes
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Advertised maximum clip length; the provider is the source of truth
pub const MAX_AUDIO_SECONDS: u64 = 300;

/// Audio container formats the provider accepts, by file extension
pub const SUPPORTED_FORMATS: &[&str] = &["wav", "mp3", "m4a", "ogg", "webm", "flac"];

/// Sampling temperature sent with every request; low for determinism
const TEMPERATURE: &str = "0";

/// Vocabulary bias prompt sent with transcription requests
const FOOD_BIAS_PROMPT: &str = "Household inventory commands about groceries \
and pantry items such as milk, eggs, bread, chicken, rice, flour, yogurt and \
cheese; quantities in cups, tablespoons, pounds, ounces and liters; storage \
places like the pantry, fridge, freezer and counter; expiration dates.";

/// Base confidence estimate for a non-empty transcript
const BASE_ESTIMATE: f32 = 0.8;
/// Penalty for a transcript under five characters
const SHORT_TEXT_PENALTY: f32 = 0.2;
/// Penalty for a transcript under three words
const FEW_WORDS_PENALTY: f32 = 0.1;
/// Bonus per recognized food term in the transcript
const FOOD_TERM_BONUS: f32 = 0.02;
/// Ceiling on the total food-term bonus
const FOOD_TERM_BONUS_CAP: f32 = 0.1;

/// Normalized transcription output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Transcript text, trimmed
    pub text: String,
    /// Estimated confidence in [0.1, 1.0]
    pub confidence: f32,
    /// Language the provider detected, if it reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_detected: Option<String>,
    /// Wall-clock time spent on the provider round trip
    pub processing_time_ms: u64,
    /// Audio duration the provider reported, zero when absent
    pub audio_duration_ms: u64,
}

/// Provider response body; only `text` is guaranteed
#[derive(Deserialize)]
struct ProviderResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// Transcribes audio through the configured provider
pub struct SpeechToText {
    client: reqwest::Client,
    config: SttConfig,
}

impl SpeechToText {
    #[must_use]
    pub fn new(config: SttConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Transcribe an audio payload.
    ///
    /// # Errors
    ///
    /// Fails before any network traffic with [`Error::SttUnavailable`] when
    /// no credential is configured, [`Error::PayloadTooLarge`] when the
    /// payload exceeds the configured ceiling, and
    /// [`Error::UnsupportedFormat`] for an unknown file extension. Provider
    /// failures (timeouts, non-2xx, malformed bodies) surface as
    /// [`Error::Provider`]; an empty transcript is
    /// [`Error::NoSpeechDetected`].
    pub async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
        content_type: &str,
        language: Option<&str>,
    ) -> Result<TranscriptionResult> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(Error::SttUnavailable);
        };

        if audio.len() > self.config.max_upload_bytes {
            return Err(Error::PayloadTooLarge {
                size: audio.len(),
                max: self.config.max_upload_bytes,
            });
        }

        let extension = file_extension(filename);
        if !SUPPORTED_FORMATS.contains(&extension.as_str()) {
            return Err(Error::UnsupportedFormat(extension));
        }

        tracing::debug!(
            audio_bytes = audio.len(),
            filename,
            content_type,
            "starting transcription"
        );
        let started = Instant::now();

        let part = Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|_| Error::UnsupportedFormat(content_type.to_string()))?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json")
            .text("temperature", TEMPERATURE);

        if self.config.food_bias {
            form = form.text("prompt", FOOD_BIAS_PROMPT);
        }
        if let Some(lang) = language.or(self.config.language.as_deref()) {
            form = form.text("language", lang.to_string());
        }

        let url = format!("{}/audio/transcriptions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                let message = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                };
                Error::Provider {
                    status: None,
                    message,
                }
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received provider response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "provider error");
            return Err(Error::Provider {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let body: ProviderResponse = response.json().await.map_err(|e| Error::Provider {
            status: None,
            message: format!("malformed response body: {e}"),
        })?;

        let text = body.text.trim().to_string();
        if text.is_empty() {
            return Err(Error::NoSpeechDetected);
        }

        let confidence = estimate_confidence(&text);
        #[allow(clippy::cast_possible_truncation)]
        let processing_time_ms = started.elapsed().as_millis() as u64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let audio_duration_ms = body
            .duration
            .map_or(0, |seconds| (seconds * 1000.0).round().max(0.0) as u64);

        tracing::info!(
            transcript = %text,
            confidence,
            processing_time_ms,
            "transcription complete"
        );

        Ok(TranscriptionResult {
            text,
            confidence,
            language_detected: body.language,
            processing_time_ms,
            audio_duration_ms,
        })
    }
}

/// Lowercased extension of `filename`, or "" when it has none.
fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map_or_else(String::new, |(_, extension)| {
            extension.to_ascii_lowercase()
        })
}

/// MIME type for a supported audio extension.
#[must_use]
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "wav" => "audio/wav",
        "m4a" => "audio/m4a",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        _ => "audio/mpeg",
    }
}

/// Estimate transcript confidence: the provider reports none, so score on
/// length and recognized food-domain terms.
fn estimate_confidence(text: &str) -> f32 {
    let mut confidence = BASE_ESTIMATE;
    if text.chars().count() < 5 {
        confidence -= SHORT_TEXT_PENALTY;
    }
    if text.split_whitespace().count() < 3 {
        confidence -= FEW_WORDS_PENALTY;
    }
    let lowered = text.to_lowercase();
    #[allow(clippy::cast_precision_loss)]
    let food_bonus = vocabulary::count_food_terms(&lowered) as f32 * FOOD_TERM_BONUS;
    confidence += food_bonus.min(FOOD_TERM_BONUS_CAP);
    confidence.clamp(0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("clip.wav"), "wav");
        assert_eq!(file_extension("CLIP.WAV"), "wav");
        assert_eq!(file_extension("a.b.mp3"), "mp3");
        assert_eq!(file_extension("noextension"), "");
    }

    #[test]
    fn test_supported_formats() {
        for extension in ["wav", "mp3", "m4a", "ogg", "webm", "flac"] {
            assert!(SUPPORTED_FORMATS.contains(&extension));
        }
        assert!(!SUPPORTED_FORMATS.contains(&"aiff"));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("wav"), "audio/wav");
        assert_eq!(mime_for_extension("mp3"), "audio/mpeg");
        assert_eq!(mime_for_extension("flac"), "audio/flac");
    }

    #[test]
    fn test_estimate_short_text() {
        // under 5 chars and under 3 words
        assert!((estimate_confidence("hm") - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_few_words() {
        // 3+ words escape both penalties
        assert!((estimate_confidence("tidy the shelf") - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_food_terms_add_up() {
        let score = estimate_confidence("add milk eggs and bread to the list");
        assert!((score - 0.86).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_food_bonus_is_capped() {
        let score =
            estimate_confidence("milk eggs bread chicken rice flour yogurt cheese butter bacon");
        assert!((score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_bounds() {
        let score = estimate_confidence("qq ww ee rr tt yy uu ii oo pp");
        assert!((0.1..=1.0).contains(&score));
    }
}
