//! Transcription adapter integration tests
//!
//! Payload validation fails before any network traffic, so these tests
//! need no provider and no audio hardware.

use larder_gateway::voice::{MAX_UPLOAD_BYTES, SUPPORTED_FORMATS};
use larder_gateway::Error;

mod common;

#[tokio::test]
async fn test_oversized_payload_rejected_before_any_request() {
    let adapter = common::test_adapter();
    let audio = vec![0u8; 60 * 1024 * 1024];

    let err = adapter
        .transcribe(&audio, "big.wav", "audio/wav", None)
        .await
        .expect_err("oversized payload must be rejected");

    match err {
        Error::PayloadTooLarge { size, max } => {
            assert_eq!(size, 60 * 1024 * 1024);
            assert_eq!(max, MAX_UPLOAD_BYTES);
        }
        other => panic!("expected PayloadTooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsupported_extension_rejected() {
    let adapter = common::test_adapter();

    let err = adapter
        .transcribe(b"not really audio", "clip.aiff", "audio/aiff", None)
        .await
        .expect_err("unsupported format must be rejected");

    assert!(matches!(err, Error::UnsupportedFormat(ext) if ext == "aiff"));
}

#[tokio::test]
async fn test_extension_check_is_case_insensitive() {
    let adapter = common::test_adapter();

    let err = adapter
        .transcribe(b"riff", "CLIP.AIFF", "audio/aiff", None)
        .await
        .expect_err("unsupported format must be rejected regardless of case");

    assert!(matches!(err, Error::UnsupportedFormat(ext) if ext == "aiff"));
}

#[tokio::test]
async fn test_missing_credential_is_unavailable() {
    let adapter = common::unconfigured_adapter();

    let err = adapter
        .transcribe(b"riff", "clip.wav", "audio/wav", None)
        .await
        .expect_err("transcription without a credential must fail");

    assert!(matches!(err, Error::SttUnavailable));
}

#[test]
fn test_supported_formats_cover_the_contract() {
    for format in ["wav", "mp3", "m4a", "ogg", "webm", "flac"] {
        assert!(
            SUPPORTED_FORMATS.contains(&format),
            "{format} missing from supported formats"
        );
    }
}
