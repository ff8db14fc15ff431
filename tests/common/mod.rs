//! Shared test utilities

use larder_gateway::{SpeechToText, SttConfig};

/// STT adapter with a dummy credential. Payload validation runs before any
/// network traffic, so tests exercising it never leave the machine.
#[must_use]
pub fn test_adapter() -> SpeechToText {
    SpeechToText::new(SttConfig {
        api_key: Some("test-key".to_string()),
        ..SttConfig::default()
    })
}

/// STT adapter with no credential configured.
#[must_use]
pub fn unconfigured_adapter() -> SpeechToText {
    SpeechToText::new(SttConfig::default())
}
