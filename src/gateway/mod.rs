//! AI gateway client
//!
//! All understanding (text, speech, gesture) and speech synthesis is
//! delegated to the remote backend over plain HTTP request/response.
//! The [`Backend`] trait is the seam; [`HttpGateway`] is the one real
//! implementation.

mod http;
mod task;

pub use http::HttpGateway;
pub use task::{BackendTask, TaskKind};

use async_trait::async_trait;
use base64::Engine as _;

use crate::Result;

/// Wire content type for recorded audio clips
pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/webm";

/// One recorded audio clip, ready to send
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Encoded audio bytes
    pub bytes: Vec<u8>,
    /// MIME type sent as the request content type
    pub content_type: String,
}

impl AudioClip {
    /// Create a clip with an explicit content type
    #[must_use]
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Create a clip with the default wire content type
    #[must_use]
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self::new(bytes, DEFAULT_AUDIO_CONTENT_TYPE)
    }
}

/// A still camera frame as a base64 payload
///
/// Any `data:image/...;base64,` prefix is stripped at construction so the
/// wire body carries bare base64, which is what the gesture endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame(String);

impl ImageFrame {
    /// Encode raw image bytes (e.g. a JPEG) as a frame payload
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// Wrap an already base64-encoded payload, stripping any data-URI prefix
    #[must_use]
    pub fn from_base64(payload: &str) -> Self {
        let bare = payload
            .split_once(',')
            .map_or(payload, |(_, rest)| rest);
        Self(bare.to_string())
    }

    /// Bare base64 payload
    #[must_use]
    pub fn as_base64(&self) -> &str {
        &self.0
    }
}

/// The four outbound gateway operations
///
/// Implementations fail uniformly with [`crate::Error::Transport`] on any
/// non-2xx reply and never retry; a single failed attempt surfaces to the
/// caller, which owns the user-visible fallback text.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Submit a text utterance for understanding
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] if the call fails.
    async fn send_text(&self, text: &str) -> Result<BackendTask>;

    /// Submit a recorded audio clip for speech understanding
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] if the call fails.
    async fn send_audio(&self, clip: &AudioClip) -> Result<BackendTask>;

    /// Submit a still camera frame for gesture understanding
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] if the call fails.
    async fn send_frame(&self, frame: &ImageFrame) -> Result<BackendTask>;

    /// Synthesize speech for a reply line, returning encoded audio bytes
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] if the call fails.
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[test]
    fn frame_strips_data_uri_prefix() {
        let frame = ImageFrame::from_base64("data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(frame.as_base64(), "/9j/4AAQ");
    }

    #[test]
    fn bare_base64_passes_through() {
        let frame = ImageFrame::from_base64("/9j/4AAQ");
        assert_eq!(frame.as_base64(), "/9j/4AAQ");
    }

    #[test]
    fn frame_from_bytes_round_trips() {
        let frame = ImageFrame::from_bytes(b"\xff\xd8\xff\xe0");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(frame.as_base64())
            .unwrap();
        assert_eq!(decoded, b"\xff\xd8\xff\xe0");
    }
}
