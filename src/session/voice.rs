//! Voice capture session

use tokio::sync::mpsc;

use crate::gateway::AudioClip;
use crate::media::{AudioChunk, AudioSource};
use crate::Result;

/// One push-to-talk recording
///
/// Exclusively owns the microphone source between start and finish. Chunks
/// arrive over the channel in capture order; `finish` releases the device
/// first, then drains whatever arrived, so the clip is the ordered
/// concatenation of exactly the chunks captured before the stop.
pub struct VoiceSession {
    source: Box<dyn AudioSource>,
    chunks: mpsc::UnboundedReceiver<AudioChunk>,
}

impl VoiceSession {
    pub(crate) fn new(
        source: Box<dyn AudioSource>,
        chunks: mpsc::UnboundedReceiver<AudioChunk>,
    ) -> Self {
        Self { source, chunks }
    }

    /// Stop recording and assemble the clip
    ///
    /// Releasing the source drops the chunk sender, so the drain loop
    /// terminates once everything in flight has been received.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Audio`] if clip encoding fails.
    pub async fn finish(mut self) -> Result<AudioClip> {
        self.source.stop();

        let mut bytes = Vec::new();
        let mut count = 0usize;
        while let Some(chunk) = self.chunks.recv().await {
            bytes.extend_from_slice(&chunk);
            count += 1;
        }

        tracing::debug!(chunks = count, bytes = bytes.len(), "recording finished");
        self.source.encode_clip(bytes)
    }

    /// Tear down without producing a clip (mode switch, shutdown)
    pub(crate) fn abort(mut self) {
        self.source.stop();
        tracing::debug!("recording aborted");
    }
}
