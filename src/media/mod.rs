//! Media device seams
//!
//! Capture sessions own their device exclusively through these traits.
//! Real devices live behind them ([`MicrophoneSource`], [`Speaker`]); tests
//! drive the session machinery with in-memory fakes.

mod frames;
mod microphone;
mod speaker;

pub use frames::FileFrameSource;
pub use microphone::{MicrophoneSource, CAPTURE_SAMPLE_RATE};
pub use speaker::Speaker;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::gateway::{AudioClip, ImageFrame};
use crate::Result;

/// One audio chunk as pushed by a source, in arrival order
pub type AudioChunk = Vec<u8>;

/// A recordable audio device
///
/// `start` acquires the device and returns the chunk channel; `stop`
/// releases it and must be idempotent. The channel's senders are dropped on
/// release so a consumer draining it sees a clean end of stream.
pub trait AudioSource: Send {
    /// Acquire the device and begin pushing chunks
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Media`] if the device cannot be acquired.
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<AudioChunk>>;

    /// Release the device; safe to call more than once
    fn stop(&mut self);

    /// Encode the concatenated chunk bytes into one sendable clip
    ///
    /// The default keeps the bytes as-is under the wire's default content
    /// type; sources producing raw PCM override this to add a container.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Audio`] if encoding fails.
    fn encode_clip(&self, bytes: Vec<u8>) -> Result<AudioClip> {
        Ok(AudioClip::webm(bytes))
    }
}

/// A still-frame camera device
pub trait FrameSource: Send {
    /// Acquire the camera
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Media`] if the camera cannot be acquired.
    fn start(&mut self) -> Result<()>;

    /// Capture the current frame
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Media`] if capture fails.
    fn grab(&mut self) -> Result<ImageFrame>;

    /// Release the camera; safe to call more than once
    fn stop(&mut self);
}

/// An output device for synthesized speech
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play encoded audio to completion
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Audio`] if decoding or playback fails.
    async fn play(&self, audio: &[u8]) -> Result<()>;
}
