//! Capture session orchestration
//!
//! The controller owns the current input mode and the single active capture
//! session. Switching modes or starting a new session always tears the
//! previous one down — device release completes before the next acquire, so
//! no two sessions ever hold a device concurrently.

mod gesture;
mod voice;

pub use gesture::GestureSession;
pub use voice::VoiceSession;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::conversation::{ConversationLog, Sender};
use crate::format::format_reply;
use crate::gateway::Backend;
use crate::media::{AudioSink, AudioSource, FrameSource};
use crate::strings;
use crate::Result;

/// Active input mode; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Typed text
    #[default]
    Text,
    /// Push-to-talk voice recording
    Voice,
    /// Sign-language gesture streaming
    Sign,
}

enum ActiveSession {
    Voice(VoiceSession),
    Gesture(GestureSession),
}

/// Coordinates input modes, media devices, and gateway calls
pub struct SessionController {
    backend: Arc<dyn Backend>,
    log: ConversationLog,
    speaker: Option<Arc<dyn AudioSink>>,
    gesture_interval: Duration,
    mode: InputMode,
    active: Option<ActiveSession>,
}

impl SessionController {
    /// Create a controller in text mode with no active session
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, log: ConversationLog, config: &Config) -> Self {
        Self {
            backend,
            log,
            speaker: None,
            gesture_interval: config.gesture_interval,
            mode: InputMode::default(),
            active: None,
        }
    }

    /// Speak successful replies through the given sink
    #[must_use]
    pub fn with_speaker(mut self, speaker: Arc<dyn AudioSink>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    /// Current input mode
    #[must_use]
    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    /// Whether a capture session is currently active
    #[must_use]
    pub fn is_active(&self) -> bool {
        match &self.active {
            Some(ActiveSession::Voice(_)) => true,
            // A gesture session may have auto-stopped on error
            Some(ActiveSession::Gesture(session)) => session.is_live(),
            None => false,
        }
    }

    /// Switch input mode, releasing any resource the previous mode held
    pub async fn set_mode(&mut self, mode: InputMode) {
        if mode != self.mode {
            self.teardown().await;
            tracing::debug!(from = ?self.mode, to = ?mode, "input mode switched");
            self.mode = mode;
        }
    }

    /// Submit one typed line: a single atomic send with no session
    pub async fn submit_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.log.append(Sender::User, text);

        match self.backend.send_text(text).await {
            Ok(task) => {
                let line = format_reply(&task);
                let speak = task.is_success();
                self.log.append(Sender::Assistant, line.as_str());
                if speak {
                    self.speak(&line).await;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "text submission failed");
                self.log.append(Sender::Assistant, strings::PROCESSING_ERROR);
            }
        }
    }

    /// Acquire the microphone and start recording
    ///
    /// Tears down any previous session first. An acquisition failure leaves
    /// the controller idle and appends the microphone-error line.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Media`] if the device cannot be acquired.
    pub async fn start_recording(&mut self, mut source: Box<dyn AudioSource>) -> Result<()> {
        self.teardown().await;
        self.mode = InputMode::Voice;

        match source.start() {
            Ok(chunks) => {
                tracing::debug!("recording started");
                self.active = Some(ActiveSession::Voice(VoiceSession::new(source, chunks)));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "microphone acquisition failed");
                // Release anything a partial acquisition left behind
                source.stop();
                self.log.append(Sender::Assistant, strings::MICROPHONE_ERROR);
                Err(e)
            }
        }
    }

    /// Stop recording, assemble the clip, and submit it
    pub async fn stop_recording(&mut self) {
        let session = match self.active.take() {
            Some(ActiveSession::Voice(session)) => session,
            other => {
                self.active = other;
                return;
            }
        };

        let clip = match session.finish().await {
            Ok(clip) => clip,
            Err(e) => {
                tracing::warn!(error = %e, "clip encoding failed");
                self.log
                    .append(Sender::Assistant, strings::VOICE_PROCESSING_ERROR);
                return;
            }
        };

        self.log.append(Sender::User, "🎤 Голосовое сообщение");

        match self.backend.send_audio(&clip).await {
            Ok(task) => {
                let line = format_reply(&task);
                let speak = task.is_success();
                self.log.append(Sender::Assistant, line.as_str());
                if speak {
                    self.speak(&line).await;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "voice submission failed");
                self.log
                    .append(Sender::Assistant, strings::VOICE_PROCESSING_ERROR);
            }
        }
    }

    /// Acquire the camera and start the gesture sampling loop
    ///
    /// Tears down any previous session first. An acquisition failure leaves
    /// the controller idle and appends the camera-error line.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Media`] if the camera cannot be acquired.
    pub async fn start_streaming(&mut self, mut source: Box<dyn FrameSource>) -> Result<()> {
        self.teardown().await;
        self.mode = InputMode::Sign;

        if let Err(e) = source.start() {
            tracing::warn!(error = %e, "camera acquisition failed");
            self.log.append(Sender::Assistant, strings::CAMERA_ERROR);
            return Err(e);
        }

        tracing::debug!(interval = ?self.gesture_interval, "gesture streaming started");
        self.active = Some(ActiveSession::Gesture(GestureSession::start(
            Arc::clone(&self.backend),
            self.log.clone(),
            source,
            self.gesture_interval,
        )));
        Ok(())
    }

    /// Stop gesture streaming and release the camera
    pub async fn stop_streaming(&mut self) {
        match self.active.take() {
            Some(ActiveSession::Gesture(session)) => session.stop().await,
            other => self.active = other,
        }
    }

    /// Tear down whatever session is active; always leaves the controller idle
    pub async fn teardown(&mut self) {
        match self.active.take() {
            Some(ActiveSession::Voice(session)) => session.abort(),
            Some(ActiveSession::Gesture(session)) => session.stop().await,
            None => {}
        }
    }

    /// Speak a reply line; synthesis failures are logged, never displayed
    async fn speak(&self, line: &str) {
        let Some(speaker) = &self.speaker else {
            return;
        };

        match self.backend.synthesize_speech(line).await {
            Ok(audio) => {
                if let Err(e) = speaker.play(&audio).await {
                    tracing::warn!(error = %e, "playback failed");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
            }
        }
    }
}
