//! Shared test fakes
//!
//! In-memory stand-ins for the gateway and media devices so session
//! behavior can be tested without hardware or a backend.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use domovoy::gateway::{AudioClip, Backend, BackendTask, ImageFrame};
use domovoy::media::{AudioChunk, AudioSource, FrameSource};
use domovoy::{Error, Result};

fn refused() -> Error {
    Error::Io(std::io::ErrorKind::ConnectionRefused.into())
}

/// A success reply the formatter renders deterministically
#[must_use]
pub fn elevator_reply() -> Value {
    json!({
        "status": "success",
        "task": "call_elevator",
        "parameters": {"direction": "up", "floor": 5}
    })
}

/// Scripted gateway fake that records every call
pub struct FakeBackend {
    reply: Value,
    /// Delay applied to gesture replies, for late-arrival tests
    pub frame_delay: Duration,
    /// Fail all understanding calls
    pub fail_understanding: bool,
    pub texts: Mutex<Vec<String>>,
    pub clips: Mutex<Vec<AudioClip>>,
    pub frame_requests: AtomicUsize,
    pub tts_requests: Mutex<Vec<String>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new(reply: Value) -> Self {
        Self {
            reply,
            frame_delay: Duration::ZERO,
            fail_understanding: false,
            texts: Mutex::new(Vec::new()),
            clips: Mutex::new(Vec::new()),
            frame_requests: AtomicUsize::new(0),
            tts_requests: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        let mut backend = Self::new(elevator_reply());
        backend.fail_understanding = true;
        backend
    }

    #[must_use]
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    pub fn frames_sent(&self) -> usize {
        self.frame_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn send_text(&self, text: &str) -> Result<BackendTask> {
        self.texts.lock().unwrap().push(text.to_string());
        if self.fail_understanding {
            return Err(refused());
        }
        Ok(BackendTask::from_value(self.reply.clone()))
    }

    async fn send_audio(&self, clip: &AudioClip) -> Result<BackendTask> {
        self.clips.lock().unwrap().push(clip.clone());
        if self.fail_understanding {
            return Err(refused());
        }
        Ok(BackendTask::from_value(self.reply.clone()))
    }

    async fn send_frame(&self, _frame: &ImageFrame) -> Result<BackendTask> {
        self.frame_requests.fetch_add(1, Ordering::SeqCst);
        if !self.frame_delay.is_zero() {
            tokio::time::sleep(self.frame_delay).await;
        }
        if self.fail_understanding {
            return Err(refused());
        }
        Ok(BackendTask::from_value(self.reply.clone()))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>> {
        self.tts_requests.lock().unwrap().push(text.to_string());
        Ok(vec![0u8; 16])
    }
}

/// Records device lifecycle events in order across fakes
#[derive(Clone, Default)]
pub struct DeviceEvents(Arc<Mutex<Vec<String>>>);

impl DeviceEvents {
    pub fn push(&self, event: &str) {
        self.0.lock().unwrap().push(event.to_string());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Audio source that pushes scripted chunks on start
pub struct FakeAudioSource {
    chunks: Vec<AudioChunk>,
    fail_acquire: bool,
    held: bool,
    events: DeviceEvents,
    releases: Arc<AtomicUsize>,
}

impl FakeAudioSource {
    #[must_use]
    pub fn new(chunks: Vec<AudioChunk>, events: DeviceEvents) -> Self {
        Self {
            chunks,
            fail_acquire: false,
            held: false,
            events,
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn failing(events: DeviceEvents) -> Self {
        let mut source = Self::new(Vec::new(), events);
        source.fail_acquire = true;
        source
    }

    #[must_use]
    pub fn release_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.releases)
    }
}

impl AudioSource for FakeAudioSource {
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<AudioChunk>> {
        if self.fail_acquire {
            return Err(Error::Media("mic denied".to_string()));
        }
        self.events.push("mic:acquire");
        self.held = true;

        let (tx, rx) = mpsc::unbounded_channel();
        for chunk in &self.chunks {
            tx.send(chunk.clone()).unwrap();
        }
        // Sender drops here; the session sees a clean end of stream
        Ok(rx)
    }

    fn stop(&mut self) {
        if self.held {
            self.held = false;
            self.events.push("mic:release");
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Frame source producing identical frames, counting grabs and releases
pub struct FakeFrameSource {
    fail_acquire: bool,
    held: bool,
    events: DeviceEvents,
    grabs: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl FakeFrameSource {
    #[must_use]
    pub fn new(events: DeviceEvents) -> Self {
        Self {
            fail_acquire: false,
            held: false,
            events,
            grabs: Arc::new(AtomicUsize::new(0)),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn failing(events: DeviceEvents) -> Self {
        let mut source = Self::new(events);
        source.fail_acquire = true;
        source
    }

    #[must_use]
    pub fn release_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.releases)
    }
}

impl FrameSource for FakeFrameSource {
    fn start(&mut self) -> Result<()> {
        if self.fail_acquire {
            return Err(Error::Media("camera denied".to_string()));
        }
        self.events.push("camera:acquire");
        self.held = true;
        Ok(())
    }

    fn grab(&mut self) -> Result<ImageFrame> {
        self.grabs.fetch_add(1, Ordering::SeqCst);
        Ok(ImageFrame::from_bytes(b"\xff\xd8fake-jpeg"))
    }

    fn stop(&mut self) {
        if self.held {
            self.held = false;
            self.events.push("camera:release");
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Sink that counts plays instead of touching audio hardware
#[derive(Default)]
pub struct FakeSink {
    pub plays: AtomicUsize,
}

#[async_trait]
impl domovoy::media::AudioSink for FakeSink {
    async fn play(&self, _audio: &[u8]) -> Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
