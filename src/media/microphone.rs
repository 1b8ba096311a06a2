//! Microphone capture

use std::sync::mpsc as std_mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleRate;
use tokio::sync::mpsc;

use super::{AudioChunk, AudioSource};
use crate::gateway::AudioClip;
use crate::{Error, Result};

/// Sample rate for capture (16kHz is enough for speech)
pub const CAPTURE_SAMPLE_RATE: u32 = 16000;

/// Microphone-backed audio source
///
/// cpal streams are not `Send`, so the stream lives on a dedicated capture
/// thread. The thread pushes i16 little-endian PCM chunks into the session's
/// channel and holds the device until told to release it. Dropping the
/// source releases the device too.
pub struct MicrophoneSource {
    release: Option<std_mpsc::Sender<()>>,
}

impl MicrophoneSource {
    /// Create an idle microphone source
    #[must_use]
    pub fn new() -> Self {
        Self { release: None }
    }
}

impl Default for MicrophoneSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MicrophoneSource {
    fn start(&mut self) -> Result<mpsc::UnboundedReceiver<AudioChunk>> {
        if self.release.is_some() {
            return Err(Error::Media("microphone already acquired".to_string()));
        }

        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let (release_tx, release_rx) = std_mpsc::channel();

        std::thread::spawn(move || capture_thread(&chunk_tx, &ready_tx, &release_rx));

        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.release = Some(release_tx);
                Ok(chunk_rx)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::Media("capture thread exited early".to_string())),
        }
    }

    fn stop(&mut self) {
        if let Some(release) = self.release.take() {
            // The thread drops the stream (and the chunk sender) on receipt
            let _ = release.send(());
            tracing::debug!("microphone released");
        }
    }

    fn encode_clip(&self, bytes: Vec<u8>) -> Result<AudioClip> {
        let wav = pcm_to_wav(&bytes, CAPTURE_SAMPLE_RATE)?;
        Ok(AudioClip::new(wav, "audio/wav"))
    }
}

impl Drop for MicrophoneSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Owns the cpal stream for the lifetime of one acquisition
fn capture_thread(
    chunk_tx: &mpsc::UnboundedSender<AudioChunk>,
    ready_tx: &std_mpsc::Sender<Result<()>>,
    release_rx: &std_mpsc::Receiver<()>,
) {
    let stream = match build_input_stream(chunk_tx.clone()) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(Error::Media(e.to_string())));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    // Hold the device until release (or until the source is dropped)
    let _ = release_rx.recv();
    drop(stream);
    tracing::debug!("capture thread stopped");
}

fn build_input_stream(chunk_tx: mpsc::UnboundedSender<AudioChunk>) -> Result<cpal::Stream> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or_else(|| Error::Media("no input device available".to_string()))?;

    let supported_config = device
        .supported_input_configs()
        .map_err(|e| Error::Media(e.to_string()))?
        .find(|c| {
            c.channels() == 1
                && c.min_sample_rate() <= SampleRate(CAPTURE_SAMPLE_RATE)
                && c.max_sample_rate() >= SampleRate(CAPTURE_SAMPLE_RATE)
        })
        .ok_or_else(|| Error::Media("no suitable capture config found".to_string()))?;

    let config = supported_config
        .with_sample_rate(SampleRate(CAPTURE_SAMPLE_RATE))
        .config();

    tracing::debug!(
        device = device.name().unwrap_or_default(),
        sample_rate = CAPTURE_SAMPLE_RATE,
        channels = config.channels,
        "microphone acquired"
    );

    device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = chunk_tx.send(samples_to_pcm(data));
            },
            |err| {
                tracing::error!(error = %err, "microphone capture error");
            },
            None,
        )
        .map_err(|e| Error::Media(e.to_string()))
}

/// Convert f32 samples to i16 little-endian PCM bytes
fn samples_to_pcm(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        bytes.extend_from_slice(&sample_i16.to_le_bytes());
    }
    bytes
}

/// Wrap i16 little-endian PCM bytes in a WAV container
fn pcm_to_wav(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for pair in pcm.chunks_exact(2) {
            let sample = i16::from_le_bytes([pair[0], pair[1]]);
            writer
                .write_sample(sample)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
