//! Speech playback to the default output device

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use minimp3::{Decoder, Frame};

use super::AudioSink;
use crate::{Error, Result};

/// Extra time to let the device drain after the last sample
const DRAIN_PAD: Duration = Duration::from_millis(200);

/// Plays synthesized speech through cpal
///
/// Accepts MP3 or WAV bytes, whichever the TTS endpoint returns.
pub struct Speaker;

impl Speaker {
    /// Create a playback handle; the device is opened per play call
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Speaker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for Speaker {
    async fn play(&self, audio: &[u8]) -> Result<()> {
        let decoded = decode(audio)?;
        tracing::debug!(
            samples = decoded.samples.len(),
            sample_rate = decoded.sample_rate,
            channels = decoded.channels,
            "playing synthesized speech"
        );

        // cpal streams are not Send; keep them on a blocking thread
        tokio::task::spawn_blocking(move || play_blocking(&decoded))
            .await
            .map_err(|e| Error::Audio(e.to_string()))?
    }
}

struct DecodedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

fn decode(audio: &[u8]) -> Result<DecodedAudio> {
    if audio.starts_with(b"RIFF") {
        decode_wav(audio)
    } else {
        decode_mp3(audio)
    }
}

fn decode_wav(audio: &[u8]) -> Result<DecodedAudio> {
    let mut reader = hound::WavReader::new(Cursor::new(audio))
        .map_err(|e| Error::Audio(format!("bad wav payload: {e}")))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| f32::from(s.unwrap_or(0)) / 32768.0)
            .collect(),
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.unwrap_or(0.0))
            .collect(),
    };

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

fn decode_mp3(audio: &[u8]) -> Result<DecodedAudio> {
    let mut decoder = Decoder::new(Cursor::new(audio));
    let mut samples = Vec::new();
    let mut sample_rate = 0u32;
    let mut channels = 0u16;

    loop {
        match decoder.next_frame() {
            Ok(Frame {
                data,
                sample_rate: rate,
                channels: ch,
                ..
            }) => {
                #[allow(clippy::cast_sign_loss)]
                {
                    sample_rate = rate as u32;
                }
                #[allow(clippy::cast_possible_truncation)]
                {
                    channels = ch as u16;
                }
                samples.extend(data.iter().map(|&s| f32::from(s) / 32768.0));
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("mp3 decode failed: {e}"))),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(Error::Audio("empty audio payload".to_string()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

fn play_blocking(decoded: &DecodedAudio) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

    let config = StreamConfig {
        channels: decoded.channels,
        sample_rate: SampleRate(decoded.sample_rate),
        buffer_size: BufferSize::Default,
    };

    let samples = Arc::new(decoded.samples.clone());
    let position = Arc::new(AtomicUsize::new(0));

    let stream = {
        let samples = Arc::clone(&samples);
        let position = Arc::clone(&position);
        device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let start = position.fetch_add(out.len(), Ordering::SeqCst);
                    for (i, slot) in out.iter_mut().enumerate() {
                        *slot = samples.get(start + i).copied().unwrap_or(0.0);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "playback error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?
    };

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    #[allow(clippy::cast_precision_loss)]
    let total = samples.len() as f64
        / (f64::from(decoded.sample_rate) * f64::from(decoded.channels));
    std::thread::sleep(Duration::from_secs_f64(total) + DRAIN_PAD);

    drop(stream);
    Ok(())
}
