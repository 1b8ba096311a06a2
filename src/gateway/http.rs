//! HTTP implementation of the gateway contract

use async_trait::async_trait;
use serde_json::Value;

use super::{AudioClip, Backend, BackendTask, ImageFrame};
use crate::Result;

/// Path for text understanding
const TEXT_PATH: &str = "/api/v1/ai/text";
/// Path for speech understanding
const SPEECH_PATH: &str = "/api/v1/ai/speech";
/// Path for gesture understanding
const GESTURE_PATH: &str = "/api/v1/translator/raspalcovka";
/// Path for speech synthesis
const TTS_PATH: &str = "/api/v1/tts";

/// Gateway client over plain HTTP request/response
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a client against one backend base URL
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decode a reply body into a task, degrading malformed payloads
    ///
    /// A body that is not JSON at all is retained verbatim so the formatter
    /// can still render it as a dump; decode problems never propagate.
    fn decode_task(body: String) -> BackendTask {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => BackendTask::from_value(value),
            Err(e) => {
                tracing::warn!(error = %e, "malformed gateway reply, keeping raw body");
                BackendTask::from_raw_text(body)
            }
        }
    }
}

#[async_trait]
impl Backend for HttpGateway {
    async fn send_text(&self, text: &str) -> Result<BackendTask> {
        #[derive(serde::Serialize)]
        struct TextRequest<'a> {
            text: &'a str,
        }

        tracing::debug!(chars = text.len(), "sending text for understanding");

        let response = self
            .client
            .post(self.url(TEXT_PATH))
            .json(&TextRequest { text })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "text request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "text reply received");

        let body = response.error_for_status()?.text().await?;
        Ok(Self::decode_task(body))
    }

    async fn send_audio(&self, clip: &AudioClip) -> Result<BackendTask> {
        tracing::debug!(
            bytes = clip.bytes.len(),
            content_type = %clip.content_type,
            "sending audio clip for understanding"
        );

        let response = self
            .client
            .post(self.url(SPEECH_PATH))
            .header("Content-Type", clip.content_type.clone())
            .body(clip.bytes.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "speech request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "speech reply received");

        let body = response.error_for_status()?.text().await?;
        Ok(Self::decode_task(body))
    }

    async fn send_frame(&self, frame: &ImageFrame) -> Result<BackendTask> {
        #[derive(serde::Serialize)]
        struct FrameRequest<'a> {
            image: &'a str,
        }

        tracing::debug!(
            payload_chars = frame.as_base64().len(),
            "sending camera frame for gesture understanding"
        );

        let response = self
            .client
            .post(self.url(GESTURE_PATH))
            .json(&FrameRequest {
                image: frame.as_base64(),
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "gesture request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "gesture reply received");

        let body = response.error_for_status()?.text().await?;
        Ok(Self::decode_task(body))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            text: &'a str,
        }

        tracing::debug!(chars = text.len(), "requesting speech synthesis");

        let response = self
            .client
            .post(self.url(TTS_PATH))
            .json(&TtsRequest { text })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "tts request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "tts reply received");

        let audio = response.error_for_status()?.bytes().await?;
        tracing::debug!(bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new("http://localhost:8000/");
        assert_eq!(gateway.url("/api/v1/tts"), "http://localhost:8000/api/v1/tts");
    }

    #[test]
    fn non_json_body_degrades_to_raw_text() {
        let task = HttpGateway::decode_task("<html>bad gateway</html>".to_string());
        assert!(!task.is_success());
        assert_eq!(
            task.raw(),
            &serde_json::Value::String("<html>bad gateway</html>".to_string())
        );
    }
}
