//! Client configuration

use std::time::Duration;

/// Default backend base URL when none is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Lower bound on the gesture sampling interval
pub const MIN_GESTURE_INTERVAL: Duration = Duration::from_millis(500);

/// Upper bound on the gesture sampling interval
pub const MAX_GESTURE_INTERVAL: Duration = Duration::from_millis(1500);

/// Domovoy client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (`DOMOVOY_URL`)
    pub base_url: String,

    /// Interval between gesture frame captures
    pub gesture_interval: Duration,

    /// Speak successful replies through the TTS endpoint
    pub speak: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            gesture_interval: Duration::from_millis(1000),
            speak: false,
        }
    }
}

impl Config {
    /// Configuration against one backend base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the gesture sampling interval, clamped to the allowed window
    #[must_use]
    pub fn with_gesture_interval(mut self, interval: Duration) -> Self {
        self.gesture_interval = interval.clamp(MIN_GESTURE_INTERVAL, MAX_GESTURE_INTERVAL);
        self
    }

    /// Enable or disable spoken replies
    #[must_use]
    pub const fn with_speak(mut self, speak: bool) -> Self {
        self.speak = speak;
        self
    }
}
