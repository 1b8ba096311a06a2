//! User-visible localized strings (Russian)
//!
//! Kept in one place so the chat lines the resident sees stay consistent
//! across text, voice, and gesture flows.

/// Greeting appended when a conversation starts
pub const WELCOME: &str =
    "Здравствуйте! Я помогу вам с услугами ЖКХ. Напишите, скажите или покажите, что нужно сделать.";

/// Fixed line for a failed text/gesture processing request
pub const PROCESSING_ERROR: &str = "Произошла ошибка при обработке запроса. Попробуйте ещё раз.";

/// Fixed line for a failed voice processing request
pub const VOICE_PROCESSING_ERROR: &str =
    "Не удалось обработать голосовое сообщение. Попробуйте ещё раз.";

/// Microphone permission or acquisition failure
pub const MICROPHONE_ERROR: &str = "Не удалось получить доступ к микрофону.";

/// Camera permission or acquisition failure
pub const CAMERA_ERROR: &str = "Не удалось получить доступ к камере.";

/// Gesture streaming aborted after a failed request
pub const GESTURE_STREAM_ERROR: &str =
    "Распознавание жестов остановлено из-за ошибки. Попробуйте ещё раз.";
