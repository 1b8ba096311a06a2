//! Domovoy - accessible resident-assistant chat client
//!
//! This library provides the core functionality of the Domovoy client:
//! - Capture session orchestration (text, voice, sign-language input)
//! - AI gateway client (text/speech/gesture understanding, TTS)
//! - Append-only conversation log
//! - Localized rendering of backend results
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Input devices                       │
//! │   Keyboard  │  Microphone  │  Camera frames         │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │            Capture Session Controller                │
//! │   Mode switching │ Recording │ Gesture sampler      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              AI Gateway (HTTP)                       │
//! │   text  │  speech  │  gesture  │  TTS               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Every understanding step is delegated to the backend; the client is
//! orchestration, not inference.

pub mod config;
pub mod conversation;
pub mod error;
pub mod format;
pub mod gateway;
pub mod media;
pub mod session;
pub mod strings;

pub use config::Config;
pub use conversation::{ConversationLog, Message, Sender};
pub use error::{Error, Result};
pub use format::format_reply;
pub use gateway::{AudioClip, Backend, BackendTask, HttpGateway, ImageFrame, TaskKind};
pub use session::{InputMode, SessionController};
