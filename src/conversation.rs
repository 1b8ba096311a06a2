//! Append-only conversation log
//!
//! Insertion order is display order. Appends assign ids and wall-clock
//! timestamps and bump a watch revision so a display loop can refresh
//! without polling.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The resident
    User,
    /// The assistant
    Assistant,
}

/// One chat message; immutable once appended
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Unique message id
    pub id: Uuid,
    /// Display text
    pub text: String,
    /// Message originator
    pub sender: Sender,
    /// Wall-clock time assigned at append
    pub timestamp: DateTime<Utc>,
}

struct Inner {
    messages: Mutex<Vec<Message>>,
    revision: watch::Sender<u64>,
}

/// Shared handle to the append-only log
#[derive(Clone)]
pub struct ConversationLog {
    inner: Arc<Inner>,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                messages: Mutex::new(Vec::new()),
                revision,
            }),
        }
    }

    /// Append a message, returning a copy of the stored entry
    pub fn append(&self, sender: Sender, text: impl Into<String>) -> Message {
        let message = Message {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        };

        let len = {
            let mut messages = self
                .inner
                .messages
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            messages.push(message.clone());
            messages.len()
        };

        tracing::trace!(len, sender = ?sender, "message appended");
        self.inner.revision.send_replace(len as u64);
        message
    }

    /// Number of messages appended so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the full log in append order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.inner
            .messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Messages appended at or after `index`, for incremental display
    #[must_use]
    pub fn messages_since(&self, index: usize) -> Vec<Message> {
        let messages = self
            .inner
            .messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        messages.get(index..).unwrap_or_default().to_vec()
    }

    /// Watch the log length; changes on every append
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_preserve_order() {
        let log = ConversationLog::new();
        for i in 0..10 {
            log.append(Sender::User, format!("msg {i}"));
        }

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 10);
        for (i, message) in snapshot.iter().enumerate() {
            assert_eq!(message.text, format!("msg {i}"));
        }
    }

    #[test]
    fn entries_are_never_mutated() {
        let log = ConversationLog::new();
        let first = log.append(Sender::User, "привет");
        log.append(Sender::Assistant, "здравствуйте");

        let snapshot = log.snapshot();
        assert_eq!(snapshot[0].id, first.id);
        assert_eq!(snapshot[0].text, "привет");
        assert_eq!(snapshot[0].timestamp, first.timestamp);
    }

    #[test]
    fn revision_tracks_appends() {
        let log = ConversationLog::new();
        let rx = log.subscribe();
        assert_eq!(*rx.borrow(), 0);

        log.append(Sender::User, "раз");
        log.append(Sender::User, "два");
        assert_eq!(*rx.borrow(), 2);
    }

    #[test]
    fn messages_since_returns_tail() {
        let log = ConversationLog::new();
        log.append(Sender::User, "a");
        log.append(Sender::Assistant, "b");
        log.append(Sender::Assistant, "c");

        let tail = log.messages_since(1);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text, "b");
        assert!(log.messages_since(99).is_empty());
    }
}
