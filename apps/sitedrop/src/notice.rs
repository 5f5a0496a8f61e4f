//! Transient notification queue.
//!
//! Every failure or completion the user should see lands here; the render
//! loop prunes expired notices each frame.

use std::time::{Duration, Instant};

/// Default notice lifetime.
const DEFAULT_TTL: Duration = Duration::from_secs(4);

/// Error notice lifetime (longer for visibility).
const ERROR_TTL: Duration = Duration::from_secs(6);

/// The visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A transient notification shown at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
    created: Instant,
    ttl: Duration,
}

impl Notice {
    fn expired(&self) -> bool {
        self.created.elapsed() >= self.ttl
    }
}

/// In-memory notice queue with monotonic ID assignment.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NoticeKind, text: impl Into<String>, ttl: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            text: text.into(),
            created: Instant::now(),
            ttl,
        });
        id
    }

    /// Push a success notice.
    pub fn success(&mut self, text: impl Into<String>) -> u64 {
        self.push(NoticeKind::Success, text, DEFAULT_TTL)
    }

    /// Push an error notice with extended lifetime.
    pub fn error(&mut self, text: impl Into<String>) -> u64 {
        self.push(NoticeKind::Error, text, ERROR_TTL)
    }

    /// Push an info notice.
    pub fn info(&mut self, text: impl Into<String>) -> u64 {
        self.push(NoticeKind::Info, text, DEFAULT_TTL)
    }

    /// Drops notices whose lifetime has passed.
    pub fn prune_expired(&mut self) {
        self.notices.retain(|n| !n.expired());
    }

    /// Iterate over live notices in insertion order (oldest first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    #[cfg(test)]
    fn push_with_ttl(&mut self, kind: NoticeKind, text: &str, ttl: Duration) -> u64 {
        self.push(kind, text, ttl)
    }
}
