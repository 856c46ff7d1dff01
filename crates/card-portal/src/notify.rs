use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.label(), self.message)
    }
}

/// Transient toast queue owned by the front-end and handed to whoever raises messages.
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    lifetime: Duration,
    next_id: u64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::with_lifetime(DEFAULT_LIFETIME)
    }
}

impl NotificationQueue {
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            lifetime,
            next_id: 1,
        }
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    pub fn push_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push_back(Notification {
            id,
            kind,
            message: message.into(),
            expires_at: now + self.lifetime,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Info, message)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before != self.items.len()
    }

    /// Drops every notification whose lifetime ended at or before `now`.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.expires_at > now);
        before - self.items.len()
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hands every pending notification to the caller, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.items.drain(..).collect()
    }
}
