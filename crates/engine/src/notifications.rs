//! Bounded queue of user-facing notifications.
//!
//! Every action outcome and failed refresh lands here. The TUI renders the
//! unexpired entries as toasts; the CLI prints whatever was pushed during a
//! command.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use flowdeck_types::{Notification, Severity};

pub const DEFAULT_CAPACITY: usize = 20;
pub const DEFAULT_TTL_SECONDS: i64 = 5;

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    entries: VecDeque<Notification>,
    capacity: usize,
    ttl: Duration,
    next_id: u64,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, Duration::seconds(DEFAULT_TTL_SECONDS))
    }
}

impl NotificationCenter {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            ttl,
            next_id: 1,
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> u64 {
        self.push_at(severity, message, Utc::now())
    }

    pub fn push_at(&mut self, severity: Severity, message: impl Into<String>, now: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            id,
            severity,
            message: message.into(),
            created_at: now,
        });
        id
    }

    /// All retained notifications, oldest first.
    pub fn all(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    /// Notifications younger than the configured time-to-live.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.entries
            .iter()
            .filter(|entry| now.signed_duration_since(entry.created_at) < self.ttl)
            .collect()
    }

    /// Drop expired notifications; returns `true` when anything was removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|entry| now.signed_duration_since(entry.created_at) < ttl);
        before != self.entries.len()
    }

    /// Remove and return everything, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.entries.drain(..).collect()
    }
}
