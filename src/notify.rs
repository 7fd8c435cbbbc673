//! Short-lived status messages shown to the user.
//!
//! Only one notification is visible at a time: a new one replaces the current
//! one and restarts the dismissal clock. Every notification is also logged.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    /// CSS class suffix used by the page (`notification success`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// When the notification disappears on its own.
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct NotificationService {
    ttl: Duration,
    current: Option<Notification>,
}

impl NotificationService {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Show a message, replacing whatever is on screen.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        match severity {
            Severity::Error => warn!(severity = severity.as_str(), %message, "notification"),
            Severity::Info | Severity::Success => info!(severity = severity.as_str(), %message, "notification"),
        }
        self.current = Some(Notification { message, severity, expires_at: now + self.ttl });
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.show(message, Severity::Success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.show(message, Severity::Error, now);
    }

    /// The visible notification, if it has not expired by `now`.
    #[must_use]
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.current.as_ref().filter(|n| n.expires_at > now)
    }

    /// Drop the notification if its time is up. Returns the dismissed one.
    pub fn expire(&mut self, now: Instant) -> Option<Notification> {
        if self.current.as_ref().is_some_and(|n| n.expires_at <= now) {
            return self.current.take();
        }
        None
    }

    /// When the visible notification will be dismissed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|n| n.expires_at)
    }
}
