//! Notification data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    /// Get the display label for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }

    /// Get an icon for this severity.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✔",
            Severity::Error => "✖",
            Severity::Info => "ℹ",
        }
    }
}

/// Unique identifier of a notification within one manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub(crate) u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ephemeral, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
    /// `None` keeps the notification until it is dismissed
    pub duration: Option<Duration>,
}

impl Notification {
    /// When the notification expires, if it auto-dismisses.
    pub fn expires_at(&self) -> Option<Instant> {
        self.duration.map(|d| self.created_at + d)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at().is_some_and(|deadline| now >= deadline)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.icon(), self.message)
    }
}

/// Change feed emitted by the manager for display collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Pushed(Notification),
    Dismissed(NotificationId),
    Expired(NotificationId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Success).unwrap(), "\"success\"");
        assert_eq!(
            serde_json::from_str::<Severity>("\"error\"").unwrap(),
            Severity::Error
        );
    }

    #[test]
    fn test_sticky_notification_never_expires() {
        let now = Instant::now();
        let n = Notification {
            id: NotificationId(1),
            message: "sticky".into(),
            severity: Severity::Info,
            created_at: now,
            duration: None,
        };
        assert_eq!(n.expires_at(), None);
        assert!(!n.is_expired(now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Instant::now();
        let n = Notification {
            id: NotificationId(2),
            message: "short".into(),
            severity: Severity::Success,
            created_at: now,
            duration: Some(Duration::from_millis(100)),
        };
        assert!(!n.is_expired(now + Duration::from_millis(99)));
        assert!(n.is_expired(now + Duration::from_millis(100)));
    }
}
