//! Notification Module
//!
//! Ephemeral user-facing messages ("toasts") reporting the outcome of
//! export operations. The manager is a plain service value: whoever needs to
//! report something receives a shared handle to it.
//!
//! # Architecture
//!
//! - `notification.rs` - message, severity, id and change-feed types
//! - `manager.rs` - insertion-ordered store with per-message auto-expiry

mod manager;
mod notification;

pub use manager::{NotificationManager, DEFAULT_DURATION};
pub use notification::{Notification, NotificationEvent, NotificationId, Severity};
