//! Domain services for Kudos.

pub mod notification;

pub use notification::{MockNotifier, NoopNotifier, NotificationResult, Notifier};
