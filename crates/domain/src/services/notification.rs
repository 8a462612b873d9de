//! Notification dispatcher boundary.
//!
//! Composed messages are relayed to an external chat system through the
//! [`Notifier`] trait. Delivery is best-effort: implementations report the
//! outcome as a [`NotificationResult`] instead of returning errors.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Result of a notification send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Notification was delivered.
    Sent,
    /// Delivery failed (logged, never propagated to the caller).
    Failed(String),
    /// Notification was skipped (integration disabled).
    Skipped,
}

impl NotificationResult {
    /// Label used for the `result` dimension of notification metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            NotificationResult::Sent => "sent",
            NotificationResult::Failed(_) => "failed",
            NotificationResult::Skipped => "skipped",
        }
    }
}

/// Chat integration used to relay composed messages.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Send a text message to the configured channel.
    async fn send_message(&self, text: &str) -> NotificationResult;

    /// Resolve a display name to a platform mention token such as `<@1234>`.
    ///
    /// Returns `None` when no member matches or the lookup fails.
    async fn resolve_mention_handle(&self, display_name: &str) -> Option<String>;
}

/// Notifier used when no chat integration is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait::async_trait]
impl Notifier for NoopNotifier {
    async fn send_message(&self, text: &str) -> NotificationResult {
        tracing::debug!(length = text.len(), "Chat integration disabled, skipping message");
        NotificationResult::Skipped
    }

    async fn resolve_mention_handle(&self, _display_name: &str) -> Option<String> {
        None
    }
}

/// Mock notifier for development and testing.
///
/// Records every message it is asked to send. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    mentions: HashMap<String, String>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockNotifier {
    /// Create a new mock notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock notifier that simulates delivery failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Register a mention handle returned for `display_name`.
    pub fn with_mention(mut self, display_name: &str, handle: &str) -> Self {
        self.mentions
            .insert(display_name.to_string(), handle.to_string());
        self
    }

    /// Messages recorded so far, in send order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send_message(&self, text: &str) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!("Mock notifier simulating failure");
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(text = %text, "Mock: Would send chat message");
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(text.to_string());
        }

        NotificationResult::Sent
    }

    async fn resolve_mention_handle(&self, display_name: &str) -> Option<String> {
        self.mentions.get(display_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_result_labels() {
        assert_eq!(NotificationResult::Sent.as_label(), "sent");
        assert_eq!(
            NotificationResult::Failed("boom".to_string()).as_label(),
            "failed"
        );
        assert_eq!(NotificationResult::Skipped.as_label(), "skipped");
    }

    #[tokio::test]
    async fn test_mock_notifier_records_messages() {
        let notifier = MockNotifier::new();
        let observer = notifier.clone();

        let result = notifier.send_message("Congrats!").await;
        assert_eq!(result, NotificationResult::Sent);
        assert_eq!(observer.sent_messages(), vec!["Congrats!".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_notifier_failure() {
        let notifier = MockNotifier::failing();

        let result = notifier.send_message("Congrats!").await;
        assert!(matches!(result, NotificationResult::Failed(_)));
        assert!(notifier.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_mock_notifier_mentions() {
        let notifier = MockNotifier::new().with_mention("vjuodz", "<@42>");

        assert_eq!(
            notifier.resolve_mention_handle("vjuodz").await,
            Some("<@42>".to_string())
        );
        assert_eq!(notifier.resolve_mention_handle("someone").await, None);
    }

    #[tokio::test]
    async fn test_noop_notifier_skips() {
        let notifier = NoopNotifier;
        assert_eq!(notifier.send_message("hi").await, NotificationResult::Skipped);
        assert_eq!(notifier.resolve_mention_handle("hi").await, None);
    }
}
