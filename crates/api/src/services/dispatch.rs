//! Best-effort notification dispatch.
//!
//! Runs after the message is committed, in a detached task, so chat
//! failures never reach the HTTP caller.

use std::sync::Arc;

use domain::services::{NotificationResult, Notifier};
use metrics::counter;
use tokio::task::JoinHandle;

use crate::services::giphy::GiphyClient;

/// Relays composed messages (and an optional GIF) to the chat integration.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    gifs: Option<Arc<GiphyClient>>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, gifs: Option<Arc<GiphyClient>>) -> Self {
        Self { notifier, gifs }
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    /// Spawn delivery of `text` and return the task handle.
    ///
    /// Callers normally drop the handle; tests await it.
    pub fn dispatch(&self, message_id: i64, text: String) -> JoinHandle<()> {
        let notifier = self.notifier.clone();
        let gifs = self.gifs.clone();

        tokio::spawn(async move {
            let result = notifier.send_message(&text).await;
            record(&result);
            match &result {
                NotificationResult::Sent => {
                    tracing::debug!(message_id = message_id, "Message relayed to chat");
                }
                NotificationResult::Failed(reason) => {
                    tracing::warn!(
                        message_id = message_id,
                        reason = %reason,
                        "Failed to relay message to chat"
                    );
                    return;
                }
                NotificationResult::Skipped => return,
            }

            let Some(gifs) = gifs else {
                return;
            };
            match gifs.random_gif_url().await {
                Ok(url) => {
                    let result = notifier.send_message(&url).await;
                    record(&result);
                    if let NotificationResult::Failed(reason) = result {
                        tracing::warn!(
                            message_id = message_id,
                            reason = %reason,
                            "Failed to relay celebration GIF"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        message_id = message_id,
                        error = %e,
                        "Failed to fetch celebration GIF"
                    );
                }
            }
        })
    }
}

fn record(result: &NotificationResult) {
    counter!("notifications_sent_total", "result" => result.as_label()).increment(1);
}
