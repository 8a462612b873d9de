//! Discord chat integration.
//!
//! Implements the Notifier trait on top of the Discord REST API: composed
//! messages are posted to a configured channel and usernames can be turned
//! into `<@id>` mentions by searching the guild's member list.

use std::time::Duration;

use domain::services::{NotificationResult, Notifier};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::DiscordConfig;

/// Discord caps message content at 2000 characters.
const MAX_CONTENT_CHARS: usize = 2000;

/// Number of guild members requested per search.
const MEMBER_SEARCH_LIMIT: u32 = 10;

const BASE_BACKOFF_MS: u64 = 100;

/// Backoff stops doubling after this many retries (6.4s).
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Discord notifier using the bot REST API.
pub struct DiscordNotifier {
    client: Client,
    config: DiscordConfig,
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
    allowed_mentions: AllowedMentions,
}

#[derive(Debug, Serialize)]
struct AllowedMentions {
    parse: [&'static str; 1],
}

/// Guild member as returned by the member search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildMember {
    pub user: DiscordUser,
    #[serde(default)]
    pub nick: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

/// Error type for Discord operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Discord API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Discord is not enabled")]
    NotEnabled,
}

impl DiscordNotifier {
    /// Create a new Discord notifier.
    ///
    /// # Errors
    /// Returns an error if Discord is disabled or the HTTP client cannot be built.
    pub fn new(config: DiscordConfig) -> Result<Self, DiscordError> {
        if !config.enabled {
            return Err(DiscordError::NotEnabled);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.config.bot_token)
    }

    /// Post a message to the configured channel, retrying on 5xx and transport errors.
    async fn post_message(&self, text: &str) -> Result<(), DiscordError> {
        let url = self.url(&format!("/channels/{}/messages", self.config.channel_id));
        let content = truncate_content(text);
        let body = CreateMessage {
            content: &content,
            allowed_mentions: AllowedMentions { parse: ["users"] },
        };

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(retry_backoff(attempt)).await;
            }

            let response = self
                .client
                .post(&url)
                .header(reqwest::header::AUTHORIZATION, self.auth_header())
                .json(&body)
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(attempt = %attempt, "Discord message sent");
                    return Ok(());
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    let error = DiscordError::ApiError {
                        status: status.as_u16(),
                        body,
                    };
                    if status.is_server_error() {
                        last_error = Some(error);
                        continue;
                    }
                    return Err(error);
                }
                Err(e) => {
                    last_error = Some(DiscordError::HttpError(e));
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or(DiscordError::ApiError {
            status: 0,
            body: "Unknown error".to_string(),
        }))
    }

    /// Search guild members whose username or nickname starts with `query`.
    async fn search_members(&self, query: &str) -> Result<Vec<GuildMember>, DiscordError> {
        let url = self.url(&format!("/guilds/{}/members/search", self.config.guild_id));
        let limit = MEMBER_SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .query(&[("query", query), ("limit", limit.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::ApiError { status, body });
        }

        Ok(response.json().await?)
    }
}

/// Pick the member whose global display name or username equals `display_name`.
///
/// Global display name matches win over username matches.
pub fn find_mention(members: &[GuildMember], display_name: &str) -> Option<String> {
    members
        .iter()
        .find(|m| m.user.global_name.as_deref() == Some(display_name))
        .or_else(|| members.iter().find(|m| m.user.username == display_name))
        .map(|m| format!("<@{}>", m.user.id))
}

/// Exponential backoff before retry `attempt`: 100ms, 200ms, 400ms, etc.
fn retry_backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
    Duration::from_millis(BASE_BACKOFF_MS << exponent)
}

fn truncate_content(text: &str) -> String {
    text.chars().take(MAX_CONTENT_CHARS).collect()
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send_message(&self, text: &str) -> NotificationResult {
        match self.post_message(text).await {
            Ok(()) => {
                tracing::info!(
                    channel_id = %self.config.channel_id,
                    "Discord message sent"
                );
                NotificationResult::Sent
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    channel_id = %self.config.channel_id,
                    "Failed to send Discord message"
                );
                NotificationResult::Failed(e.to_string())
            }
        }
    }

    async fn resolve_mention_handle(&self, display_name: &str) -> Option<String> {
        match self.search_members(display_name).await {
            Ok(members) => find_mention(&members, display_name),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    display_name = %display_name,
                    "Discord member lookup failed"
                );
                None
            }
        }
    }
}
