//! Congratulatory message domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A rendered congratulation for one user finishing one sprint.
///
/// `rendered_text` is a snapshot: later edits to the sprint title or the
/// template do not change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    pub sprint_id: i64,
    pub rendered_text: String,
    pub created_on: DateTime<Utc>,
}

/// Denormalized message row joined with its user and sprint, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: i64,
    pub user_id: i64,
    pub sprint_id: i64,
    pub username: String,
    pub sprint_code: String,
    pub sprint_title: String,
    pub rendered_text: String,
    pub created_on: DateTime<Utc>,
}

/// Request payload for composing a new message.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub sprint_code: String,
}

/// Request payload for editing a stored message.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message text must be 1-2000 characters"))]
    pub rendered_text: Option<String>,
}

impl UpdateMessageRequest {
    pub fn is_empty(&self) -> bool {
        self.rendered_text.is_none()
    }
}

/// Query parameters for listing messages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesQuery {
    pub username: Option<String>,
    /// Sprint code.
    pub sprint: Option<String>,
}
