//! Emoji domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emoji {
    pub id: i64,
    pub glyph: String,
}

/// Request payload for creating an emoji.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmojiRequest {
    #[validate(length(min = 1, max = 5, message = "Emoji must be 1-5 characters"))]
    pub glyph: String,
}

/// Request payload for updating an emoji (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmojiRequest {
    #[validate(length(min = 1, max = 5, message = "Emoji must be 1-5 characters"))]
    pub glyph: Option<String>,
}

impl UpdateEmojiRequest {
    pub fn is_empty(&self) -> bool {
        self.glyph.is_none()
    }
}
