//! Praise domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A reusable encouraging phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Praise {
    pub id: i64,
    pub text: String,
}

/// Request payload for creating a praise.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePraiseRequest {
    #[validate(length(min = 10, max = 500, message = "Praise must be 10-500 characters"))]
    pub text: String,
}

/// Request payload for updating a praise (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePraiseRequest {
    #[validate(length(min = 10, max = 500, message = "Praise must be 10-500 characters"))]
    pub text: Option<String>,
}

impl UpdatePraiseRequest {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}
