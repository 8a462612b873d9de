//! Sprint domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A unit of coursework whose completion is celebrated.
///
/// Both `code` and `title` are unique across all sprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: i64,
    pub code: String,
    pub title: String,
}

/// Request payload for creating a sprint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSprintRequest {
    #[validate(length(min = 1, max = 100, message = "Sprint code must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub code: String,

    #[validate(length(min = 1, max = 500, message = "Sprint title must be 1-500 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,
}

/// Request payload for updating a sprint (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSprintRequest {
    #[validate(length(min = 1, max = 100, message = "Sprint code must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Sprint title must be 1-500 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: Option<String>,
}

impl UpdateSprintRequest {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.title.is_none()
    }
}
