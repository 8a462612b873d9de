//! Message template domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Message text containing `{username}`, `{title}`, `{praise}` and `{emoji}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub text: String,
}

/// Request payload for creating a template.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(length(min = 10, max = 500, message = "Template must be 10-500 characters"))]
    #[validate(custom(function = "shared::validation::validate_template_placeholders"))]
    pub text: String,
}

/// Request payload for updating a template (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 10, max = 500, message = "Template must be 10-500 characters"))]
    #[validate(custom(function = "shared::validation::validate_template_placeholders"))]
    pub text: Option<String>,
}

impl UpdateTemplateRequest {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_requires_placeholders() {
        let ok = CreateTemplateRequest {
            text: "Well done {username}, {title} is behind you! {praise} {emoji}".to_string(),
        };
        assert!(ok.validate().is_ok());

        let missing = CreateTemplateRequest {
            text: "Well done {username}, {title} is behind you!".to_string(),
        };
        let errors = missing.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("text"));
    }

    #[test]
    fn test_update_template_validates_when_present() {
        let request = UpdateTemplateRequest {
            text: Some("no placeholders here".to_string()),
        };
        assert!(request.validate().is_err());

        let empty = UpdateTemplateRequest::default();
        assert!(empty.validate().is_ok());
        assert!(empty.is_empty());
    }
}
