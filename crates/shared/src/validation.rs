//! Common validation utilities.

use validator::ValidationError;

use crate::templating::{normalize_key, placeholder_keys};

/// Placeholder keys every message template must contain.
pub const REQUIRED_TEMPLATE_KEYS: [&str; 4] = ["username", "title", "praise", "emoji"];

/// Validates that a string contains something other than whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a template uses exactly the supported placeholders.
///
/// Every key in [`REQUIRED_TEMPLATE_KEYS`] must appear, and no other key may,
/// since composition only supplies values for those four. Keys are compared
/// after normalization, so `{Username}` satisfies the `{username}` requirement.
pub fn validate_template_placeholders(text: &str) -> Result<(), ValidationError> {
    let keys = placeholder_keys(text);
    let present: Vec<String> = keys.iter().map(|key| normalize_key(key)).collect();

    let missing: Vec<String> = REQUIRED_TEMPLATE_KEYS
        .iter()
        .filter(|required| !present.iter().any(|key| key == *required))
        .map(|k| format!("{{{}}}", k))
        .collect();

    let mut unknown: Vec<String> = Vec::new();
    for (raw, normalized) in keys.iter().zip(&present) {
        let placeholder = format!("{{{}}}", raw);
        if !REQUIRED_TEMPLATE_KEYS.contains(&normalized.as_str()) && !unknown.contains(&placeholder)
        {
            unknown.push(placeholder);
        }
    }

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("Template is missing placeholders: {}", missing.join(", ")));
    }
    if !unknown.is_empty() {
        problems.push(format!("Template has unknown placeholders: {}", unknown.join(", ")));
    }

    if problems.is_empty() {
        return Ok(());
    }

    let mut err = ValidationError::new("template_placeholders");
    err.message = Some(problems.join("; ").into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("vjuodz").is_ok());
        assert!(validate_not_blank(" x ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn test_validate_template_all_placeholders() {
        let text = "Congrats {username} on {title}! {praise} {emoji}";
        assert!(validate_template_placeholders(text).is_ok());
    }

    #[test]
    fn test_validate_template_any_order_and_case() {
        let text = "{Emoji} {PRAISE} -- {title} by {userName}";
        assert!(validate_template_placeholders(text).is_ok());
    }

    #[test]
    fn test_validate_template_missing_placeholder() {
        let err = validate_template_placeholders("Congrats {username} on {title}! {praise}")
            .unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Template is missing placeholders: {emoji}"
        );
    }

    #[test]
    fn test_validate_template_without_placeholders() {
        let err = validate_template_placeholders("No tokens at all").unwrap_err();
        let message = err.message.unwrap().to_string();
        assert!(message.contains("{username}"));
        assert!(message.contains("{emoji}"));
    }

    #[test]
    fn test_validate_template_unknown_placeholder() {
        let err = validate_template_placeholders(
            "{username} did {title} on {date}! {praise} {emoji} {Date}",
        )
        .unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Template has unknown placeholders: {date}, {Date}"
        );
    }

    #[test]
    fn test_validate_template_empty_placeholder() {
        let err = validate_template_placeholders("{username} {title} {praise} {emoji} {}")
            .unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Template has unknown placeholders: {}"
        );
    }

    #[test]
    fn test_validate_template_missing_and_unknown() {
        let err = validate_template_placeholders("{username} on {sprint}: {praise} {emoji}")
            .unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Template is missing placeholders: {title}; Template has unknown placeholders: {sprint}"
        );
    }

    #[test]
    fn test_validated_template_always_renders() {
        use crate::templating::{render, Substitutions};

        let text = "{EMOJI} {user_name} finished {Title}. {praise}";
        assert!(validate_template_placeholders(text).is_ok());

        let subs = Substitutions::new()
            .with("username", "ana")
            .with("title", "REST APIs")
            .with("praise", "Great work!")
            .with("emoji", "🎉");
        assert_eq!(
            render(text, &subs).unwrap(),
            "🎉 ana finished REST APIs. Great work!"
        );
    }
}
