//! Placeholder substitution for message templates.
//!
//! Templates contain bracketed placeholders such as `{username}` or
//! `{sprint_title}`. Keys are compared after normalization, so `sprint_title`,
//! `sprintTitle` and `SprintTitle` all address the same substitution value.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// A placeholder is `{` followed by anything except `{`, up to the first `}`.
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^{]*?)\}").unwrap();
}

/// Errors produced while rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("No placeholders were found in the template")]
    NoPlaceholdersFound,

    #[error("No substitution value for placeholder '{{{0}}}'")]
    MissingSubstitutionValue(String),
}

/// Normalizes a placeholder key for comparison.
///
/// Drops `_` and `-` separators and lowercases the rest, which makes snake_case,
/// kebab-case and camelCase spellings of a key equivalent.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Substitution values keyed by normalized placeholder key.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: HashMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, normalizing the key.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Looks up a value by any spelling of its key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Substitutions::new();
        for (key, value) in iter {
            subs.insert(key.as_ref(), value);
        }
        subs
    }
}

/// Returns the raw keys of all placeholders in `template`, in order of appearance.
pub fn placeholder_keys(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Renders `template` by replacing every placeholder with its substitution value.
///
/// Literal text between placeholders is copied unchanged. Repeated keys are
/// each replaced with the same value. Substituted values are never rescanned.
pub fn render(template: &str, substitutions: &Substitutions) -> Result<String, RenderError> {
    let mut output = String::with_capacity(template.len());
    let mut last_end = 0;
    let mut found = false;

    for caps in PLACEHOLDER.captures_iter(template) {
        found = true;
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let value = substitutions
            .get(key.as_str())
            .ok_or_else(|| RenderError::MissingSubstitutionValue(key.as_str().to_string()))?;

        output.push_str(&template[last_end..whole.start()]);
        output.push_str(value);
        last_end = whole.end();
    }

    if !found {
        return Err(RenderError::NoPlaceholdersFound);
    }

    output.push_str(&template[last_end..]);
    Ok(output)
}
