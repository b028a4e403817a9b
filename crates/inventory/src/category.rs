//! Food category, auto-detected from the item name or typed by the user.

use serde::{Deserialize, Serialize};

use smartfood_core::{DomainError, DomainResult};

/// Keyword rules in priority order: the first rule with a keyword contained in
/// the lower-cased name wins.
const DETECTION_RULES: &[(&str, &[&str])] = &[
    ("fruit", &["apple", "banana"]),
    ("meat", &["chicken", "beef"]),
    ("dairy", &["milk"]),
    ("grain", &["bread", "rice"]),
];

pub const UNKNOWN: &str = "unknown";

/// A non-empty category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Detect a category from a free-text food name.
    ///
    /// Pure and total: unmatched names (including the empty string) map to
    /// `unknown`.
    pub fn detect(name: &str) -> Self {
        let lower = name.to_lowercase();
        let label = DETECTION_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(label, _)| *label)
            .unwrap_or(UNKNOWN);
        Self(label.to_string())
    }

    /// A category typed in by the user after rejecting the detected one.
    pub fn manual(text: &str) -> DomainResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("category must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::manual(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}
