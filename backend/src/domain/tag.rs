//! Free-text tags shared by every member.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum allowed length for a tag name.
pub const TAG_NAME_MAX: usize = 30;

/// Validation errors for tag names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagValidationError {
    /// Name was blank.
    #[error("tag name must not be empty")]
    EmptyName,
    /// Name exceeded [`TAG_NAME_MAX`] characters.
    #[error("tag name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound in characters.
        max: usize,
    },
}

/// Database identifier of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(i64);

impl TagId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed tag name. Tags are matched by exact name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Validate and construct a [`TagName`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        if trimmed.chars().count() > TAG_NAME_MAX {
            return Err(TagValidationError::NameTooLong { max: TAG_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Validate a batch of raw names, dropping duplicates while keeping the
    /// first-seen order.
    pub fn parse_unique<I, S>(values: I) -> Result<Vec<Self>, TagValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut names = Vec::new();
        for value in values {
            let name = Self::new(value)?;
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
        Ok(names)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

impl TryFrom<String> for TagName {
    type Error = TagValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag identifier.
    pub id: TagId,
    /// Tag name.
    pub name: TagName,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parse_unique_trims_and_deduplicates() {
        let names = TagName::parse_unique([" rust", "web", "rust ", "web"]).expect("valid tags");
        let raw: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        assert_eq!(raw, vec!["rust", "web"]);
    }

    #[rstest]
    #[case("", TagValidationError::EmptyName)]
    #[case("   ", TagValidationError::EmptyName)]
    fn blank_names_are_rejected(#[case] raw: &str, #[case] expected: TagValidationError) {
        assert_eq!(TagName::new(raw), Err(expected));
    }

    #[rstest]
    fn length_is_counted_after_trimming() {
        let padded = format!("  {}  ", "t".repeat(TAG_NAME_MAX));
        assert!(TagName::new(padded).is_ok());
        assert_eq!(
            TagName::new("t".repeat(TAG_NAME_MAX + 1)),
            Err(TagValidationError::NameTooLong { max: TAG_NAME_MAX })
        );
    }

    #[rstest]
    fn parse_unique_fails_on_first_invalid_name() {
        let err = TagName::parse_unique(["ok", " "]).expect_err("blank tag");
        assert_eq!(err, TagValidationError::EmptyName);
    }
}
