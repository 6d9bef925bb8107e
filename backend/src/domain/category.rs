//! Member-owned template categories.
//!
//! Every member has exactly one default category which templates fall back to
//! when created without an explicit category. It is created lazily.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::MemberId;

/// Name given to each member's default category.
pub const DEFAULT_CATEGORY_NAME: &str = "Uncategorized";
/// Maximum allowed length for a category name.
pub const CATEGORY_NAME_MAX: usize = 255;

/// Validation errors for category names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    /// Name was blank.
    #[error("category name must not be empty")]
    EmptyName,
    /// Name exceeded [`CATEGORY_NAME_MAX`] characters.
    #[error("category name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound in characters.
        max: usize,
    },
}

/// Database identifier of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
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

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed, non-empty category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate and construct a [`CategoryName`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, CategoryValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if trimmed.chars().count() > CATEGORY_NAME_MAX {
            return Err(CategoryValidationError::NameTooLong {
                max: CATEGORY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Name of the default category.
    #[must_use]
    pub fn default_name() -> Self {
        Self(DEFAULT_CATEGORY_NAME.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CategoryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    member_id: MemberId,
    name: CategoryName,
    is_default: bool,
}

impl Category {
    /// Assemble a category from stored parts.
    #[must_use]
    pub const fn new(id: CategoryId, member_id: MemberId, name: CategoryName, is_default: bool) -> Self {
        Self {
            id,
            member_id,
            name,
            is_default,
        }
    }

    /// Category identifier.
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Owning member.
    #[must_use]
    pub const fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &CategoryName {
        &self.name
    }

    /// Whether this is the member's fallback category.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// Whether `member` owns this category.
    #[must_use]
    pub fn is_owned_by(&self, member: MemberId) -> bool {
        self.member_id == member
    }
}

/// Lightweight category projection embedded in template summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Rust  ", "Rust")]
    #[case("Web", "Web")]
    fn names_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
        let name = CategoryName::new(raw).expect("valid name");
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    fn blank_and_long_names_are_rejected() {
        assert_eq!(
            CategoryName::new("   "),
            Err(CategoryValidationError::EmptyName)
        );
        assert_eq!(
            CategoryName::new("c".repeat(CATEGORY_NAME_MAX + 1)),
            Err(CategoryValidationError::NameTooLong {
                max: CATEGORY_NAME_MAX
            })
        );
    }

    #[rstest]
    fn ownership_compares_member_ids() {
        let category = Category::new(
            CategoryId::new(3),
            MemberId::new(1),
            CategoryName::default_name(),
            true,
        );
        assert!(category.is_owned_by(MemberId::new(1)));
        assert!(!category.is_owned_by(MemberId::new(2)));
        assert_eq!(category.name().as_ref(), DEFAULT_CATEGORY_NAME);
    }
}
