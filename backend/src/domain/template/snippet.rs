//! Snippets: the file-like units stored inside a template.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::TemplateValidationError;

/// Maximum allowed length for a snippet filename.
pub const FILENAME_MAX: usize = 255;

/// Database identifier of a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(i64);

impl SnippetId {
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

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Explicit position of a snippet within its template.
///
/// Ordinals need not be contiguous but are unique per template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ordinal(i32);

impl Ordinal {
    /// Wrap a raw ordinal.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw ordinal value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Non-empty snippet filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Filename(String);

impl Filename {
    /// Validate and construct a [`Filename`]. Whitespace is trimmed.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TemplateValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TemplateValidationError::EmptyFilename);
        }
        if trimmed.chars().count() > FILENAME_MAX {
            return Err(TemplateValidationError::FilenameTooLong { max: FILENAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Filename {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Filename> for String {
    fn from(value: Filename) -> Self {
        value.0
    }
}

impl TryFrom<String> for Filename {
    type Error = TemplateValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Snippet contents that have not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetDraft {
    /// File name shown to readers.
    pub filename: Filename,
    /// Raw file content.
    pub content: String,
    /// Position within the template.
    pub ordinal: Ordinal,
}

/// In-place replacement of an existing snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetEdit {
    /// Snippet being edited.
    pub id: SnippetId,
    /// Replacement file name.
    pub filename: Filename,
    /// Replacement content.
    pub content: String,
    /// Replacement position.
    pub ordinal: Ordinal,
}

/// Persisted snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Snippet identifier.
    pub id: SnippetId,
    /// File name shown to readers.
    pub filename: Filename,
    /// Raw file content.
    pub content: String,
    /// Position within the template.
    pub ordinal: Ordinal,
}

/// Reject ordinal collisions within one template.
pub fn ensure_unique_ordinals<I>(ordinals: I) -> Result<(), TemplateValidationError>
where
    I: IntoIterator<Item = Ordinal>,
{
    let mut seen = BTreeSet::new();
    for ordinal in ordinals {
        if !seen.insert(ordinal) {
            return Err(TemplateValidationError::DuplicateOrdinal {
                ordinal: ordinal.get(),
            });
        }
    }
    Ok(())
}
