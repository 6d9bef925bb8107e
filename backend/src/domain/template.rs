//! Template aggregate: a titled bundle of snippets with one thumbnail snippet,
//! a category and a set of tags.
//!
//! Types here are plain values. Rows are loaded and stored explicitly through
//! [`crate::domain::ports::TemplateRepository`]; nothing is lazily fetched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, CategorySummary, MemberId, TagId, TagName};

mod snippet;

pub use snippet::{
    FILENAME_MAX, Filename, Ordinal, Snippet, SnippetDraft, SnippetEdit, SnippetId,
    ensure_unique_ordinals,
};

/// Maximum allowed length for a template title.
pub const TITLE_MAX: usize = 255;

/// Validation failures raised while assembling template writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateValidationError {
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Upper bound in characters.
        max: usize,
    },
    /// Filename was blank.
    #[error("filename must not be empty")]
    EmptyFilename,
    /// Filename exceeded [`FILENAME_MAX`] characters.
    #[error("filename must be at most {max} characters")]
    FilenameTooLong {
        /// Upper bound in characters.
        max: usize,
    },
    /// A template must keep at least one snippet.
    #[error("a template needs at least one snippet")]
    NoSnippets,
    /// Two snippets share an ordinal.
    #[error("snippet ordinal {ordinal} is used more than once")]
    DuplicateOrdinal {
        /// Offending ordinal.
        ordinal: i32,
    },
    /// The declared thumbnail ordinal matches no snippet.
    #[error("thumbnail ordinal {ordinal} does not match any snippet")]
    UnknownThumbnailOrdinal {
        /// Offending ordinal.
        ordinal: i32,
    },
}

impl TemplateValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyFilename | Self::FilenameTooLong { .. } => "filename",
            Self::NoSnippets | Self::DuplicateOrdinal { .. } => "snippets",
            Self::UnknownThumbnailOrdinal { .. } => "thumbnailOrdinal",
        }
    }
}

/// Database identifier of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(i64);

impl TemplateId {
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

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty template title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateTitle(String);

impl TemplateTitle {
    /// Validate and construct a [`TemplateTitle`]. Whitespace is trimmed.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TemplateValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TemplateValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(TemplateValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TemplateTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TemplateTitle> for String {
    fn from(value: TemplateTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TemplateTitle {
    type Error = TemplateValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Template row without its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Template identifier.
    pub id: TemplateId,
    /// Owning member.
    pub member_id: MemberId,
    /// Category the template is filed under.
    pub category_id: CategoryId,
    /// Title.
    pub title: TemplateTitle,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
}

impl Template {
    /// Whether `member` owns this template.
    #[must_use]
    pub fn is_owned_by(&self, member: MemberId) -> bool {
        self.member_id == member
    }
}

/// Snippet designated to represent a template in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSnippet {
    /// Snippet identifier.
    pub snippet_id: SnippetId,
    /// Snippet filename.
    pub filename: String,
    /// Snippet content.
    pub content: String,
}

/// Listing projection: never includes the full snippet list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    /// Template identifier.
    pub id: TemplateId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category the template is filed under.
    pub category: CategorySummary,
    /// Tag names ordered alphabetically.
    pub tags: Vec<String>,
    /// Thumbnail snippet, absent only for rows written outside the service.
    pub thumbnail: Option<ThumbnailSnippet>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
}

/// Full owner-facing view of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDetail {
    /// Template row.
    pub template: Template,
    /// Category summary.
    pub category: CategorySummary,
    /// Snippets ordered by ordinal.
    pub snippets: Vec<Snippet>,
    /// Tag names ordered alphabetically.
    pub tags: Vec<String>,
    /// Thumbnail snippet identifier.
    pub thumbnail_snippet_id: Option<SnippetId>,
}

/// Fully validated template ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplate {
    /// Owning member.
    pub member_id: MemberId,
    /// Resolved category.
    pub category_id: CategoryId,
    /// Title.
    pub title: TemplateTitle,
    /// Description.
    pub description: String,
    /// Snippets to insert; non-empty with unique ordinals.
    pub snippets: Vec<SnippetDraft>,
    /// Ordinal of the snippet that becomes the thumbnail.
    pub thumbnail_ordinal: Ordinal,
    /// Deduplicated tag names.
    pub tags: Vec<TagName>,
}

/// Thumbnail target after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailChoice {
    /// A snippet that already exists and survives the update.
    Existing(SnippetId),
    /// A snippet inserted by the update, identified by its ordinal.
    New(Ordinal),
}

/// Fully validated update applied in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateChanges {
    /// Template being updated.
    pub template_id: TemplateId,
    /// Replacement category.
    pub category_id: CategoryId,
    /// Replacement title.
    pub title: TemplateTitle,
    /// Replacement description.
    pub description: String,
    /// Snippets to insert.
    pub new_snippets: Vec<SnippetDraft>,
    /// Snippets to edit in place.
    pub edited_snippets: Vec<SnippetEdit>,
    /// Snippets to delete.
    pub deleted_snippet_ids: Vec<SnippetId>,
    /// Thumbnail after the update.
    pub thumbnail: ThumbnailChoice,
    /// Complete replacement tag set.
    pub tags: Vec<TagName>,
}

/// Filters for the paginated listing. Both restrictions are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Require every one of these tags.
    pub tag_ids: Vec<TagId>,
}

#[cfg(test)]
mod tests;
