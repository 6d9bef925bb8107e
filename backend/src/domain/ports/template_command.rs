//! Driving port for template mutations.
//!
//! Requests carry field-level validated values; the service enforces the
//! aggregate rules (snippet count, ordinal uniqueness, thumbnail resolution,
//! ownership).

use async_trait::async_trait;

use crate::domain::{
    CategoryId, Error, MemberId, Ordinal, SnippetDraft, SnippetEdit, SnippetId, TagName,
    TemplateId, TemplateTitle,
};

/// Request to create a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTemplateRequest {
    /// Authenticated caller.
    pub member_id: MemberId,
    /// Target category; the caller's default category when absent.
    pub category_id: Option<CategoryId>,
    /// Title.
    pub title: TemplateTitle,
    /// Description.
    pub description: String,
    /// Snippets to store.
    pub snippets: Vec<SnippetDraft>,
    /// Ordinal of the thumbnail snippet; the first snippet when absent.
    pub thumbnail_ordinal: Option<Ordinal>,
    /// Raw tag names, trimmed and de-duplicated by the service.
    pub tags: Vec<TagName>,
}

/// Request to update a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTemplateRequest {
    /// Authenticated caller.
    pub member_id: MemberId,
    /// Template being updated.
    pub template_id: TemplateId,
    /// Replacement category; the caller's default category when absent.
    pub category_id: Option<CategoryId>,
    /// Replacement title.
    pub title: TemplateTitle,
    /// Replacement description.
    pub description: String,
    /// Snippets to add.
    pub new_snippets: Vec<SnippetDraft>,
    /// Snippets to edit in place.
    pub updated_snippets: Vec<SnippetEdit>,
    /// Snippets to remove.
    pub deleted_snippet_ids: Vec<SnippetId>,
    /// Preferred thumbnail snippet.
    pub thumbnail_snippet_id: Option<SnippetId>,
    /// Replacement tag list.
    pub tags: Vec<TagName>,
}

/// Driving port for template write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateCommand: Send + Sync {
    /// Create a template and return its id.
    async fn create(&self, request: CreateTemplateRequest) -> Result<TemplateId, Error>;

    /// Apply an owner-scoped update.
    async fn update(&self, request: UpdateTemplateRequest) -> Result<(), Error>;

    /// Delete an owned template with its snippets, thumbnail and tags.
    async fn delete(&self, member_id: MemberId, id: TemplateId) -> Result<(), Error>;
}

/// Fixture command without persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTemplateCommand;

#[async_trait]
impl TemplateCommand for FixtureTemplateCommand {
    async fn create(&self, _request: CreateTemplateRequest) -> Result<TemplateId, Error> {
        Ok(TemplateId::new(1))
    }

    async fn update(&self, request: UpdateTemplateRequest) -> Result<(), Error> {
        Err(Error::not_found(format!(
            "template {} not found",
            request.template_id
        )))
    }

    async fn delete(&self, _member_id: MemberId, id: TemplateId) -> Result<(), Error> {
        Err(Error::not_found(format!("template {id} not found")))
    }
}
