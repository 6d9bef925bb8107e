//! Port for template aggregate persistence and listing queries.
//!
//! Writes (`create`, `update`, `delete`) each run in a single transaction
//! covering the template row, snippets, thumbnail pointer and tag
//! associations.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    NewTemplate, Template, TemplateChanges, TemplateDetail, TemplateFilter, TemplateId,
    TemplateSummary,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by template repository adapters.
    pub enum TemplateRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "template repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "template repository query failed: {message}",
        /// A row addressed by the write no longer exists; the transaction was
        /// rolled back.
        Missing { message: String } =>
            "template repository row missing: {message}",
    }
}

/// Port for reading and writing templates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Insert a template with its snippets, thumbnail and tags.
    async fn create(&self, template: &NewTemplate) -> Result<TemplateId, TemplateRepositoryError>;

    /// Find the template row by id.
    async fn find_by_id(&self, id: TemplateId)
    -> Result<Option<Template>, TemplateRepositoryError>;

    /// Load the template with snippets, tags and thumbnail.
    async fn find_detail(
        &self,
        id: TemplateId,
    ) -> Result<Option<TemplateDetail>, TemplateRepositoryError>;

    /// Every template as a summary, ordered by id.
    async fn list_all(&self) -> Result<Vec<TemplateSummary>, TemplateRepositoryError>;

    /// One page of summaries matching `filter`, ordered by id.
    async fn find_page(
        &self,
        filter: &TemplateFilter,
        request: PageRequest,
    ) -> Result<Page<TemplateSummary>, TemplateRepositoryError>;

    /// Apply a validated update.
    async fn update(&self, changes: &TemplateChanges) -> Result<(), TemplateRepositoryError>;

    /// Delete the template and its children. Returns `false` when no row
    /// matched.
    async fn delete(&self, id: TemplateId) -> Result<bool, TemplateRepositoryError>;
}

/// Fixture implementation with no stored templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTemplateRepository;

#[async_trait]
impl TemplateRepository for FixtureTemplateRepository {
    async fn create(&self, _template: &NewTemplate) -> Result<TemplateId, TemplateRepositoryError> {
        Ok(TemplateId::new(1))
    }

    async fn find_by_id(
        &self,
        _id: TemplateId,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        Ok(None)
    }

    async fn find_detail(
        &self,
        _id: TemplateId,
    ) -> Result<Option<TemplateDetail>, TemplateRepositoryError> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<TemplateSummary>, TemplateRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_page(
        &self,
        _filter: &TemplateFilter,
        request: PageRequest,
    ) -> Result<Page<TemplateSummary>, TemplateRepositoryError> {
        Ok(Page::empty(request))
    }

    async fn update(&self, _changes: &TemplateChanges) -> Result<(), TemplateRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: TemplateId) -> Result<bool, TemplateRepositoryError> {
        Ok(false)
    }
}
