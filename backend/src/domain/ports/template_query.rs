//! Driving port for template reads: explore listing, filtered pages and the
//! owner-scoped detail view.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    CategoryId, Error, MemberId, TagName, TemplateDetail, TemplateId, TemplateSummary,
};

/// Filtered page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePageRequest {
    /// Page index and size.
    pub page: PageRequest,
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Require every one of these tags.
    pub tags: Vec<TagName>,
}

/// Driving port for template read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateQuery: Send + Sync {
    /// Every template as a summary, ordered by id.
    async fn explore(&self) -> Result<Vec<TemplateSummary>, Error>;

    /// One page of templates matching the category and all requested tags.
    async fn find_page(
        &self,
        request: TemplatePageRequest,
    ) -> Result<Page<TemplateSummary>, Error>;

    /// Full detail of a template the caller owns.
    async fn find_owned(&self, member_id: MemberId, id: TemplateId)
    -> Result<TemplateDetail, Error>;
}

/// Fixture query with no stored templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTemplateQuery;

#[async_trait]
impl TemplateQuery for FixtureTemplateQuery {
    async fn explore(&self) -> Result<Vec<TemplateSummary>, Error> {
        Ok(Vec::new())
    }

    async fn find_page(
        &self,
        request: TemplatePageRequest,
    ) -> Result<Page<TemplateSummary>, Error> {
        Ok(Page::empty(request.page))
    }

    async fn find_owned(
        &self,
        _member_id: MemberId,
        id: TemplateId,
    ) -> Result<TemplateDetail, Error> {
        Err(Error::not_found(format!("template {id} not found")))
    }
}
