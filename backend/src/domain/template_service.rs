//! Template aggregate services.
//!
//! The service owns the aggregate rules that span rows: a template keeps at
//! least one snippet, snippet ordinals are unique, the thumbnail always
//! points at a surviving snippet, and only the owner may read the detail view
//! or change the template. Persistence of one write happens in a single
//! repository transaction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::debug;

use crate::domain::category_service::{ensure_default_category, map_category_repository_error};
use crate::domain::ports::{
    CategoryRepository, CreateTemplateRequest, TagRepository, TagRepositoryError,
    TemplateCommand, TemplatePageRequest, TemplateQuery, TemplateRepository,
    TemplateRepositoryError, UpdateTemplateRequest,
};
use crate::domain::{
    CategoryId, Error, FetchOrNotFound, MemberId, NewTemplate, Ordinal, SnippetDraft, SnippetId,
    TagName, TemplateChanges, TemplateDetail, TemplateFilter, TemplateId, TemplateSummary,
    TemplateValidationError, ThumbnailChoice, ensure_unique_ordinals,
};

fn map_template_repository_error(error: TemplateRepositoryError) -> Error {
    match error {
        TemplateRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("template repository unavailable: {message}"))
        }
        TemplateRepositoryError::Query { message } => {
            Error::internal(format!("template repository error: {message}"))
        }
        TemplateRepositoryError::Missing { message } => Error::not_found(message),
    }
}

fn map_tag_repository_error(error: TagRepositoryError) -> Error {
    match error {
        TagRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tag repository unavailable: {message}"))
        }
        TagRepositoryError::Query { message } => {
            Error::internal(format!("tag repository error: {message}"))
        }
    }
}

fn validation_error(error: &TemplateValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

fn unique_tags(tags: Vec<TagName>) -> Vec<TagName> {
    let mut seen = BTreeSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

fn resolve_create_thumbnail(
    snippets: &[SnippetDraft],
    declared: Option<Ordinal>,
) -> Result<Ordinal, TemplateValidationError> {
    let first = snippets
        .first()
        .map(|snippet| snippet.ordinal)
        .ok_or(TemplateValidationError::NoSnippets)?;
    match declared {
        None => Ok(first),
        Some(ordinal) if snippets.iter().any(|snippet| snippet.ordinal == ordinal) => Ok(ordinal),
        Some(ordinal) => Err(TemplateValidationError::UnknownThumbnailOrdinal {
            ordinal: ordinal.get(),
        }),
    }
}

/// Outcome of applying snippet deltas to the stored snippet set.
struct SnippetPlan {
    surviving: BTreeMap<SnippetId, Ordinal>,
    thumbnail: ThumbnailChoice,
}

fn plan_snippets(
    detail: &TemplateDetail,
    request: &UpdateTemplateRequest,
) -> Result<SnippetPlan, Error> {
    let mut surviving: BTreeMap<SnippetId, Ordinal> = detail
        .snippets
        .iter()
        .map(|snippet| (snippet.id, snippet.ordinal))
        .collect();

    for id in &request.deleted_snippet_ids {
        if surviving.remove(id).is_none() {
            return Err(Error::not_found(format!("snippet {id} not found")));
        }
    }
    for edit in &request.updated_snippets {
        if request.deleted_snippet_ids.contains(&edit.id) {
            return Err(Error::invalid_request(format!(
                "snippet {} cannot be edited and deleted in one update",
                edit.id
            ))
            .with_details(json!({ "field": "updatedSnippets" })));
        }
        match surviving.get_mut(&edit.id) {
            Some(ordinal) => *ordinal = edit.ordinal,
            None => return Err(Error::not_found(format!("snippet {} not found", edit.id))),
        }
    }

    let ordinals = surviving
        .values()
        .copied()
        .chain(request.new_snippets.iter().map(|snippet| snippet.ordinal));
    ensure_unique_ordinals(ordinals).map_err(|err| validation_error(&err))?;
    if surviving.is_empty() && request.new_snippets.is_empty() {
        return Err(validation_error(&TemplateValidationError::NoSnippets));
    }

    let thumbnail = request
        .thumbnail_snippet_id
        .filter(|id| surviving.contains_key(id))
        .or_else(|| {
            detail
                .thumbnail_snippet_id
                .filter(|id| surviving.contains_key(id))
        })
        .map(ThumbnailChoice::Existing)
        .map_or_else(|| lowest_ordinal(&surviving, &request.new_snippets), Ok)?;

    Ok(SnippetPlan {
        surviving,
        thumbnail,
    })
}

fn lowest_ordinal(
    surviving: &BTreeMap<SnippetId, Ordinal>,
    new_snippets: &[SnippetDraft],
) -> Result<ThumbnailChoice, Error> {
    let existing = surviving
        .iter()
        .map(|(id, ordinal)| (*ordinal, ThumbnailChoice::Existing(*id)));
    let inserted = new_snippets
        .iter()
        .map(|snippet| (snippet.ordinal, ThumbnailChoice::New(snippet.ordinal)));
    existing
        .chain(inserted)
        .min_by_key(|(ordinal, _)| *ordinal)
        .map(|(_, choice)| choice)
        .ok_or_else(|| validation_error(&TemplateValidationError::NoSnippets))
}

/// Template service implementing the template driving ports.
#[derive(Clone)]
pub struct TemplateService<T, C, G> {
    template_repo: Arc<T>,
    category_repo: Arc<C>,
    tag_repo: Arc<G>,
}

impl<T, C, G> TemplateService<T, C, G> {
    /// Create a new service over the template, category and tag repositories.
    pub fn new(template_repo: Arc<T>, category_repo: Arc<C>, tag_repo: Arc<G>) -> Self {
        Self {
            template_repo,
            category_repo,
            tag_repo,
        }
    }
}

impl<T, C, G> TemplateService<T, C, G>
where
    T: TemplateRepository,
    C: CategoryRepository,
    G: TagRepository,
{
    async fn resolve_category(
        &self,
        member_id: MemberId,
        category_id: Option<CategoryId>,
    ) -> Result<CategoryId, Error> {
        let Some(id) = category_id else {
            return ensure_default_category(self.category_repo.as_ref(), member_id)
                .await
                .map(|category| category.id());
        };
        let category = self
            .category_repo
            .find_by_id(id)
            .await
            .map_err(map_category_repository_error)
            .or_not_found(|| format!("category {id} not found"))?;
        if !category.is_owned_by(member_id) {
            return Err(Error::forbidden("category belongs to another member"));
        }
        Ok(category.id())
    }

    async fn load_owned_detail(
        &self,
        member_id: MemberId,
        id: TemplateId,
    ) -> Result<TemplateDetail, Error> {
        let detail = self
            .template_repo
            .find_detail(id)
            .await
            .map_err(map_template_repository_error)
            .or_not_found(|| format!("template {id} not found"))?;
        if !detail.template.is_owned_by(member_id) {
            return Err(Error::forbidden("template belongs to another member"));
        }
        Ok(detail)
    }
}

#[async_trait]
impl<T, C, G> TemplateCommand for TemplateService<T, C, G>
where
    T: TemplateRepository,
    C: CategoryRepository,
    G: TagRepository,
{
    async fn create(&self, request: CreateTemplateRequest) -> Result<TemplateId, Error> {
        let CreateTemplateRequest {
            member_id,
            category_id,
            title,
            description,
            snippets,
            thumbnail_ordinal,
            tags,
        } = request;

        ensure_unique_ordinals(snippets.iter().map(|snippet| snippet.ordinal))
            .map_err(|err| validation_error(&err))?;
        let thumbnail_ordinal = resolve_create_thumbnail(&snippets, thumbnail_ordinal)
            .map_err(|err| validation_error(&err))?;
        let category_id = self.resolve_category(member_id, category_id).await?;

        let template = NewTemplate {
            member_id,
            category_id,
            title,
            description,
            snippets,
            thumbnail_ordinal,
            tags: unique_tags(tags),
        };
        let id = self
            .template_repo
            .create(&template)
            .await
            .map_err(map_template_repository_error)?;
        debug!(template_id = %id, member_id = %member_id, "template created");
        Ok(id)
    }

    async fn update(&self, request: UpdateTemplateRequest) -> Result<(), Error> {
        let detail = self
            .load_owned_detail(request.member_id, request.template_id)
            .await?;
        let category_id = self
            .resolve_category(request.member_id, request.category_id)
            .await?;
        let plan = plan_snippets(&detail, &request)?;
        debug!(
            template_id = %request.template_id,
            kept = plan.surviving.len(),
            added = request.new_snippets.len(),
            "template snippets planned"
        );

        let changes = TemplateChanges {
            template_id: request.template_id,
            category_id,
            title: request.title,
            description: request.description,
            new_snippets: request.new_snippets,
            edited_snippets: request.updated_snippets,
            deleted_snippet_ids: request.deleted_snippet_ids,
            thumbnail: plan.thumbnail,
            tags: unique_tags(request.tags),
        };
        self.template_repo
            .update(&changes)
            .await
            .map_err(map_template_repository_error)
    }

    async fn delete(&self, member_id: MemberId, id: TemplateId) -> Result<(), Error> {
        let template = self
            .template_repo
            .find_by_id(id)
            .await
            .map_err(map_template_repository_error)
            .or_not_found(|| format!("template {id} not found"))?;
        if !template.is_owned_by(member_id) {
            return Err(Error::forbidden("template belongs to another member"));
        }

        let deleted = self
            .template_repo
            .delete(id)
            .await
            .map_err(map_template_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("template {id} not found")));
        }
        debug!(template_id = %id, "template deleted");
        Ok(())
    }
}

#[async_trait]
impl<T, C, G> TemplateQuery for TemplateService<T, C, G>
where
    T: TemplateRepository,
    C: CategoryRepository,
    G: TagRepository,
{
    async fn explore(&self) -> Result<Vec<TemplateSummary>, Error> {
        self.template_repo
            .list_all()
            .await
            .map_err(map_template_repository_error)
    }

    async fn find_page(
        &self,
        request: TemplatePageRequest,
    ) -> Result<Page<TemplateSummary>, Error> {
        let TemplatePageRequest {
            page,
            category_id,
            tags,
        } = request;
        let tags = unique_tags(tags);

        let mut tag_ids = Vec::with_capacity(tags.len());
        if !tags.is_empty() {
            let found = self
                .tag_repo
                .find_by_names(&tags)
                .await
                .map_err(map_tag_repository_error)?;
            // An unknown tag can never be matched, so nothing can satisfy
            // the all-tags filter.
            if found.len() < tags.len() {
                return Ok(Page::empty(page));
            }
            tag_ids.extend(found.into_iter().map(|tag| tag.id));
        }

        let filter = TemplateFilter {
            category_id,
            tag_ids,
        };
        self.template_repo
            .find_page(&filter, page)
            .await
            .map_err(map_template_repository_error)
    }

    async fn find_owned(
        &self,
        member_id: MemberId,
        id: TemplateId,
    ) -> Result<TemplateDetail, Error> {
        self.load_owned_detail(member_id, id).await
    }
}

#[cfg(test)]
#[path = "template_service_tests.rs"]
mod tests;
