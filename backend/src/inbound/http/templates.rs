//! Template API handlers.
//!
//! ```text
//! POST   /api/v1/templates
//! GET    /api/v1/templates
//! GET    /api/v1/templates?page=0&size=20&category=3&tags=rust,web
//! GET    /api/v1/templates/{id}
//! PUT    /api/v1/templates/{id}
//! DELETE /api/v1/templates/{id}
//! ```
//!
//! `GET /templates` without query parameters is the public explore list.
//! Any of `page`, `size`, `category` or `tags` switches to the paginated
//! listing, where `tags` is comma-separated and every listed tag must be
//! present on a template for it to match.

use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};
use serde::Deserialize;

use crate::domain::ports::{CreateTemplateRequest, TemplatePageRequest, UpdateTemplateRequest};
use crate::domain::{
    CategoryId, Error, Filename, Ordinal, SnippetDraft, SnippetEdit, SnippetId, TemplateId,
    TemplateSummary, TemplateTitle,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedMember;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_tag_filter, parse_tag_names, validate};

mod dto;

pub use dto::{
    CategorySummaryResponse, CreateTemplateRequestBody, CreatedTemplateResponse, ExploreResponse,
    SnippetBody, SnippetEditBody, SnippetResponse, TemplateDetailResponse, TemplateListResponse,
    TemplatePageResponse, TemplateSummaryResponse, ThumbnailResponse, UpdateTemplateRequestBody,
};

const TITLE: FieldName = FieldName::new("title");
const FILENAME: FieldName = FieldName::new("filename");
const TAGS: FieldName = FieldName::new("tags");
const SIZE: FieldName = FieldName::new("size");

/// Query string accepted by `GET /api/v1/templates`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTemplatesQuery {
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Page size, 1 to 100. Defaults to 20.
    pub size: Option<u32>,
    /// Restrict to one category id.
    pub category: Option<i64>,
    /// Comma-separated tag names; all must be present.
    pub tags: Option<String>,
}

impl ListTemplatesQuery {
    fn is_explore(&self) -> bool {
        self.page.is_none()
            && self.size.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }

    fn into_page_request(self) -> Result<TemplatePageRequest, Error> {
        let page = validate(
            SIZE,
            PageRequest::new(
                self.page.unwrap_or(0),
                self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            ),
        )?;
        let tags = match self.tags.as_deref() {
            Some(raw) => parse_tag_filter(raw, TAGS)?,
            None => Vec::new(),
        };
        Ok(TemplatePageRequest {
            page,
            category_id: self.category.map(CategoryId::new),
            tags,
        })
    }
}

fn snippet_draft(body: SnippetBody) -> Result<SnippetDraft, Error> {
    Ok(SnippetDraft {
        filename: validate(FILENAME, Filename::new(&body.filename))?,
        content: body.content,
        ordinal: Ordinal::new(body.ordinal),
    })
}

fn snippet_edit(body: SnippetEditBody) -> Result<SnippetEdit, Error> {
    Ok(SnippetEdit {
        id: SnippetId::new(body.id),
        filename: validate(FILENAME, Filename::new(&body.filename))?,
        content: body.content,
        ordinal: Ordinal::new(body.ordinal),
    })
}

fn snippet_drafts(bodies: Vec<SnippetBody>) -> Result<Vec<SnippetDraft>, Error> {
    bodies.into_iter().map(snippet_draft).collect()
}

fn template_location(id: TemplateId) -> String {
    format!("/api/v1/templates/{id}")
}

/// Create a template owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/templates",
    request_body = CreateTemplateRequestBody,
    responses(
        (status = 201, description = "Template created", body = CreatedTemplateResponse,
            headers(("Location" = String, description = "URL of the new template"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Category owned by another member", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "createTemplate"
)]
#[post("/templates")]
pub async fn create_template(
    state: web::Data<HttpState>,
    member: AuthenticatedMember,
    payload: web::Json<CreateTemplateRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = CreateTemplateRequest {
        member_id: member.id(),
        category_id: body.category_id.map(CategoryId::new),
        title: validate(TITLE, TemplateTitle::new(&body.title))?,
        description: body.description,
        snippets: snippet_drafts(body.snippets)?,
        thumbnail_ordinal: body.thumbnail_ordinal.map(Ordinal::new),
        tags: parse_tag_names(&body.tags, TAGS)?,
    };
    let id = state.templates.create(request).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, template_location(id)))
        .json(CreatedTemplateResponse { id: id.get() }))
}

/// Explore every template, or list one filtered page.
#[utoipa::path(
    get,
    path = "/api/v1/templates",
    params(ListTemplatesQuery),
    responses(
        (status = 200, description = "Explore list without query parameters, otherwise one filtered page", body = TemplateListResponse),
        (status = 400, description = "Invalid paging or tag parameters", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "listTemplates",
    security([])
)]
#[get("/templates")]
pub async fn list_templates(
    state: web::Data<HttpState>,
    query: web::Query<ListTemplatesQuery>,
) -> ApiResult<web::Json<TemplateListResponse>> {
    let query = query.into_inner();
    if query.is_explore() {
        let templates = state.templates_query.explore().await?;
        return Ok(web::Json(TemplateListResponse::Explore(templates.into())));
    }

    let request = query.into_page_request()?;
    let page: Page<TemplateSummary> = state.templates_query.find_page(request).await?;
    Ok(web::Json(TemplateListResponse::Page(page.into())))
}

/// Full detail of a template the caller owns.
#[utoipa::path(
    get,
    path = "/api/v1/templates/{id}",
    params(("id" = i64, Path, description = "Template id")),
    responses(
        (status = 200, description = "Template detail", body = TemplateDetailResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Owned by another member", body = ErrorSchema),
        (status = 404, description = "Unknown template", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "getTemplate"
)]
#[get("/templates/{id}")]
pub async fn get_template(
    state: web::Data<HttpState>,
    member: AuthenticatedMember,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TemplateDetailResponse>> {
    let id = TemplateId::new(path.into_inner());
    let detail = state.templates_query.find_owned(member.id(), id).await?;
    Ok(web::Json(TemplateDetailResponse::from(detail)))
}

/// Replace a template's fields, snippets and tags.
#[utoipa::path(
    put,
    path = "/api/v1/templates/{id}",
    params(("id" = i64, Path, description = "Template id")),
    request_body = UpdateTemplateRequestBody,
    responses(
        (status = 204, description = "Template updated"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Owned by another member", body = ErrorSchema),
        (status = 404, description = "Unknown template, category or snippet", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "updateTemplate"
)]
#[put("/templates/{id}")]
pub async fn update_template(
    state: web::Data<HttpState>,
    member: AuthenticatedMember,
    path: web::Path<i64>,
    payload: web::Json<UpdateTemplateRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = UpdateTemplateRequest {
        member_id: member.id(),
        template_id: TemplateId::new(path.into_inner()),
        category_id: body.category_id.map(CategoryId::new),
        title: validate(TITLE, TemplateTitle::new(&body.title))?,
        description: body.description,
        new_snippets: snippet_drafts(body.new_snippets)?,
        updated_snippets: body
            .updated_snippets
            .into_iter()
            .map(snippet_edit)
            .collect::<Result<_, _>>()?,
        deleted_snippet_ids: body
            .deleted_snippet_ids
            .into_iter()
            .map(SnippetId::new)
            .collect(),
        thumbnail_snippet_id: body.thumbnail_snippet_id.map(SnippetId::new),
        tags: parse_tag_names(&body.tags, TAGS)?,
    };
    state.templates.update(request).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a template the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/templates/{id}",
    params(("id" = i64, Path, description = "Template id")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Owned by another member", body = ErrorSchema),
        (status = 404, description = "Unknown template", body = ErrorSchema)
    ),
    tags = ["templates"],
    operation_id = "deleteTemplate"
)]
#[delete("/templates/{id}")]
pub async fn delete_template(
    state: web::Data<HttpState>,
    member: AuthenticatedMember,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = TemplateId::new(path.into_inner());
    state.templates.delete(member.id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;
