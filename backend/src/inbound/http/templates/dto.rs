//! Request and response bodies for the template endpoints.

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CategorySummary, Snippet, TemplateDetail, TemplateSummary, ThumbnailSnippet,
};

/// Snippet supplied when creating a template or adding one during an update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SnippetBody {
    #[schema(example = "main.rs")]
    pub filename: String,
    #[schema(example = "fn main() {}")]
    pub content: String,
    /// Position within the template; unique per template.
    #[schema(example = 0)]
    pub ordinal: i32,
}

/// In-place edit of an existing snippet.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SnippetEditBody {
    #[schema(example = 12)]
    pub id: i64,
    pub filename: String,
    pub content: String,
    pub ordinal: i32,
}

/// Request body for `POST /api/v1/templates`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequestBody {
    /// Category id; the caller's default category when omitted.
    #[serde(default)]
    pub category_id: Option<i64>,
    #[schema(example = "Actix handler")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub snippets: Vec<SnippetBody>,
    /// Ordinal of the snippet shown in listings; the first snippet when
    /// omitted.
    #[serde(default)]
    pub thumbnail_ordinal: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for `PUT /api/v1/templates/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequestBody {
    #[serde(default)]
    pub category_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub new_snippets: Vec<SnippetBody>,
    #[serde(default)]
    pub updated_snippets: Vec<SnippetEditBody>,
    #[serde(default)]
    pub deleted_snippet_ids: Vec<i64>,
    #[serde(default)]
    pub thumbnail_snippet_id: Option<i64>,
    /// Complete replacement tag list.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Identifier of a newly created template.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedTemplateResponse {
    #[schema(example = 1)]
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryResponse {
    pub id: i64,
    pub name: String,
}

impl From<CategorySummary> for CategorySummaryResponse {
    fn from(value: CategorySummary) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

/// Snippet representing a template in listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThumbnailResponse {
    pub id: i64,
    pub filename: String,
    pub content: String,
}

impl From<ThumbnailSnippet> for ThumbnailResponse {
    fn from(value: ThumbnailSnippet) -> Self {
        Self {
            id: value.snippet_id.get(),
            filename: value.filename,
            content: value.content,
        }
    }
}

/// Listing entry; carries the thumbnail snippet instead of every snippet.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummaryResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: CategorySummaryResponse,
    /// Tag names in alphabetical order.
    pub tags: Vec<String>,
    pub thumbnail: Option<ThumbnailResponse>,
    pub modified_at: DateTime<Utc>,
}

impl From<TemplateSummary> for TemplateSummaryResponse {
    fn from(value: TemplateSummary) -> Self {
        Self {
            id: value.id.get(),
            title: value.title,
            description: value.description,
            category: value.category.into(),
            tags: value.tags,
            thumbnail: value.thumbnail.map(ThumbnailResponse::from),
            modified_at: value.modified_at,
        }
    }
}

/// Body of the unpaginated explore list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExploreResponse {
    pub templates: Vec<TemplateSummaryResponse>,
}

impl From<Vec<TemplateSummary>> for ExploreResponse {
    fn from(value: Vec<TemplateSummary>) -> Self {
        Self {
            templates: value.into_iter().map(Into::into).collect(),
        }
    }
}

/// One page of the filtered listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePageResponse {
    pub templates: Vec<TemplateSummaryResponse>,
    /// Zero-based index of this page.
    pub page: u32,
    pub size: u32,
    pub total_pages: u64,
    /// Size of the complete filtered set.
    pub total_elements: u64,
}

impl From<Page<TemplateSummary>> for TemplatePageResponse {
    fn from(value: Page<TemplateSummary>) -> Self {
        let page = value.page();
        let size = value.size();
        let total_pages = value.total_pages();
        let total_elements = value.total_elements();
        Self {
            templates: value.into_items().into_iter().map(Into::into).collect(),
            page,
            size,
            total_pages,
            total_elements,
        }
    }
}

/// Body of `GET /api/v1/templates`: the explore list when the request has
/// no query parameters, a filtered page otherwise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TemplateListResponse {
    Page(TemplatePageResponse),
    Explore(ExploreResponse),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SnippetResponse {
    pub id: i64,
    pub filename: String,
    pub content: String,
    pub ordinal: i32,
}

impl From<Snippet> for SnippetResponse {
    fn from(value: Snippet) -> Self {
        Self {
            id: value.id.get(),
            filename: value.filename.into(),
            content: value.content,
            ordinal: value.ordinal.get(),
        }
    }
}

/// Owner view of a template.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetailResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: CategorySummaryResponse,
    /// Snippets ordered by ordinal.
    pub snippets: Vec<SnippetResponse>,
    pub tags: Vec<String>,
    pub thumbnail_snippet_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<TemplateDetail> for TemplateDetailResponse {
    fn from(value: TemplateDetail) -> Self {
        let TemplateDetail {
            template,
            category,
            snippets,
            tags,
            thumbnail_snippet_id,
        } = value;
        Self {
            id: template.id.get(),
            title: template.title.into(),
            description: template.description,
            category: category.into(),
            snippets: snippets.into_iter().map(Into::into).collect(),
            tags,
            thumbnail_snippet_id: thumbnail_snippet_id.map(|id| id.get()),
            created_at: template.created_at,
            modified_at: template.modified_at,
        }
    }
}
