//! Internal Diesel row structs for the template store.
//!
//! Rows never leave the persistence layer. Conversions into domain types
//! re-run the domain validation and report failures as plain strings that
//! the repositories wrap in their query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Category, CategoryId, CategoryName, CategorySummary, Email, Filename, Member, MemberId,
    Ordinal, Snippet, SnippetId, Tag, TagId, TagName, Template, TemplateId, TemplateTitle,
    Username,
};

use super::schema::{
    categories, members, snippets, tags, template_tags, templates, thumbnail_snippets,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemberRow {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl MemberRow {
    pub(crate) fn into_domain(self) -> Result<Member, String> {
        let email = Email::new(&self.email).map_err(|err| format!("member {}: {err}", self.id))?;
        let username =
            Username::new(&self.username).map_err(|err| format!("member {}: {err}", self.id))?;
        Ok(Member::new(MemberId::new(self.id), email, username))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = members)]
pub(crate) struct NewMemberRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password_digest: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub member_id: i64,
    pub name: String,
    pub is_default: bool,
}

impl CategoryRow {
    pub(crate) fn into_domain(self) -> Result<Category, String> {
        let name =
            CategoryName::new(&self.name).map_err(|err| format!("category {}: {err}", self.id))?;
        Ok(Category::new(
            CategoryId::new(self.id),
            MemberId::new(self.member_id),
            name,
            self.is_default,
        ))
    }

    pub(crate) fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: CategoryId::new(self.id),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub member_id: i64,
    pub name: &'a str,
    pub is_default: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
}

impl TagRow {
    pub(crate) fn into_domain(self) -> Result<Tag, String> {
        let name = TagName::new(&self.name).map_err(|err| format!("tag {}: {err}", self.id))?;
        Ok(Tag {
            id: TagId::new(self.id),
            name,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TemplateRow {
    pub id: i64,
    pub member_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl TemplateRow {
    pub(crate) fn into_domain(self) -> Result<Template, String> {
        let title =
            TemplateTitle::new(&self.title).map_err(|err| format!("template {}: {err}", self.id))?;
        Ok(Template {
            id: TemplateId::new(self.id),
            member_id: MemberId::new(self.member_id),
            category_id: CategoryId::new(self.category_id),
            title,
            description: self.description,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = templates)]
pub(crate) struct NewTemplateRow<'a> {
    pub member_id: i64,
    pub category_id: i64,
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = templates)]
pub(crate) struct TemplateUpdate<'a> {
    pub category_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = snippets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SnippetRow {
    pub id: i64,
    pub template_id: i64,
    pub filename: String,
    pub content: String,
    pub ordinal: i32,
}

impl SnippetRow {
    pub(crate) fn into_domain(self) -> Result<Snippet, String> {
        let filename =
            Filename::new(&self.filename).map_err(|err| format!("snippet {}: {err}", self.id))?;
        Ok(Snippet {
            id: SnippetId::new(self.id),
            filename,
            content: self.content,
            ordinal: Ordinal::new(self.ordinal),
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = snippets)]
pub(crate) struct NewSnippetRow<'a> {
    pub template_id: i64,
    pub filename: &'a str,
    pub content: &'a str,
    pub ordinal: i32,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = snippets)]
pub(crate) struct SnippetUpdate<'a> {
    pub filename: &'a str,
    pub content: &'a str,
    pub ordinal: i32,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = thumbnail_snippets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ThumbnailRow {
    pub template_id: i64,
    pub snippet_id: i64,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = template_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TemplateTagRow {
    pub template_id: i64,
    pub tag_id: i64,
}
