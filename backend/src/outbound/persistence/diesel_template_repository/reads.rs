//! Read-side queries that assemble template projections.

use std::collections::{BTreeMap, BTreeSet};

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::{
    CategoryId, CategorySummary, SnippetId, TemplateDetail, TemplateFilter, TemplateId,
    TemplateSummary, ThumbnailSnippet,
};
use crate::outbound::persistence::diesel_helpers::collect_rows;
use crate::outbound::persistence::models::{CategoryRow, SnippetRow, TemplateRow};
use crate::outbound::persistence::schema::{
    categories, snippets, tags, template_tags, templates, thumbnail_snippets,
};

use super::StoreError;

/// Templates restricted by the optional category and id set.
fn filtered<'a>(
    category_id: Option<i64>,
    template_ids: Option<&'a [i64]>,
) -> templates::BoxedQuery<'a, Pg> {
    let mut query = templates::table.into_boxed();
    if let Some(category_id) = category_id {
        query = query.filter(templates::category_id.eq(category_id));
    }
    if let Some(ids) = template_ids {
        query = query.filter(templates::id.eq_any(ids));
    }
    query
}

/// Ids of templates associated with every tag in `tag_ids`.
async fn templates_with_all_tags(
    conn: &mut AsyncPgConnection,
    tag_ids: &[i64],
) -> Result<Vec<i64>, StoreError> {
    let wanted: BTreeSet<i64> = tag_ids.iter().copied().collect();
    let required = i64::try_from(wanted.len())
        .map_err(|_| StoreError::InvalidRow("too many tags in filter".to_owned()))?;

    let ids = template_tags::table
        .filter(template_tags::tag_id.eq_any(&wanted))
        .group_by(template_tags::template_id)
        .having(diesel::dsl::count_distinct(template_tags::tag_id).eq(required))
        .select(template_tags::template_id)
        .order_by(template_tags::template_id.asc())
        .load::<i64>(conn)
        .await?;
    Ok(ids)
}

async fn tag_names_for(
    conn: &mut AsyncPgConnection,
    template_ids: &[i64],
) -> Result<BTreeMap<i64, Vec<String>>, StoreError> {
    let rows = template_tags::table
        .inner_join(tags::table)
        .filter(template_tags::template_id.eq_any(template_ids))
        .select((template_tags::template_id, tags::name))
        .order_by((template_tags::template_id.asc(), tags::name.asc()))
        .load::<(i64, String)>(conn)
        .await?;

    let mut grouped: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for (template_id, name) in rows {
        grouped.entry(template_id).or_default().push(name);
    }
    Ok(grouped)
}

async fn thumbnails_for(
    conn: &mut AsyncPgConnection,
    template_ids: &[i64],
) -> Result<BTreeMap<i64, ThumbnailSnippet>, StoreError> {
    let rows = thumbnail_snippets::table
        .inner_join(snippets::table)
        .filter(thumbnail_snippets::template_id.eq_any(template_ids))
        .select((
            thumbnail_snippets::template_id,
            snippets::id,
            snippets::filename,
            snippets::content,
        ))
        .load::<(i64, i64, String, String)>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(template_id, snippet_id, filename, content)| {
            let thumbnail = ThumbnailSnippet {
                snippet_id: SnippetId::new(snippet_id),
                filename,
                content,
            };
            (template_id, thumbnail)
        })
        .collect())
}

async fn category_summaries(
    conn: &mut AsyncPgConnection,
    category_ids: &BTreeSet<i64>,
) -> Result<BTreeMap<i64, CategorySummary>, StoreError> {
    let rows = categories::table
        .filter(categories::id.eq_any(category_ids))
        .select(CategoryRow::as_select())
        .load::<CategoryRow>(conn)
        .await?;

    Ok(rows.iter().map(|row| (row.id, row.summary())).collect())
}

/// Build summaries for `rows`, keeping their order.
pub(super) async fn assemble_summaries(
    conn: &mut AsyncPgConnection,
    rows: Vec<TemplateRow>,
) -> Result<Vec<TemplateSummary>, StoreError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let template_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let category_ids: BTreeSet<i64> = rows.iter().map(|row| row.category_id).collect();

    let category_by_id = category_summaries(conn, &category_ids).await?;
    let mut tag_names = tag_names_for(conn, &template_ids).await?;
    let mut thumbnails = thumbnails_for(conn, &template_ids).await?;

    rows.into_iter()
        .map(|row| {
            let category = category_by_id.get(&row.category_id).cloned().ok_or_else(|| {
                StoreError::InvalidRow(format!(
                    "template {} references missing category {}",
                    row.id, row.category_id
                ))
            })?;
            Ok(TemplateSummary {
                id: TemplateId::new(row.id),
                title: row.title,
                description: row.description,
                category,
                tags: tag_names.remove(&row.id).unwrap_or_default(),
                thumbnail: thumbnails.remove(&row.id),
                modified_at: row.modified_at,
            })
        })
        .collect()
}

/// Load one page of summaries matching `filter`, ordered by id.
pub(super) async fn load_page(
    conn: &mut AsyncPgConnection,
    filter: &TemplateFilter,
    request: PageRequest,
) -> Result<Page<TemplateSummary>, StoreError> {
    let category_id = filter.category_id.map(CategoryId::get);
    let tagged = if filter.tag_ids.is_empty() {
        None
    } else {
        let tag_ids: Vec<i64> = filter.tag_ids.iter().map(|id| id.get()).collect();
        let ids = templates_with_all_tags(conn, &tag_ids).await?;
        if ids.is_empty() {
            return Ok(Page::empty(request));
        }
        Some(ids)
    };

    let total = filtered(category_id, tagged.as_deref())
        .count()
        .get_result::<i64>(conn)
        .await?;
    let rows = filtered(category_id, tagged.as_deref())
        .select(TemplateRow::as_select())
        .order_by(templates::id.asc())
        .limit(request.limit())
        .offset(request.offset())
        .load::<TemplateRow>(conn)
        .await?;

    let items = assemble_summaries(conn, rows).await?;
    let total = u64::try_from(total)
        .map_err(|_| StoreError::InvalidRow(format!("negative template count {total}")))?;
    Ok(Page::new(items, total, request))
}

/// Load the detail view of one template.
pub(super) async fn load_detail(
    conn: &mut AsyncPgConnection,
    id: TemplateId,
) -> Result<Option<TemplateDetail>, StoreError> {
    let Some(row) = templates::table
        .find(id.get())
        .select(TemplateRow::as_select())
        .first::<TemplateRow>(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };

    let category = categories::table
        .find(row.category_id)
        .select(CategoryRow::as_select())
        .first::<CategoryRow>(conn)
        .await?
        .summary();
    let snippet_rows = snippets::table
        .filter(snippets::template_id.eq(row.id))
        .select(SnippetRow::as_select())
        .order_by((snippets::ordinal.asc(), snippets::id.asc()))
        .load::<SnippetRow>(conn)
        .await?;
    let tag_names = tag_names_for(conn, &[row.id])
        .await?
        .remove(&row.id)
        .unwrap_or_default();
    let thumbnail_snippet_id = thumbnail_snippets::table
        .find(row.id)
        .select(thumbnail_snippets::snippet_id)
        .first::<i64>(conn)
        .await
        .optional()?
        .map(SnippetId::new);

    let snippets = collect_rows(
        snippet_rows.into_iter().map(SnippetRow::into_domain),
        StoreError::InvalidRow,
    )?;
    let template = row.into_domain().map_err(StoreError::InvalidRow)?;

    Ok(Some(TemplateDetail {
        template,
        category,
        snippets,
        tags: tag_names,
        thumbnail_snippet_id,
    }))
}
