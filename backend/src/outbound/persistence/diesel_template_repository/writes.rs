//! Write-side statements for the template aggregate.
//!
//! Every function here expects to run inside the caller's transaction.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{
    NewTemplate, Ordinal, SnippetDraft, TagName, TemplateChanges, TemplateId, ThumbnailChoice,
};
use crate::outbound::persistence::models::{
    NewSnippetRow, NewTagRow, NewTemplateRow, SnippetUpdate, TemplateTagRow, TemplateUpdate,
    ThumbnailRow,
};
use crate::outbound::persistence::schema::{
    snippets, tags, template_tags, templates, thumbnail_snippets,
};

use super::StoreError;

/// Insert snippet drafts and return `(id, ordinal)` for each stored row.
async fn insert_snippets(
    conn: &mut AsyncPgConnection,
    template_id: i64,
    drafts: &[SnippetDraft],
) -> Result<Vec<(i64, i32)>, StoreError> {
    if drafts.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<NewSnippetRow<'_>> = drafts
        .iter()
        .map(|draft| NewSnippetRow {
            template_id,
            filename: draft.filename.as_ref(),
            content: draft.content.as_str(),
            ordinal: draft.ordinal.get(),
        })
        .collect();

    let stored = diesel::insert_into(snippets::table)
        .values(&rows)
        .returning((snippets::id, snippets::ordinal))
        .get_results::<(i64, i32)>(conn)
        .await?;
    Ok(stored)
}

fn snippet_at(inserted: &[(i64, i32)], ordinal: Ordinal) -> Result<i64, StoreError> {
    inserted
        .iter()
        .find(|(_, stored)| *stored == ordinal.get())
        .map(|(id, _)| *id)
        .ok_or_else(|| StoreError::Missing(format!("no snippet with ordinal {}", ordinal.get())))
}

/// Resolve names to tag ids, inserting the names not stored yet.
async fn find_or_create_tags(
    conn: &mut AsyncPgConnection,
    names: &[TagName],
) -> Result<Vec<i64>, StoreError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let new_rows: Vec<NewTagRow<'_>> = names
        .iter()
        .map(|name| NewTagRow {
            name: name.as_ref(),
        })
        .collect();
    diesel::insert_into(tags::table)
        .values(&new_rows)
        .on_conflict(tags::name)
        .do_nothing()
        .execute(conn)
        .await?;

    let wanted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    let ids = tags::table
        .filter(tags::name.eq_any(wanted))
        .select(tags::id)
        .load::<i64>(conn)
        .await?;
    Ok(ids)
}

async fn link_tags(
    conn: &mut AsyncPgConnection,
    template_id: i64,
    names: &[TagName],
) -> Result<(), StoreError> {
    let tag_ids = find_or_create_tags(conn, names).await?;
    if tag_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<TemplateTagRow> = tag_ids
        .into_iter()
        .map(|tag_id| TemplateTagRow {
            template_id,
            tag_id,
        })
        .collect();
    diesel::insert_into(template_tags::table)
        .values(&links)
        .execute(conn)
        .await?;
    Ok(())
}

/// Insert the template row, its snippets, thumbnail pointer and tags.
pub(super) async fn insert_template(
    conn: &mut AsyncPgConnection,
    template: &NewTemplate,
) -> Result<TemplateId, StoreError> {
    let row = NewTemplateRow {
        member_id: template.member_id.get(),
        category_id: template.category_id.get(),
        title: template.title.as_ref(),
        description: template.description.as_str(),
    };
    let template_id = diesel::insert_into(templates::table)
        .values(&row)
        .returning(templates::id)
        .get_result::<i64>(conn)
        .await?;

    let inserted = insert_snippets(conn, template_id, &template.snippets).await?;
    let thumbnail = ThumbnailRow {
        template_id,
        snippet_id: snippet_at(&inserted, template.thumbnail_ordinal)?,
    };
    diesel::insert_into(thumbnail_snippets::table)
        .values(&thumbnail)
        .execute(conn)
        .await?;

    link_tags(conn, template_id, &template.tags).await?;
    Ok(TemplateId::new(template_id))
}

/// Apply an update in order: template row, new snippets, edited snippets,
/// thumbnail pointer, deleted snippets, tag associations.
pub(super) async fn apply_changes(
    conn: &mut AsyncPgConnection,
    changes: &TemplateChanges,
) -> Result<(), StoreError> {
    let template_id = changes.template_id.get();
    let now = Utc::now();

    let updated = diesel::update(templates::table.find(template_id))
        .set(&TemplateUpdate {
            category_id: changes.category_id.get(),
            title: changes.title.as_ref(),
            description: changes.description.as_str(),
            modified_at: now,
        })
        .execute(conn)
        .await?;
    if updated == 0 {
        return Err(StoreError::Missing(format!(
            "template {} not found",
            changes.template_id
        )));
    }

    let inserted = insert_snippets(conn, template_id, &changes.new_snippets).await?;

    for edit in &changes.edited_snippets {
        let edited = diesel::update(
            snippets::table.filter(
                snippets::id
                    .eq(edit.id.get())
                    .and(snippets::template_id.eq(template_id)),
            ),
        )
        .set(&SnippetUpdate {
            filename: edit.filename.as_ref(),
            content: edit.content.as_str(),
            ordinal: edit.ordinal.get(),
            modified_at: now,
        })
        .execute(conn)
        .await?;
        if edited == 0 {
            return Err(StoreError::Missing(format!("snippet {} not found", edit.id)));
        }
    }

    let thumbnail_id = match changes.thumbnail {
        ThumbnailChoice::Existing(id) => id.get(),
        ThumbnailChoice::New(ordinal) => snippet_at(&inserted, ordinal)?,
    };
    diesel::insert_into(thumbnail_snippets::table)
        .values(&ThumbnailRow {
            template_id,
            snippet_id: thumbnail_id,
        })
        .on_conflict(thumbnail_snippets::template_id)
        .do_update()
        .set(thumbnail_snippets::snippet_id.eq(thumbnail_id))
        .execute(conn)
        .await?;

    if !changes.deleted_snippet_ids.is_empty() {
        let doomed: Vec<i64> = changes
            .deleted_snippet_ids
            .iter()
            .map(|id| id.get())
            .collect();
        let deleted = diesel::delete(
            snippets::table.filter(
                snippets::id
                    .eq_any(&doomed)
                    .and(snippets::template_id.eq(template_id)),
            ),
        )
        .execute(conn)
        .await?;
        if deleted != doomed.len() {
            return Err(StoreError::Missing(format!(
                "only {deleted} of {} snippets could be deleted",
                doomed.len()
            )));
        }
    }

    diesel::delete(template_tags::table.filter(template_tags::template_id.eq(template_id)))
        .execute(conn)
        .await?;
    link_tags(conn, template_id, &changes.tags).await
}

/// Delete the thumbnail pointer, snippets, tag links and finally the
/// template row. Returns whether the template existed.
pub(super) async fn delete_template(
    conn: &mut AsyncPgConnection,
    id: TemplateId,
) -> Result<bool, StoreError> {
    let template_id = id.get();

    diesel::delete(thumbnail_snippets::table.filter(thumbnail_snippets::template_id.eq(template_id)))
        .execute(conn)
        .await?;
    diesel::delete(snippets::table.filter(snippets::template_id.eq(template_id)))
        .execute(conn)
        .await?;
    diesel::delete(template_tags::table.filter(template_tags::template_id.eq(template_id)))
        .execute(conn)
        .await?;
    let deleted = diesel::delete(templates::table.find(template_id))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn snippet_at_finds_inserted_ordinal() {
        let inserted = [(10, 0), (11, 1), (12, 2)];
        let id = snippet_at(&inserted, Ordinal::new(1)).expect("ordinal present");
        assert_eq!(id, 11);
    }

    #[rstest]
    fn snippet_at_reports_missing_ordinal() {
        let inserted = [(10, 0)];
        let err = snippet_at(&inserted, Ordinal::new(5)).expect_err("ordinal absent");
        assert!(matches!(err, StoreError::Missing(message) if message.contains('5')));
    }
}
