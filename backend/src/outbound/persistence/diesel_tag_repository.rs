//! PostgreSQL-backed `TagRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{Tag, TagName};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::collect_rows;
use super::models::TagRow;
use super::pool::{DbPool, PoolError};
use super::schema::tags;

/// Diesel-backed implementation of the tag lookup port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TagRepositoryError {
    map_basic_pool_error(error, TagRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TagRepositoryError {
    map_basic_diesel_error(
        error,
        TagRepositoryError::query,
        TagRepositoryError::connection,
    )
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn find_by_names(&self, names: &[TagName]) -> Result<Vec<Tag>, TagRepositoryError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let wanted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        let rows: Vec<TagRow> = tags::table
            .filter(tags::name.eq_any(wanted))
            .select(TagRow::as_select())
            .order_by(tags::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows.into_iter().map(TagRow::into_domain), TagRepositoryError::query)
    }
}
