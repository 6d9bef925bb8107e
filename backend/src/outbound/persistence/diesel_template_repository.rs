//! PostgreSQL-backed `TemplateRepository` implementation using Diesel ORM.
//!
//! Writes run inside one transaction each. Multi-query reads (the detail
//! view and filtered pages) run inside a read-only repeatable-read
//! transaction so the assembled projection comes from one snapshot.

mod reads;
mod writes;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::ports::{TemplateRepository, TemplateRepositoryError};
use crate::domain::{
    NewTemplate, Template, TemplateChanges, TemplateDetail, TemplateFilter, TemplateId,
    TemplateSummary,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TemplateRow;
use super::pool::{DbPool, PoolError};
use super::schema::templates;

/// Failure raised inside a template store transaction.
#[derive(Debug)]
enum StoreError {
    Diesel(diesel::result::Error),
    Missing(String),
    InvalidRow(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<StoreError> for TemplateRepositoryError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Diesel(error) => map_diesel_error(error),
            StoreError::Missing(message) => Self::missing(message),
            StoreError::InvalidRow(message) => Self::query(message),
        }
    }
}

fn map_pool_error(error: PoolError) -> TemplateRepositoryError {
    map_basic_pool_error(error, TemplateRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TemplateRepositoryError {
    map_basic_diesel_error(
        error,
        TemplateRepositoryError::query,
        TemplateRepositoryError::connection,
    )
}

/// Diesel-backed implementation of the template repository port.
#[derive(Clone)]
pub struct DieselTemplateRepository {
    pool: DbPool,
}

impl DieselTemplateRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use templatehub::outbound::persistence::{DbPool, DieselTemplateRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/templatehub")).await?;
    /// let repository = DieselTemplateRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for DieselTemplateRepository {
    async fn create(&self, template: &NewTemplate) -> Result<TemplateId, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move { writes::insert_template(conn, template).await }.scope_boxed()
            })
            .await?;
        debug!(template_id = %id, snippets = template.snippets.len(), "template stored");
        Ok(id)
    }

    async fn find_by_id(
        &self,
        id: TemplateId,
    ) -> Result<Option<Template>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = templates::table
            .find(id.get())
            .select(TemplateRow::as_select())
            .first::<TemplateRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(TemplateRow::into_domain)
            .transpose()
            .map_err(TemplateRepositoryError::query)
    }

    async fn find_detail(
        &self,
        id: TemplateId,
    ) -> Result<Option<TemplateDetail>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, StoreError, _>(|conn| {
                async move { reads::load_detail(conn, id).await }.scope_boxed()
            })
            .await
            .map_err(TemplateRepositoryError::from)
    }

    async fn list_all(&self) -> Result<Vec<TemplateSummary>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, StoreError, _>(|conn| {
                async move {
                    let rows = templates::table
                        .select(TemplateRow::as_select())
                        .order_by(templates::id.asc())
                        .load::<TemplateRow>(conn)
                        .await?;
                    reads::assemble_summaries(conn, rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(TemplateRepositoryError::from)
    }

    async fn find_page(
        &self,
        filter: &TemplateFilter,
        request: PageRequest,
    ) -> Result<Page<TemplateSummary>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, StoreError, _>(|conn| {
                async move { reads::load_page(conn, filter, request).await }.scope_boxed()
            })
            .await
            .map_err(TemplateRepositoryError::from)
    }

    async fn update(&self, changes: &TemplateChanges) -> Result<(), TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, StoreError, _>(|conn| {
            async move { writes::apply_changes(conn, changes).await }.scope_boxed()
        })
        .await?;
        debug!(template_id = %changes.template_id, "template updated");
        Ok(())
    }

    async fn delete(&self, id: TemplateId) -> Result<bool, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move { writes::delete_template(conn, id).await }.scope_boxed()
            })
            .await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::Missing("snippet 4".to_owned()), TemplateRepositoryError::missing("snippet 4"))]
    #[case(StoreError::InvalidRow("bad title".to_owned()), TemplateRepositoryError::query("bad title"))]
    #[case(StoreError::Diesel(DieselError::NotFound), TemplateRepositoryError::query("record not found"))]
    #[case(
        StoreError::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new(String::from("gone")),
        )),
        TemplateRepositoryError::connection("database connection error")
    )]
    fn store_errors_map_to_port_errors(
        #[case] error: StoreError,
        #[case] expected: TemplateRepositoryError,
    ) {
        assert_eq!(TemplateRepositoryError::from(error), expected);
    }
}
