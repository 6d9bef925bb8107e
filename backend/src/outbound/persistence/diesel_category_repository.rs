//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.
//!
//! The `categories_member_id_name_key` constraint backs the per-member name
//! uniqueness and the `ON DELETE RESTRICT` foreign key from `templates`
//! backs the in-use check; both violations surface as typed port errors.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError, NewCategory};
use crate::domain::{Category, CategoryId, CategoryName, MemberId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, templates};

/// Diesel-backed implementation of the category repository port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    map_basic_pool_error(error, CategoryRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CategoryRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => CategoryRepositoryError::connection(message),
        DieselFailure::Query(message) => CategoryRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint } => {
            CategoryRepositoryError::duplicate(constraint)
        }
        DieselFailure::ForeignKeyViolation { constraint } => {
            CategoryRepositoryError::in_use(constraint)
        }
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn insert(&self, category: &NewCategory) -> Result<Category, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCategoryRow {
            member_id: category.member_id.get(),
            name: category.name.as_ref(),
            is_default: category.is_default,
        };

        let stored = diesel::insert_into(categories::table)
            .values(&row)
            .returning(CategoryRow::as_returning())
            .get_result::<CategoryRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        stored.into_domain().map_err(CategoryRepositoryError::query)
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CategoryRepositoryError> {
        crate::query_optional!(
            self,
            errors: (map_pool_error, map_diesel_error, CategoryRepositoryError::query),
            categories::table,
            categories::id.eq(id.get()),
            CategoryRow,
            CategoryRow::into_domain
        )
    }

    async fn find_default(
        &self,
        member_id: MemberId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        crate::query_optional!(
            self,
            errors: (map_pool_error, map_diesel_error, CategoryRepositoryError::query),
            categories::table,
            categories::member_id
                .eq(member_id.get())
                .and(categories::is_default.eq(true)),
            CategoryRow,
            CategoryRow::into_domain
        )
    }

    async fn list_for_member(
        &self,
        member_id: MemberId,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        crate::query_vec!(
            self,
            errors: (map_pool_error, map_diesel_error, CategoryRepositoryError::query),
            categories::table,
            categories::member_id.eq(member_id.get()),
            categories::id.asc(),
            CategoryRow,
            CategoryRow::into_domain
        )
    }

    async fn exists_by_name(
        &self,
        member_id: MemberId,
        name: &CategoryName,
    ) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            categories::table.filter(
                categories::member_id
                    .eq(member_id.get())
                    .and(categories::name.eq(name.as_ref())),
            ),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn is_in_use(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            templates::table.filter(templates::category_id.eq(id.get())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(categories::table.filter(categories::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
