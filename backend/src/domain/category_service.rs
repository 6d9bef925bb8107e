//! Category domain services.
//!
//! Each member owns one default category, created lazily the first time it
//! is needed. Categories still referenced by templates cannot be deleted.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CategoryCommand, CategoryQuery, CategoryRepository, CategoryRepositoryError, NewCategory,
};
use crate::domain::{Category, CategoryId, CategoryName, Error, FetchOrNotFound, MemberId};

pub(crate) fn map_category_repository_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category repository error: {message}"))
        }
        CategoryRepositoryError::Duplicate { .. } => {
            Error::conflict("a category with this name already exists")
        }
        CategoryRepositoryError::InUse { .. } => {
            Error::conflict("category is still used by templates")
        }
    }
}

/// Return the member's default category, creating it on first use.
///
/// A concurrent request may insert the default between the lookup and the
/// insert; the unique name constraint then rejects ours and the row written
/// by the other request is returned instead.
pub(crate) async fn ensure_default_category<R>(repo: &R, member_id: MemberId) -> Result<Category, Error>
where
    R: CategoryRepository + ?Sized,
{
    if let Some(existing) = repo
        .find_default(member_id)
        .await
        .map_err(map_category_repository_error)?
    {
        return Ok(existing);
    }

    let new_category = NewCategory {
        member_id,
        name: CategoryName::default_name(),
        is_default: true,
    };
    match repo.insert(&new_category).await {
        Ok(created) => {
            debug!(member_id = %member_id, category_id = %created.id(), "default category created");
            Ok(created)
        }
        Err(CategoryRepositoryError::Duplicate { .. }) => repo
            .find_default(member_id)
            .await
            .map_err(map_category_repository_error)?
            .ok_or_else(|| Error::internal("default category vanished after insert race")),
        Err(other) => Err(map_category_repository_error(other)),
    }
}

/// Category service implementing the category driving ports.
#[derive(Clone)]
pub struct CategoryService<R> {
    category_repo: Arc<R>,
}

impl<R> CategoryService<R> {
    /// Create a new service with the category repository.
    pub fn new(category_repo: Arc<R>) -> Self {
        Self { category_repo }
    }
}

#[async_trait]
impl<R> CategoryCommand for CategoryService<R>
where
    R: CategoryRepository,
{
    async fn create(&self, member_id: MemberId, name: CategoryName) -> Result<Category, Error> {
        ensure_default_category(self.category_repo.as_ref(), member_id).await?;

        if self
            .category_repo
            .exists_by_name(member_id, &name)
            .await
            .map_err(map_category_repository_error)?
        {
            return Err(Error::conflict(format!(
                "category '{}' already exists",
                name.as_ref()
            )));
        }

        self.category_repo
            .insert(&NewCategory {
                member_id,
                name,
                is_default: false,
            })
            .await
            .map_err(map_category_repository_error)
    }

    async fn delete(&self, member_id: MemberId, id: CategoryId) -> Result<(), Error> {
        let category = self
            .category_repo
            .find_by_id(id)
            .await
            .map_err(map_category_repository_error)
            .or_not_found(|| format!("category {id} not found"))?;

        if !category.is_owned_by(member_id) {
            return Err(Error::forbidden("category belongs to another member"));
        }
        if category.is_default() {
            return Err(Error::invalid_request("the default category cannot be deleted"));
        }
        if self
            .category_repo
            .is_in_use(id)
            .await
            .map_err(map_category_repository_error)?
        {
            return Err(Error::conflict("category is still used by templates"));
        }

        let deleted = self
            .category_repo
            .delete(id)
            .await
            .map_err(map_category_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("category {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl<R> CategoryQuery for CategoryService<R>
where
    R: CategoryRepository,
{
    async fn list(&self, member_id: MemberId) -> Result<Vec<Category>, Error> {
        ensure_default_category(self.category_repo.as_ref(), member_id).await?;
        self.category_repo
            .list_for_member(member_id)
            .await
            .map_err(map_category_repository_error)
    }
}

#[cfg(test)]
#[path = "category_service_tests.rs"]
mod tests;
