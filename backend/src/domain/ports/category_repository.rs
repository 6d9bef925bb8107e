//! Port for category persistence.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, CategoryName, MemberId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "category repository query failed: {message}",
        /// The member already has a category with this name.
        Duplicate { message: String } =>
            "category already exists: {message}",
        /// Templates still reference the category.
        InUse { message: String } =>
            "category is still in use: {message}",
    }
}

/// Category row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Owning member.
    pub member_id: MemberId,
    /// Display name.
    pub name: CategoryName,
    /// Whether this is the member's fallback category.
    pub is_default: bool,
}

/// Port for reading and writing categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return the stored row.
    async fn insert(&self, category: &NewCategory) -> Result<Category, CategoryRepositoryError>;

    /// Find a category by id.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Find the member's default category.
    async fn find_default(
        &self,
        member_id: MemberId,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// List the member's categories ordered by id.
    async fn list_for_member(
        &self,
        member_id: MemberId,
    ) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Whether the member already has a category called `name`.
    async fn exists_by_name(
        &self,
        member_id: MemberId,
        name: &CategoryName,
    ) -> Result<bool, CategoryRepositoryError>;

    /// Whether any template references the category.
    async fn is_in_use(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError>;

    /// Delete a category. Returns `false` when no row matched.
    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError>;
}

/// Fixture implementation for tests that do not exercise category persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryRepository;

#[async_trait]
impl CategoryRepository for FixtureCategoryRepository {
    async fn insert(&self, category: &NewCategory) -> Result<Category, CategoryRepositoryError> {
        Ok(Category::new(
            CategoryId::new(1),
            category.member_id,
            category.name.clone(),
            category.is_default,
        ))
    }

    async fn find_by_id(&self, _id: CategoryId) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn find_default(
        &self,
        _member_id: MemberId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn list_for_member(
        &self,
        _member_id: MemberId,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn exists_by_name(
        &self,
        _member_id: MemberId,
        _name: &CategoryName,
    ) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }

    async fn is_in_use(&self, _id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }
}
