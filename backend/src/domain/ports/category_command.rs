//! Driving port for category mutations.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, CategoryName, Error, MemberId};

/// Driving port for category write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryCommand: Send + Sync {
    /// Create a category owned by `member_id`. Fails with `Conflict` on a
    /// duplicate name.
    async fn create(&self, member_id: MemberId, name: CategoryName) -> Result<Category, Error>;

    /// Delete one of the member's categories.
    ///
    /// Fails with `NotFound`, `Forbidden` for another member's category,
    /// `InvalidRequest` for the default category, or `Conflict` while
    /// templates still use it.
    async fn delete(&self, member_id: MemberId, id: CategoryId) -> Result<(), Error>;
}

/// Fixture command that echoes created categories and deletes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryCommand;

#[async_trait]
impl CategoryCommand for FixtureCategoryCommand {
    async fn create(&self, member_id: MemberId, name: CategoryName) -> Result<Category, Error> {
        Ok(Category::new(CategoryId::new(1), member_id, name, false))
    }

    async fn delete(&self, _member_id: MemberId, id: CategoryId) -> Result<(), Error> {
        Err(Error::not_found(format!("category {id} not found")))
    }
}
