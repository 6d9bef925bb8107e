//! Driving port for category reads.

use async_trait::async_trait;

use crate::domain::{Category, Error, MemberId};

/// Driving port for category read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryQuery: Send + Sync {
    /// The member's categories ordered by id, creating the default category
    /// when it does not exist yet.
    async fn list(&self, member_id: MemberId) -> Result<Vec<Category>, Error>;
}

/// Fixture query with no stored categories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryQuery;

#[async_trait]
impl CategoryQuery for FixtureCategoryQuery {
    async fn list(&self, _member_id: MemberId) -> Result<Vec<Category>, Error> {
        Ok(Vec::new())
    }
}
