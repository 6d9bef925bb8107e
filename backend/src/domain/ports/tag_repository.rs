//! Port for resolving tag names to stored tags.
//!
//! Tags are created inside template write transactions; this port only reads.

use async_trait::async_trait;

use crate::domain::{Tag, TagName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "tag repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "tag repository query failed: {message}",
    }
}

/// Port for tag lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Return the stored tags whose names exactly match any of `names`.
    /// Unknown names are simply absent from the result.
    async fn find_by_names(&self, names: &[TagName]) -> Result<Vec<Tag>, TagRepositoryError>;
}

/// Fixture implementation that knows no tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTagRepository;

#[async_trait]
impl TagRepository for FixtureTagRepository {
    async fn find_by_names(&self, _names: &[TagName]) -> Result<Vec<Tag>, TagRepositoryError> {
        Ok(Vec::new())
    }
}
