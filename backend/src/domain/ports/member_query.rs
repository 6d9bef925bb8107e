//! Driving port for member lookups: uniqueness checks and session
//! resolution.

use async_trait::async_trait;

use crate::domain::{Email, Error, MemberId, Username};

/// Driving port for member read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberQuery: Send + Sync {
    /// `true` when no member uses `email`.
    async fn is_unique_email(&self, email: &Email) -> Result<bool, Error>;

    /// `true` when no member uses `username`.
    async fn is_unique_username(&self, username: &Username) -> Result<bool, Error>;

    /// Whether the member still exists. Used to validate session identities.
    async fn member_exists(&self, id: MemberId) -> Result<bool, Error>;
}

/// Fixture query: every name is free and only member 1 exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMemberQuery;

#[async_trait]
impl MemberQuery for FixtureMemberQuery {
    async fn is_unique_email(&self, _email: &Email) -> Result<bool, Error> {
        Ok(true)
    }

    async fn is_unique_username(&self, _username: &Username) -> Result<bool, Error> {
        Ok(true)
    }

    async fn member_exists(&self, id: MemberId) -> Result<bool, Error> {
        Ok(id == MemberId::new(1))
    }
}
