//! Port for member persistence.

use async_trait::async_trait;

use crate::domain::{Email, Member, MemberId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by member repository adapters.
    pub enum MemberRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "member repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "member repository query failed: {message}",
        /// A unique email or username constraint rejected the insert.
        Duplicate { message: String } =>
            "member already exists: {message}",
    }
}

/// Member row to insert at signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    /// Login email.
    pub email: Email,
    /// Public username.
    pub username: Username,
    /// Encoded [`crate::domain::PasswordDigest`].
    pub password_digest: String,
}

/// Stored credentials looked up during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberCredentials {
    /// Member the credentials belong to.
    pub member_id: MemberId,
    /// Encoded [`crate::domain::PasswordDigest`].
    pub password_digest: String,
}

/// Port for reading and writing members.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a member and return its identifier.
    async fn insert(&self, member: &NewMember) -> Result<MemberId, MemberRepositoryError>;

    /// Find a member by id.
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, MemberRepositoryError>;

    /// Load the stored credentials for an email address.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<MemberCredentials>, MemberRepositoryError>;

    /// Whether any member uses `email`.
    async fn exists_by_email(&self, email: &Email) -> Result<bool, MemberRepositoryError>;

    /// Whether any member uses `username`.
    async fn exists_by_username(&self, username: &Username)
    -> Result<bool, MemberRepositoryError>;
}

/// Fixture implementation for tests that do not exercise member persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMemberRepository;

#[async_trait]
impl MemberRepository for FixtureMemberRepository {
    async fn insert(&self, _member: &NewMember) -> Result<MemberId, MemberRepositoryError> {
        Ok(MemberId::new(1))
    }

    async fn find_by_id(&self, _id: MemberId) -> Result<Option<Member>, MemberRepositoryError> {
        Ok(None)
    }

    async fn find_credentials_by_email(
        &self,
        _email: &Email,
    ) -> Result<Option<MemberCredentials>, MemberRepositoryError> {
        Ok(None)
    }

    async fn exists_by_email(&self, _email: &Email) -> Result<bool, MemberRepositoryError> {
        Ok(false)
    }

    async fn exists_by_username(
        &self,
        _username: &Username,
    ) -> Result<bool, MemberRepositoryError> {
        Ok(false)
    }
}
