//! Member domain services: signup, uniqueness checks and login.
//!
//! One service backs three driving ports ([`MemberCommand`], [`MemberQuery`]
//! and [`LoginService`]) over the same member repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    LoginService, MemberCommand, MemberQuery, MemberRepository, MemberRepositoryError, NewMember,
    SignupRequest,
};
use crate::domain::{Email, Error, LoginCredentials, MemberId, PasswordDigest, Username};

fn map_repository_error(error: MemberRepositoryError) -> Error {
    match error {
        MemberRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("member repository unavailable: {message}"))
        }
        MemberRepositoryError::Query { message } => {
            Error::internal(format!("member repository error: {message}"))
        }
        MemberRepositoryError::Duplicate { .. } => {
            Error::conflict("email or username is already registered")
        }
    }
}

/// Member service implementing the member and login driving ports.
#[derive(Clone)]
pub struct MemberService<R> {
    member_repo: Arc<R>,
}

impl<R> MemberService<R> {
    /// Create a new service with the member repository.
    pub fn new(member_repo: Arc<R>) -> Self {
        Self { member_repo }
    }
}

#[async_trait]
impl<R> MemberCommand for MemberService<R>
where
    R: MemberRepository,
{
    async fn signup(&self, request: SignupRequest) -> Result<MemberId, Error> {
        let SignupRequest {
            email,
            password,
            username,
        } = request;

        if self
            .member_repo
            .exists_by_email(&email)
            .await
            .map_err(map_repository_error)?
        {
            return Err(Error::conflict("email is already registered"));
        }
        if self
            .member_repo
            .exists_by_username(&username)
            .await
            .map_err(map_repository_error)?
        {
            return Err(Error::conflict("username is already taken"));
        }

        let digest = PasswordDigest::derive(&password).map_err(|err| {
            warn!(error = %err, "password hashing failed during signup");
            Error::internal("could not store credentials")
        })?;
        let member = NewMember {
            email,
            username,
            password_digest: digest.encode(),
        };
        let id = self
            .member_repo
            .insert(&member)
            .await
            .map_err(map_repository_error)?;
        debug!(member_id = %id, "member registered");
        Ok(id)
    }
}

#[async_trait]
impl<R> MemberQuery for MemberService<R>
where
    R: MemberRepository,
{
    async fn is_unique_email(&self, email: &Email) -> Result<bool, Error> {
        self.member_repo
            .exists_by_email(email)
            .await
            .map(|exists| !exists)
            .map_err(map_repository_error)
    }

    async fn is_unique_username(&self, username: &Username) -> Result<bool, Error> {
        self.member_repo
            .exists_by_username(username)
            .await
            .map(|exists| !exists)
            .map_err(map_repository_error)
    }

    async fn member_exists(&self, id: MemberId) -> Result<bool, Error> {
        self.member_repo
            .find_by_id(id)
            .await
            .map(|member| member.is_some())
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> LoginService for MemberService<R>
where
    R: MemberRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<MemberId, Error> {
        let Some(stored) = self
            .member_repo
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
        else {
            return Err(Error::unauthorized("invalid credentials"));
        };

        let digest = PasswordDigest::parse(&stored.password_digest).map_err(|err| {
            warn!(member_id = %stored.member_id, error = %err, "unreadable password digest");
            Error::internal("stored credentials are unreadable")
        })?;

        if digest.verify(credentials.password()) {
            Ok(stored.member_id)
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

#[cfg(test)]
#[path = "member_service_tests.rs"]
mod tests;
