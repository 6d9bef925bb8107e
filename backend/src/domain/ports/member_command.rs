//! Driving port for member registration.

use async_trait::async_trait;

use crate::domain::{Email, Error, MemberId, Password, Username};

/// Validated signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    /// Login email.
    pub email: Email,
    /// Raw password, digested before it is stored.
    pub password: Password,
    /// Public username.
    pub username: Username,
}

/// Driving port for member write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberCommand: Send + Sync {
    /// Register a member. Fails with `Conflict` when the email or username is
    /// already taken.
    async fn signup(&self, request: SignupRequest) -> Result<MemberId, Error>;
}

/// Fixture command that accepts every signup as member 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMemberCommand;

#[async_trait]
impl MemberCommand for FixtureMemberCommand {
    async fn signup(&self, _request: SignupRequest) -> Result<MemberId, Error> {
        Ok(MemberId::new(1))
    }
}
