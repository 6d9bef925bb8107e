//! Credential check behind `POST /api/v1/login`.
//!
//! The login handler depends only on this trait. [`crate::domain::MemberService`]
//! implements it against stored password digests; [`FixtureLoginService`]
//! stands in when the server runs without a database.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, MemberId};

/// Email accepted by [`FixtureLoginService`].
pub const FIXTURE_LOGIN_EMAIL: &str = "fixture@example.com";
/// Password accepted by [`FixtureLoginService`].
pub const FIXTURE_LOGIN_PASSWORD: &str = "password";

/// Resolves login credentials to the member they belong to.
///
/// Unknown emails and wrong passwords both yield `unauthorized` so callers
/// cannot probe which emails are registered.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated member id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<MemberId, Error>;
}

/// Accepts exactly one email and password pair, signing in as member 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<MemberId, Error> {
        if credentials.email().as_ref() == FIXTURE_LOGIN_EMAIL
            && credentials.password().expose() == FIXTURE_LOGIN_PASSWORD
        {
            Ok(MemberId::new(1))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_pair_signs_in_as_member_one() {
        let credentials =
            LoginCredentials::try_from_parts(FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD)
                .expect("fixture credentials are well formed");

        let member = FixtureLoginService.authenticate(&credentials).await;

        assert_eq!(member.ok(), Some(MemberId::new(1)));
    }

    #[rstest]
    #[case::wrong_password(FIXTURE_LOGIN_EMAIL, "hunter22")]
    #[case::unknown_email("stranger@example.com", FIXTURE_LOGIN_PASSWORD)]
    #[case::case_changed_password(FIXTURE_LOGIN_EMAIL, "PASSWORD")]
    #[tokio::test]
    async fn anything_else_is_unauthorized(#[case] email: &str, #[case] password: &str) {
        let credentials =
            LoginCredentials::try_from_parts(email, password).expect("credentials shape");

        let error = FixtureLoginService
            .authenticate(&credentials)
            .await
            .expect_err("credentials are rejected");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "invalid credentials");
    }
}
