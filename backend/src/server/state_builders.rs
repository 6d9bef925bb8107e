//! Builders wiring Diesel repositories into domain services and HTTP state.

use std::sync::Arc;

use actix_web::web;

use templatehub::domain::ports::{
    CategoryCommand, CategoryQuery, LoginService, MemberCommand, MemberQuery, TemplateCommand,
    TemplateQuery,
};
use templatehub::domain::{CategoryService, MemberService, TemplateService};
use templatehub::inbound::http::state::{HttpState, HttpStatePorts};
use templatehub::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselMemberRepository, DieselTagRepository,
    DieselTemplateRepository,
};

/// Member-facing ports served by one service instance.
struct MemberPorts {
    login: Arc<dyn LoginService>,
    members: Arc<dyn MemberCommand>,
    members_query: Arc<dyn MemberQuery>,
}

impl MemberPorts {
    fn from_service<S>(service: S) -> Self
    where
        S: LoginService + MemberCommand + MemberQuery + 'static,
    {
        let service = Arc::new(service);
        Self {
            login: service.clone(),
            members: service.clone(),
            members_query: service,
        }
    }
}

/// Replace the fixture member ports when a pool is available.
fn with_member_ports<Pool, S>(
    mut ports: HttpStatePorts,
    pool: Option<&Pool>,
    make_service: impl FnOnce(&Pool) -> S,
) -> HttpStatePorts
where
    S: LoginService + MemberCommand + MemberQuery + 'static,
{
    if let Some(pool) = pool {
        let MemberPorts {
            login,
            members,
            members_query,
        } = MemberPorts::from_service(make_service(pool));
        ports.login = login;
        ports.members = members;
        ports.members_query = members_query;
    }
    ports
}

fn database_ports(pool: &DbPool) -> HttpStatePorts {
    let member_repo = Arc::new(DieselMemberRepository::new(pool.clone()));
    let category_repo = Arc::new(DieselCategoryRepository::new(pool.clone()));
    let tag_repo = Arc::new(DieselTagRepository::new(pool.clone()));
    let template_repo = Arc::new(DieselTemplateRepository::new(pool.clone()));

    let categories = Arc::new(CategoryService::new(category_repo.clone()));
    let templates = Arc::new(TemplateService::new(template_repo, category_repo, tag_repo));

    let ports = HttpStatePorts {
        categories: categories.clone() as Arc<dyn CategoryCommand>,
        categories_query: categories as Arc<dyn CategoryQuery>,
        templates: templates.clone() as Arc<dyn TemplateCommand>,
        templates_query: templates as Arc<dyn TemplateQuery>,
        ..HttpStatePorts::fixtures()
    };
    with_member_ports(ports, Some(&member_repo), |repo| {
        MemberService::new(repo.clone())
    })
}

/// Build the shared HTTP state: Diesel-backed services when a pool is
/// configured, fixture ports otherwise.
pub(super) fn build_http_state(pool: Option<&DbPool>) -> web::Data<HttpState> {
    let ports = pool.map_or_else(HttpStatePorts::fixtures, database_ports);
    web::Data::new(HttpState::new(ports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rstest::rstest;
    use templatehub::domain::ports::{
        FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD, SignupRequest,
    };
    use templatehub::domain::{Email, Error, LoginCredentials, MemberId, Username};

    const STUB_EMAIL: &str = "stub@example.com";
    const STUB_MEMBER: i64 = 77;

    #[derive(Clone, Copy)]
    struct StubMembers;

    #[async_trait]
    impl LoginService for StubMembers {
        async fn authenticate(&self, credentials: &LoginCredentials) -> Result<MemberId, Error> {
            if credentials.email().as_ref() == STUB_EMAIL {
                Ok(MemberId::new(STUB_MEMBER))
            } else {
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }

    #[async_trait]
    impl MemberCommand for StubMembers {
        async fn signup(&self, _request: SignupRequest) -> Result<MemberId, Error> {
            Ok(MemberId::new(STUB_MEMBER))
        }
    }

    #[async_trait]
    impl MemberQuery for StubMembers {
        async fn is_unique_email(&self, _email: &Email) -> Result<bool, Error> {
            Ok(false)
        }

        async fn is_unique_username(&self, _username: &Username) -> Result<bool, Error> {
            Ok(false)
        }

        async fn member_exists(&self, id: MemberId) -> Result<bool, Error> {
            Ok(id == MemberId::new(STUB_MEMBER))
        }
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("credentials shape")
    }

    #[rstest]
    #[tokio::test]
    async fn pool_present_swaps_in_the_member_service() {
        let ports = with_member_ports(HttpStatePorts::fixtures(), Some(&()), |_| StubMembers);

        assert!(
            ports
                .login
                .authenticate(&credentials(FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD))
                .await
                .is_err()
        );
        let member = ports
            .login
            .authenticate(&credentials(STUB_EMAIL, "anything"))
            .await
            .expect("stub login");
        assert_eq!(member, MemberId::new(STUB_MEMBER));
        assert!(
            ports
                .members_query
                .member_exists(member)
                .await
                .expect("stub query")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn pool_absent_keeps_fixture_ports() {
        let ports = with_member_ports::<(), StubMembers>(HttpStatePorts::fixtures(), None, |_| {
            StubMembers
        });

        let member = ports
            .login
            .authenticate(&credentials(FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD))
            .await
            .expect("fixture login");
        assert_eq!(member, MemberId::new(1));
        assert!(ports.login.authenticate(&credentials(STUB_EMAIL, "x")).await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn state_without_a_pool_serves_fixtures() {
        let state = build_http_state(None);

        let member = state
            .login
            .authenticate(&credentials(FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD))
            .await
            .expect("fixture login");
        assert!(
            state
                .members_query
                .member_exists(member)
                .await
                .expect("fixture query")
        );
    }
}
