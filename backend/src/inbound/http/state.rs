//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CategoryCommand, CategoryQuery, FixtureCategoryCommand, FixtureCategoryQuery,
    FixtureLoginService, FixtureMemberCommand, FixtureMemberQuery, FixtureTemplateCommand,
    FixtureTemplateQuery, LoginService, MemberCommand, MemberQuery, TemplateCommand,
    TemplateQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub members: Arc<dyn MemberCommand>,
    pub members_query: Arc<dyn MemberQuery>,
    pub categories: Arc<dyn CategoryCommand>,
    pub categories_query: Arc<dyn CategoryQuery>,
    pub templates: Arc<dyn TemplateCommand>,
    pub templates_query: Arc<dyn TemplateQuery>,
}

impl HttpStatePorts {
    /// Fixture-backed ports for running the API without a database.
    pub fn fixtures() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            members: Arc::new(FixtureMemberCommand),
            members_query: Arc::new(FixtureMemberQuery),
            categories: Arc::new(FixtureCategoryCommand),
            categories_query: Arc::new(FixtureCategoryQuery),
            templates: Arc::new(FixtureTemplateCommand),
            templates_query: Arc::new(FixtureTemplateQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub members: Arc<dyn MemberCommand>,
    pub members_query: Arc<dyn MemberQuery>,
    pub categories: Arc<dyn CategoryCommand>,
    pub categories_query: Arc<dyn CategoryQuery>,
    pub templates: Arc<dyn TemplateCommand>,
    pub templates_query: Arc<dyn TemplateQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(HttpStatePorts::fixtures())
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use templatehub::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::fixtures());
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            members,
            members_query,
            categories,
            categories_query,
            templates,
            templates_query,
        } = ports;
        Self {
            login,
            members,
            members_query,
            categories,
            categories_query,
            templates,
            templates_query,
        }
    }
}
