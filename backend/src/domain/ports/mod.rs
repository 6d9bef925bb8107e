//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`, [`LoginService`]) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod category_command;
mod category_query;
mod category_repository;
mod login_service;
mod member_command;
mod member_query;
mod member_repository;
mod tag_repository;
mod template_command;
mod template_query;
mod template_repository;

#[cfg(test)]
pub use category_command::MockCategoryCommand;
pub use category_command::{CategoryCommand, FixtureCategoryCommand};
#[cfg(test)]
pub use category_query::MockCategoryQuery;
pub use category_query::{CategoryQuery, FixtureCategoryQuery};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{
    CategoryRepository, CategoryRepositoryError, FixtureCategoryRepository, NewCategory,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use member_command::MockMemberCommand;
pub use member_command::{FixtureMemberCommand, MemberCommand, SignupRequest};
#[cfg(test)]
pub use member_query::MockMemberQuery;
pub use member_query::{FixtureMemberQuery, MemberQuery};
#[cfg(test)]
pub use member_repository::MockMemberRepository;
pub use member_repository::{
    FixtureMemberRepository, MemberCredentials, MemberRepository, MemberRepositoryError,
    NewMember,
};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{FixtureTagRepository, TagRepository, TagRepositoryError};
#[cfg(test)]
pub use template_command::MockTemplateCommand;
pub use template_command::{
    CreateTemplateRequest, FixtureTemplateCommand, TemplateCommand, UpdateTemplateRequest,
};
#[cfg(test)]
pub use template_query::MockTemplateQuery;
pub use template_query::{FixtureTemplateQuery, TemplatePageRequest, TemplateQuery};
#[cfg(test)]
pub use template_repository::MockTemplateRepository;
pub use template_repository::{
    FixtureTemplateRepository, TemplateRepository, TemplateRepositoryError,
};
