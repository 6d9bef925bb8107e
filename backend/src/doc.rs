//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer (members,
//! categories, templates, health), the request and response bodies they use,
//! the [`ErrorSchema`] wrapper describing the error envelope and the session
//! cookie security scheme.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::ErrorCode;
use crate::inbound::http::categories::{CategoryResponse, CreateCategoryRequest};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::members::{
    AvailabilityResponse, CreatedResponse, LoginRequest, SignupRequestBody,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::templates::{
    CategorySummaryResponse, CreateTemplateRequestBody, CreatedTemplateResponse, ExploreResponse,
    SnippetBody, SnippetEditBody, SnippetResponse, TemplateDetailResponse, TemplateListResponse,
    TemplatePageResponse, TemplateSummaryResponse, ThumbnailResponse, UpdateTemplateRequestBody,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Template hub API",
        description = "Members file code templates into categories, tag them and browse them.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::members::signup,
        crate::inbound::http::members::check_email,
        crate::inbound::http::members::check_username,
        crate::inbound::http::members::login,
        crate::inbound::http::members::logout,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::templates::create_template,
        crate::inbound::http::templates::list_templates,
        crate::inbound::http::templates::get_template,
        crate::inbound::http::templates::update_template,
        crate::inbound::http::templates::delete_template,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCode,
        SignupRequestBody,
        LoginRequest,
        CreatedResponse,
        AvailabilityResponse,
        CreateCategoryRequest,
        CategoryResponse,
        SnippetBody,
        SnippetEditBody,
        CreateTemplateRequestBody,
        UpdateTemplateRequestBody,
        CreatedTemplateResponse,
        CategorySummaryResponse,
        ThumbnailResponse,
        TemplateSummaryResponse,
        ExploreResponse,
        TemplatePageResponse,
        TemplateListResponse,
        SnippetResponse,
        TemplateDetailResponse,
        ProbeStatus,
    )),
    tags(
        (name = "members", description = "Signup, availability checks and sessions"),
        (name = "categories", description = "Per-member template categories"),
        (name = "templates", description = "Template authoring and browsing"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "code")]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case("TemplateSummaryResponse", "thumbnail")]
    #[case("TemplatePageResponse", "totalElements")]
    #[case("TemplateDetailResponse", "thumbnailSnippetId")]
    #[case("CategoryResponse", "isDefault")]
    fn schemas_expose_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas
            .get(schema)
            .unwrap_or_else(|| panic!("{schema} schema"));

        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/members")]
    #[case("/api/v1/members/check-email")]
    #[case("/api/v1/members/check-username")]
    #[case("/api/v1/login")]
    #[case("/api/v1/logout")]
    #[case("/api/v1/categories")]
    #[case("/api/v1/categories/{id}")]
    #[case("/api/v1/templates")]
    #[case("/api/v1/templates/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
