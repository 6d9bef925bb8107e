//! Category API handlers.
//!
//! ```text
//! GET    /api/v1/categories
//! POST   /api/v1/categories {"name":"Rust"}
//! DELETE /api/v1/categories/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Category, CategoryId, CategoryName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedMember;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, validate};

const NAME: FieldName = FieldName::new("name");

/// Request body for `POST /api/v1/categories`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Rust")]
    pub name: String,
}

/// Category as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Rust")]
    pub name: String,
    /// Whether this is the fallback category for templates filed without one.
    pub is_default: bool,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().as_ref().to_owned(),
            is_default: value.is_default(),
        }
    }
}

/// List the caller's categories, creating the default one on first use.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories ordered by id", body = [CategoryResponse]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    member: AuthenticatedMember,
) -> ApiResult<web::Json<Vec<CategoryResponse>>> {
    let categories = state.categories_query.list(member.id()).await?;
    Ok(web::Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Create a category for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 409, description = "Name already used", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    member: AuthenticatedMember,
    payload: web::Json<CreateCategoryRequest>,
) -> ApiResult<HttpResponse> {
    let name = validate(NAME, CategoryName::new(&payload.name))?;
    let category = state.categories.create(member.id(), name).await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// Delete one of the caller's categories.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Default category", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Owned by another member", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema),
        (status = 409, description = "Category still in use", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    member: AuthenticatedMember,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = CategoryId::new(path.into_inner());
    state.categories.delete(member.id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{MockCategoryCommand, MockCategoryQuery};
    use crate::domain::{Error, MemberId};
    use crate::inbound::http::members::login;
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::login_and_get_cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(list_categories)
                    .service(create_category)
                    .service(delete_category),
            )
    }

    fn category(id: i64, name: &str, is_default: bool) -> Category {
        Category::new(
            CategoryId::new(id),
            MemberId::new(1),
            CategoryName::new(name).expect("fixture name"),
            is_default,
        )
    }

    #[actix_web::test]
    async fn list_returns_the_callers_categories() {
        let mut query = MockCategoryQuery::new();
        query
            .expect_list()
            .withf(|member| *member == MemberId::new(1))
            .returning(|_| Ok(vec![category(1, "Uncategorized", true), category(2, "Rust", false)]));
        let mut ports = HttpStatePorts::fixtures();
        ports.categories_query = Arc::new(query);
        let app = actix_test::init_service(test_app(HttpState::new(ports))).await;
        let cookie = login_and_get_cookie(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/categories")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body,
            json!([
                {"id": 1, "name": "Uncategorized", "isDefault": true},
                {"id": 2, "name": "Rust", "isDefault": false}
            ])
        );
    }

    #[actix_web::test]
    async fn anonymous_listing_is_unauthorised() {
        let app = actix_test::init_service(test_app(HttpState::default())).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/categories")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_returns_created_category() {
        let app = actix_test::init_service(test_app(HttpState::default())).await;
        let cookie = login_and_get_cookie(&app).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/categories")
            .cookie(cookie)
            .set_json(json!({"name": "  Rust "}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["name"], "Rust");
        assert_eq!(body["isDefault"], false);
    }

    #[actix_web::test]
    async fn blank_names_are_rejected_before_the_port() {
        let mut command = MockCategoryCommand::new();
        command.expect_create().never();
        let mut ports = HttpStatePorts::fixtures();
        ports.categories = Arc::new(command);
        let app = actix_test::init_service(test_app(HttpState::new(ports))).await;
        let cookie = login_and_get_cookie(&app).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/categories")
            .cookie(cookie)
            .set_json(json!({"name": "   "}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "name");
    }

    #[rstest]
    #[case(Ok(()), StatusCode::NO_CONTENT)]
    #[case(Err(Error::forbidden("category belongs to another member")), StatusCode::FORBIDDEN)]
    #[case(Err(Error::not_found("category 5 not found")), StatusCode::NOT_FOUND)]
    #[case(Err(Error::conflict("category is still used by templates")), StatusCode::CONFLICT)]
    #[case(
        Err(Error::invalid_request("the default category cannot be deleted")),
        StatusCode::BAD_REQUEST
    )]
    #[actix_web::test]
    async fn delete_maps_outcomes_to_statuses(
        #[case] outcome: Result<(), Error>,
        #[case] expected: StatusCode,
    ) {
        let mut command = MockCategoryCommand::new();
        command
            .expect_delete()
            .withf(|member, id| *member == MemberId::new(1) && *id == CategoryId::new(5))
            .times(1)
            .return_once(move |_, _| outcome);
        let mut ports = HttpStatePorts::fixtures();
        ports.categories = Arc::new(command);
        let app = actix_test::init_service(test_app(HttpState::new(ports))).await;
        let cookie = login_and_get_cookie(&app).await;

        let request = actix_test::TestRequest::delete()
            .uri("/api/v1/categories/5")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), expected);
    }
}
