//! Member API handlers: signup, availability checks and the session
//! lifecycle.
//!
//! ```text
//! POST /api/v1/members {"email":"ada@example.com","password":"secret","username":"ada"}
//! GET  /api/v1/members/check-email?email=ada@example.com
//! GET  /api/v1/members/check-username?username=ada
//! POST /api/v1/login {"email":"ada@example.com","password":"secret"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::SignupRequest;
use crate::domain::{
    Email, Error, LoginCredentials, MemberId, MemberValidationError, Password, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::MemberSession;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /api/v1/members`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    #[schema(example = "ada")]
    pub username: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Identifier of a newly created resource.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = 1)]
    pub id: i64,
}

/// Result of an availability check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    /// `true` when no member uses the value yet.
    pub available: bool,
}

/// Query string for `GET /api/v1/members/check-email`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    /// Email address to check.
    pub email: String,
}

/// Query string for `GET /api/v1/members/check-username`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameQuery {
    /// Username to check.
    pub username: String,
}

fn member_field(error: &MemberValidationError) -> &'static str {
    match error {
        MemberValidationError::EmptyEmail
        | MemberValidationError::InvalidEmail
        | MemberValidationError::EmailTooLong { .. } => "email",
        MemberValidationError::EmptyUsername | MemberValidationError::UsernameLength { .. } => {
            "username"
        }
        MemberValidationError::EmptyPassword => "password",
    }
}

fn map_member_validation_error(error: MemberValidationError) -> Error {
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": member_field(&error), "code": "invalid_value" }))
}

impl TryFrom<SignupRequestBody> for SignupRequest {
    type Error = MemberValidationError;

    fn try_from(value: SignupRequestBody) -> Result<Self, Self::Error> {
        Ok(Self {
            email: Email::new(&value.email)?,
            password: Password::new(&value.password)?,
            username: Username::new(&value.username)?,
        })
    }
}

/// Register a new member.
#[utoipa::path(
    post,
    path = "/api/v1/members",
    request_body = SignupRequestBody,
    responses(
        (status = 201, description = "Member created", body = CreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email or username already registered", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["members"],
    operation_id = "signup",
    security([])
)]
#[post("/members")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequestBody>,
) -> ApiResult<HttpResponse> {
    let request =
        SignupRequest::try_from(payload.into_inner()).map_err(map_member_validation_error)?;
    let id = state.members.signup(request).await?;
    info!(member_id = %id, "member registered");
    Ok(HttpResponse::Created().json(CreatedResponse { id: id.get() }))
}

/// Check whether an email address is still free.
#[utoipa::path(
    get,
    path = "/api/v1/members/check-email",
    params(EmailQuery),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Malformed email", body = ErrorSchema)
    ),
    tags = ["members"],
    operation_id = "checkEmail",
    security([])
)]
#[get("/members/check-email")]
pub async fn check_email(
    state: web::Data<HttpState>,
    query: web::Query<EmailQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let email = Email::new(&query.email).map_err(map_member_validation_error)?;
    let available = state.members_query.is_unique_email(&email).await?;
    Ok(web::Json(AvailabilityResponse { available }))
}

/// Check whether a username is still free.
#[utoipa::path(
    get,
    path = "/api/v1/members/check-username",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Malformed username", body = ErrorSchema)
    ),
    tags = ["members"],
    operation_id = "checkUsername",
    security([])
)]
#[get("/members/check-username")]
pub async fn check_username(
    state: web::Data<HttpState>,
    query: web::Query<UsernameQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let username = Username::new(&query.username).map_err(map_member_validation_error)?;
    let available = state.members_query.is_unique_username(&username).await?;
    Ok(web::Json(AvailabilityResponse { available }))
}

/// Authenticate a member and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["members"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: MemberSession,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(map_member_validation_error)?;
    let member_id: MemberId = state.login.authenticate(&credentials).await?;
    session.sign_in(member_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["members"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: MemberSession) -> HttpResponse {
    session.sign_out();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
#[path = "members_tests.rs"]
mod tests;
