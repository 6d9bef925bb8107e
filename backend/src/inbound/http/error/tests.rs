//! Status mapping, redaction and extractor envelopes.

use actix_web::body::to_bytes;
use actix_web::{App, HttpResponse, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;

const TRACE: &str = "3f2b1c4d-5e6f-4a0b-8c9d-0e1f2a3b4c5d";

async fn render(error: Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("error body is readable");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, header, body)
}

#[rstest]
#[case::invalid(Error::invalid_request("title is blank"), StatusCode::BAD_REQUEST)]
#[case::anonymous(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case::not_owner(Error::forbidden("template 4 belongs to another member"), StatusCode::FORBIDDEN)]
#[case::missing(Error::not_found("template 9"), StatusCode::NOT_FOUND)]
#[case::taken(Error::conflict("username taken"), StatusCode::CONFLICT)]
#[case::pool(Error::service_unavailable("pool exhausted"), StatusCode::SERVICE_UNAVAILABLE)]
#[case::bug(Error::internal("snippet ordinal overflow"), StatusCode::INTERNAL_SERVER_ERROR)]
fn each_code_has_one_status(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(error.status_code(), status);
}

#[actix_web::test]
async fn internal_failures_reach_clients_as_a_generic_message() {
    let error = Error::internal("diesel: relation \"snippets\" does not exist")
        .with_trace_id(TRACE)
        .with_details(json!({"query": "select *"}));

    let (status, header, body) = render(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE));
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], INTERNAL_MESSAGE);
    assert_eq!(body["traceId"], TRACE);
    assert!(body.get("details").is_none());
}

#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::conflict("category is still used by templates")
        .with_trace_id(TRACE)
        .with_details(json!({"categoryId": 12}));

    let (status, header, body) = render(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(header.as_deref(), Some(TRACE));
    assert_eq!(body["message"], "category is still used by templates");
    assert_eq!(body["details"]["categoryId"], 12);
}

#[actix_web::test]
async fn untraced_errors_send_no_trace_header() {
    let (_, header, body) = render(Error::not_found("member 7")).await;

    assert_eq!(header, None);
    assert!(body.get("traceId").is_none());
}

#[test]
fn actix_errors_are_promoted_to_internal_errors() {
    let promoted: Error = actix_web::error::ErrorBadRequest("raw actix failure").into();

    assert_eq!(promoted.code(), ErrorCode::InternalError);
    assert_eq!(promoted.message(), INTERNAL_MESSAGE);
    assert!(promoted.details().is_none());
}

#[derive(serde::Deserialize)]
struct NewCategory {
    #[expect(dead_code, reason = "only the extractor outcome matters")]
    name: String,
}

#[derive(serde::Deserialize)]
struct Paging {
    #[expect(dead_code, reason = "only the extractor outcome matters")]
    size: u32,
}

async fn rejection_source(response: actix_web::dev::ServiceResponse) -> Value {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    body["details"]["source"].clone()
}

#[actix_web::test]
async fn truncated_json_is_a_body_rejection() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(
                "/categories",
                web::post().to(|_body: web::Json<NewCategory>| async { HttpResponse::Created() }),
            ),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/categories")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ");

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(rejection_source(response).await, json!("body"));
}

#[actix_web::test]
async fn non_numeric_page_size_is_a_query_rejection() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route(
                "/templates",
                web::get().to(|_query: web::Query<Paging>| async { HttpResponse::Ok() }),
            ),
    )
    .await;
    let request = actix_test::TestRequest::get().uri("/templates?size=lots");

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(rejection_source(response).await, json!("query"));
}

#[actix_web::test]
async fn non_numeric_ids_are_a_path_rejection() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .route(
                "/templates/{id}",
                web::get().to(|_id: web::Path<i64>| async { HttpResponse::Ok() }),
            ),
    )
    .await;
    let request = actix_test::TestRequest::get().uri("/templates/abc");

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(rejection_source(response).await, json!("path"));
}
