//! Wiring tests for the assembled application.

use std::io::Write;

use actix_web::cookie::{Key, SameSite};
use env_lock::lock_env;
use tempfile::NamedTempFile;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use templatehub::domain::ports::{FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD};
use templatehub::domain::TRACE_ID_HEADER;

use super::*;

#[fixture]
fn deps() -> AppDependencies {
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: build_http_state(None),
        session: SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        },
    }
}

#[rstest]
#[actix_web::test]
async fn readiness_follows_the_health_state(deps: AppDependencies) {
    let health = deps.health_state.clone();
    let app = actix_test::init_service(build_app(deps)).await;

    let before =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/ready").to_request()).await;
    health.mark_ready();
    let after =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/ready").to_request()).await;

    assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(after.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn login_cookie_unlocks_member_endpoints(deps: AppDependencies) {
    let app = actix_test::init_service(build_app(deps)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": FIXTURE_LOGIN_EMAIL, "password": FIXTURE_LOGIN_PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = login_res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();

    let categories = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/categories")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(categories.status(), StatusCode::OK);
    assert!(categories.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[actix_web::test]
async fn anonymous_explore_is_public(deps: AppDependencies) {
    let app = actix_test::init_service(build_app(deps)).await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/v1/templates").to_request())
            .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert!(body["templates"].is_array());
}

#[rstest]
#[actix_web::test]
async fn malformed_bodies_use_the_error_envelope(deps: AppDependencies) {
    let app = actix_test::init_service(build_app(deps)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/members")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\":")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
        .expect("trace id header");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["traceId"], trace_id.as_str());
}

#[rstest]
#[actix_web::test]
async fn malformed_query_strings_are_bad_requests(deps: AppDependencies) {
    let app = actix_test::init_service(build_app(deps)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/templates?page=first")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
fn session_settings_come_from_the_process_environment() {
    let mut key_file = NamedTempFile::new().expect("temporary key file");
    key_file.write_all(&[b'k'; 64]).expect("write key bytes");
    let key_path = key_file
        .path()
        .to_str()
        .expect("temporary path should be valid UTF-8")
        .to_owned();
    let _guard = lock_env([
        ("SESSION_KEY_FILE", Some(key_path)),
        ("SESSION_COOKIE_SECURE", Some("1".to_owned())),
        ("SESSION_SAMESITE", Some("Strict".to_owned())),
        ("SESSION_ALLOW_EPHEMERAL", Some("0".to_owned())),
    ]);

    let settings = session_settings().expect("complete environment loads");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}
