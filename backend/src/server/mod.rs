//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};
#[cfg(feature = "metrics")]
use metrics::build_metrics;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use templatehub::Trace;
#[cfg(debug_assertions)]
use templatehub::doc::ApiDoc;
use templatehub::inbound::http::categories::{create_category, delete_category, list_categories};
use templatehub::inbound::http::error::{
    json_error_handler, path_error_handler, query_error_handler,
};
use templatehub::inbound::http::health::{HealthState, live, ready};
use templatehub::inbound::http::members::{check_email, check_username, login, logout, signup};
use mockable::DefaultEnv;
use templatehub::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};
use templatehub::inbound::http::state::HttpState;
use templatehub::inbound::http::templates::{
    create_template, delete_template, get_template, list_templates, update_template,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Session settings read from the process environment for this build.
pub fn session_settings() -> Result<SessionSettings, SessionConfigError> {
    session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session.middleware())
        .service(signup)
        .service(check_email)
        .service(check_username)
        .service(login)
        .service(logout)
        .service(list_categories)
        .service(create_category)
        .service(delete_category)
        .service(create_template)
        .service(list_templates)
        .service(get_template)
        .service(update_template)
        .service(delete_template);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// The caller marks `health_state` ready once startup work completes.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or registering
/// metrics fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(config.db_pool.as_ref());
    #[cfg(feature = "metrics")]
    let prometheus = build_metrics()?;
    let ServerConfig {
        session,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests;
