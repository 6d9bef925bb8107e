//! Server entry point: loads configuration, prepares the database and serves
//! the REST API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server, session_settings};
use templatehub::inbound::http::health::HealthState;
use templatehub::outbound::persistence::{DbPool, run_pending_migrations};

fn init_tracing() {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }
}

async fn database_pool(settings: &ServerSettings) -> io::Result<Option<DbPool>> {
    let Some(pool_config) = settings.pool_config() else {
        warn!("no database configured; serving fixture data");
        return Ok(None);
    };
    if settings.run_migrations {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(io::Error::other)?;
    }
    let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = ServerSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let session = session_settings().map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr);
    if let Some(pool) = database_pool(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    health_state.mark_ready();
    info!(%bind_addr, "templatehub listening");
    server.await
}
