//! Server settings loaded via OrthoConfig and the assembled server config.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use templatehub::inbound::http::session_config::SessionSettings;
use templatehub::outbound::persistence::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Values controlling the listener and the database connection.
///
/// Every field can be set from the command line, from `TEMPLATEHUB_*`
/// environment variables or from a configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TEMPLATEHUB")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; fixture ports are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations before accepting traffic.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Pool configuration for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_ref().map(|url| {
            PoolConfig::new(url.clone())
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_MAX_CONNECTIONS))
        })
    }
}

/// Everything [`super::create_server`] needs to start listening.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration without a database.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "TEMPLATEHUB_BIND_ADDR",
        "TEMPLATEHUB_DATABASE_URL",
        "TEMPLATEHUB_POOL_MAX_SIZE",
        "TEMPLATEHUB_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("templatehub")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.pool_config().is_none());
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TEMPLATEHUB_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "TEMPLATEHUB_DATABASE_URL",
                Some("postgres://templatehub@localhost/templatehub".to_owned()),
            ),
            ("TEMPLATEHUB_POOL_MAX_SIZE", Some("4".to_owned())),
            ("TEMPLATEHUB_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let pool = settings.pool_config().expect("database configured");

        assert_eq!(
            settings.bind_addr().expect("address parses").port(),
            9090
        );
        assert_eq!(
            pool.database_url(),
            "postgres://templatehub@localhost/templatehub"
        );
        assert_eq!(pool.max_size(), 4);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn malformed_bind_addresses_are_reported() {
        let _guard = lock_env([
            ("TEMPLATEHUB_BIND_ADDR", Some("not-an-address".to_owned())),
            ("TEMPLATEHUB_DATABASE_URL", None),
            ("TEMPLATEHUB_POOL_MAX_SIZE", None),
            ("TEMPLATEHUB_RUN_MIGRATIONS", None),
        ]);

        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
