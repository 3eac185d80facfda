//! HTTP server configuration object and application settings.

use std::net::SocketAddr;

use backend::domain::BackdatingPolicy;
use backend::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Application settings loaded from CLI flags, environment, and config file.
///
/// Environment variables use the `STREAKS_` prefix, e.g. `STREAKS_DATABASE_URL`
/// and `STREAKS_BACKDATING=reject`.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STREAKS")]
pub struct AppSettings {
    /// PostgreSQL connection URL. When absent the server starts with fixture
    /// ports and persists nothing.
    pub database_url: Option<String>,
    /// Socket address to bind the HTTP listener to.
    pub bind_addr: Option<String>,
    /// Maximum database connections in the pool.
    #[ortho_config(default = 10)]
    pub max_connections: u32,
    /// How completions dated before the last applied one are handled.
    pub backdating: Option<BackdatingPolicy>,
}

impl AppSettings {
    /// Resolve the bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Resolve the backdating policy, falling back to the inherited default.
    pub fn backdating(&self) -> BackdatingPolicy {
        self.backdating.unwrap_or_default()
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: BackdatingPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, policy: BackdatingPolicy) -> Self {
        Self {
            bind_addr,
            policy,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed ports; otherwise it
    /// falls back to fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("STREAKS_DATABASE_URL", None::<String>),
            ("STREAKS_BIND_ADDR", None::<String>),
            ("STREAKS_MAX_CONNECTIONS", None::<String>),
            ("STREAKS_BACKDATING", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url.is_none());
        assert_eq!(
            settings.bind_addr().expect("default addr parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal addr")
        );
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.backdating(), BackdatingPolicy::Preserve);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "STREAKS_DATABASE_URL",
                Some("postgres://localhost/streaks".to_owned()),
            ),
            ("STREAKS_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("STREAKS_MAX_CONNECTIONS", Some("3".to_owned())),
            ("STREAKS_BACKDATING", Some("reject".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/streaks")
        );
        assert_eq!(
            settings.bind_addr().expect("override parses"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("literal addr")
        );
        assert_eq!(settings.max_connections, 3);
        assert_eq!(settings.backdating(), BackdatingPolicy::Reject);
    }
}
