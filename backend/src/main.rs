//! Backend entry-point: loads settings, migrates the database, and serves the
//! completion REST API.

mod server;

use actix_web::web;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use server::{AppSettings, ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations on a blocking thread.
///
/// Uses a synchronous connection because migration DDL is a one-off at boot
/// and `diesel_migrations` has no async harness.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&database_url)
            .map_err(|error| std::io::Error::other(format!("database connection: {error}")))?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| std::io::Error::other(format!("migration: {error}")))?;
        Ok(())
    })
    .await
    .map_err(|error| std::io::Error::other(format!("migration task: {error}")))?
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|error| std::io::Error::other(format!("settings: {error}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| std::io::Error::other(format!("bind address: {error}")))?;

    let mut config = ServerConfig::new(bind_addr, settings.backdating());
    match settings.database_url.clone() {
        Some(database_url) => {
            run_migrations(database_url.clone()).await?;
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.max_connections),
            )
            .await
            .map_err(|error| std::io::Error::other(format!("pool: {error}")))?;
            config = config.with_db_pool(pool);
        }
        None => {
            warn!("no database URL configured; serving with fixture ports");
        }
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}
