//! Server construction and middleware wiring.

mod config;

pub use config::{AppSettings, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::CompletionService;
use backend::domain::ports::{FixtureCompletionLedger, FixtureStreakStore, FixtureTaskGate};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::tasks::{complete_task, get_streak, list_completions};
use backend::outbound::persistence::{DieselCompletionLedger, DieselStreakStore, DieselTaskGate};

/// Build the completion service from configuration.
///
/// Uses database-backed ports when a pool is available, otherwise falls back
/// to fixtures so the server stays exercisable without persistence.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(CompletionService::new(
                Arc::new(DieselCompletionLedger::new(pool.clone(), config.policy)),
                Arc::new(DieselStreakStore::new(pool.clone())),
                Arc::new(DieselTaskGate::new(pool.clone())),
                clock,
            ));
            HttpState::new(service.clone(), service)
        }
        None => {
            let service = Arc::new(CompletionService::new(
                Arc::new(FixtureCompletionLedger),
                Arc::new(FixtureStreakStore),
                Arc::new(FixtureTaskGate),
                clock,
            ));
            HttpState::new(service.clone(), service)
        }
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(complete_task)
        .service(list_completions)
        .service(get_streak);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
