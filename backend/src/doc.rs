//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (tasks, health)
//! - **Schemas**: Request and response payloads plus the shared error body
//!
//! The generated specification feeds Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::tasks::{CompleteTaskRequest, StreakResponse, TaskCompletionResponse};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Streaks backend API",
        description = "HTTP interface for recording task completions and querying streaks.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tasks::complete_task,
        crate::inbound::http::tasks::list_completions,
        crate::inbound::http::tasks::get_streak,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CompleteTaskRequest,
        TaskCompletionResponse,
        StreakResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "tasks", description = "Task completion and streak operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
