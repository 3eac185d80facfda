//! Task completion HTTP handlers.
//!
//! ```text
//! POST /api/v1/tasks/{task_id}/complete
//! GET  /api/v1/tasks/{task_id}/completions
//! GET  /api/v1/tasks/{task_id}/streak/user/{user_id}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::RecordCompletionRequest;
use crate::domain::{Error, Streak, TaskCompletion};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_date, parse_uuid};

#[derive(Debug, Deserialize)]
struct TaskPath {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct TaskUserPath {
    task_id: String,
    user_id: String,
}

/// Request payload for completing a task.
///
/// The completing user is always named explicitly; the server holds no
/// ambient current-user state.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    /// The user completing the task.
    pub user_id: Option<String>,
    /// Calendar date the completion counts towards; defaults to today (UTC).
    pub date: Option<String>,
    /// Optional free-text note.
    pub notes: Option<String>,
}

/// Response payload for a recorded or replayed completion.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletionResponse {
    /// Ledger entry identifier.
    pub id: String,
    /// The completed task.
    pub task_id: String,
    /// The completing user.
    pub user_id: String,
    /// Calendar date of the completion.
    pub date: String,
    /// Wall-clock timestamp of the completion request.
    pub completed_at: String,
    /// Free-text note, if any.
    pub notes: Option<String>,
}

/// Response payload for a streak query.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    /// The task the streak belongs to.
    pub task_id: String,
    /// The user the streak belongs to.
    pub user_id: String,
    /// Consecutive days ending at `last_completed_date`.
    pub current_streak: i32,
    /// Historical maximum of the current streak.
    pub longest_streak: i32,
    /// Date of the most recently applied completion.
    pub last_completed_date: Option<String>,
}

impl From<TaskCompletion> for TaskCompletionResponse {
    fn from(completion: TaskCompletion) -> Self {
        Self {
            id: completion.id.to_string(),
            task_id: completion.task_id.to_string(),
            user_id: completion.user_id.to_string(),
            date: completion.date.to_string(),
            completed_at: completion.completed_at.to_rfc3339(),
            notes: completion.notes,
        }
    }
}

impl From<Streak> for StreakResponse {
    fn from(streak: Streak) -> Self {
        Self {
            task_id: streak.task_id.to_string(),
            user_id: streak.user_id.to_string(),
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            last_completed_date: streak.last_completed_date.map(|date| date.to_string()),
        }
    }
}

fn parse_complete_request(
    task_id: Uuid,
    payload: CompleteTaskRequest,
) -> Result<RecordCompletionRequest, Error> {
    let user_id = payload
        .user_id
        .ok_or_else(|| missing_field_error("userId"))?;
    let date = payload
        .date
        .map(|value| parse_date(value, "date"))
        .transpose()?;

    Ok(RecordCompletionRequest {
        task_id,
        user_id: parse_uuid(user_id, "userId")?,
        date,
        notes: payload.notes,
    })
}

/// Record a completion for a task.
///
/// Completing the same task twice on the same date returns the original
/// completion unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/complete",
    params(
        ("task_id" = String, Path, description = "Task identifier")
    ),
    request_body = CompleteTaskRequest,
    responses(
        (status = 200, description = "Completion recorded or replayed", body = TaskCompletionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Task not found", body = Error),
        (status = 409, description = "Backdated completion rejected (strict mode)", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "completeTask"
)]
#[post("/tasks/{task_id}/complete")]
pub async fn complete_task(
    state: web::Data<HttpState>,
    path: web::Path<TaskPath>,
    payload: web::Json<CompleteTaskRequest>,
) -> ApiResult<web::Json<TaskCompletionResponse>> {
    let task_id = parse_uuid(path.into_inner().task_id, "taskId")?;
    let request = parse_complete_request(task_id, payload.into_inner())?;
    let completion = state.completions.record_completion(request).await?;
    Ok(web::Json(completion.into()))
}

/// List all completions recorded for a task.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}/completions",
    params(
        ("task_id" = String, Path, description = "Task identifier")
    ),
    responses(
        (status = 200, description = "Completions in insertion order", body = [TaskCompletionResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Task not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listTaskCompletions"
)]
#[get("/tasks/{task_id}/completions")]
pub async fn list_completions(
    state: web::Data<HttpState>,
    path: web::Path<TaskPath>,
) -> ApiResult<web::Json<Vec<TaskCompletionResponse>>> {
    let task_id = parse_uuid(path.into_inner().task_id, "taskId")?;
    let completions = state.completions_query.completions_for_task(task_id).await?;
    Ok(web::Json(
        completions
            .into_iter()
            .map(TaskCompletionResponse::from)
            .collect(),
    ))
}

/// Fetch the streak for a task and user.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}/streak/user/{user_id}",
    params(
        ("task_id" = String, Path, description = "Task identifier"),
        ("user_id" = String, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Current and longest streak", body = StreakResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Task not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "getUserStreak"
)]
#[get("/tasks/{task_id}/streak/user/{user_id}")]
pub async fn get_streak(
    state: web::Data<HttpState>,
    path: web::Path<TaskUserPath>,
) -> ApiResult<web::Json<StreakResponse>> {
    let path = path.into_inner();
    let task_id = parse_uuid(path.task_id, "taskId")?;
    let user_id = parse_uuid(path.user_id, "userId")?;
    let streak = state
        .completions_query
        .streak_for_user(task_id, user_id)
        .await?;
    Ok(web::Json(streak.into()))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tasks_tests;
