//! End-to-end behaviour of the task completion endpoints.
//!
//! Wires the real service and handlers over an in-memory ledger so the full
//! request path is exercised without a database: routing, validation, the
//! streak transition, idempotent replays, and error mapping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde_json::{Value, json};
use uuid::Uuid;

use backend::Trace;
use backend::domain::ports::{
    CompletionLedger, CompletionLedgerError, NewCompletion, RecordOutcome, StreakStore,
    StreakStoreError, TaskGate, TaskGateError,
};
use backend::domain::streak::{BackdatingPolicy, apply_completion};
use backend::domain::{CompletionService, Streak, TaskCompletion};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::tasks::{complete_task, get_streak, list_completions};

/// In-memory ledger with the same uniqueness and atomicity contract as the
/// PostgreSQL adapter.
#[derive(Default)]
struct MemoryLedger {
    tasks: Mutex<Vec<Uuid>>,
    completions: Mutex<Vec<TaskCompletion>>,
    streaks: Mutex<HashMap<(Uuid, Uuid), Streak>>,
}

impl MemoryLedger {
    fn with_task(task_id: Uuid) -> Arc<Self> {
        let ledger = Self::default();
        ledger
            .tasks
            .lock()
            .expect("tasks lock poisoned")
            .push(task_id);
        Arc::new(ledger)
    }
}

#[async_trait]
impl CompletionLedger for MemoryLedger {
    async fn find_completion(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<TaskCompletion>, CompletionLedgerError> {
        let completions = self.completions.lock().expect("completions lock poisoned");
        Ok(completions
            .iter()
            .find(|c| c.task_id == task_id && c.user_id == user_id && c.date == date)
            .cloned())
    }

    async fn record(&self, entry: NewCompletion) -> Result<RecordOutcome, CompletionLedgerError> {
        let mut completions = self.completions.lock().expect("completions lock poisoned");
        if let Some(existing) = completions
            .iter()
            .find(|c| c.task_id == entry.task_id && c.user_id == entry.user_id && c.date == entry.date)
        {
            return Ok(RecordOutcome::Duplicate {
                existing: existing.clone(),
            });
        }

        let mut streaks = self.streaks.lock().expect("streaks lock poisoned");
        let key = (entry.task_id, entry.user_id);
        let current = streaks
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Streak::zero(entry.task_id, entry.user_id));
        let updated = apply_completion(&current, entry.date, BackdatingPolicy::Preserve)
            .map_err(|err| CompletionLedgerError::backdated(err.last_completed, err.attempted))?;

        let completion = entry.to_completion();
        completions.push(completion.clone());
        streaks.insert(key, updated.clone());
        Ok(RecordOutcome::Recorded {
            completion,
            streak: updated,
        })
    }

    async fn completions_for_task(
        &self,
        task_id: Uuid,
    ) -> Result<Vec<TaskCompletion>, CompletionLedgerError> {
        let completions = self.completions.lock().expect("completions lock poisoned");
        Ok(completions
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StreakStore for MemoryLedger {
    async fn find_streak(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Streak>, StreakStoreError> {
        let streaks = self.streaks.lock().expect("streaks lock poisoned");
        Ok(streaks.get(&(task_id, user_id)).cloned())
    }
}

#[async_trait]
impl TaskGate for MemoryLedger {
    async fn task_exists(&self, task_id: Uuid) -> Result<bool, TaskGateError> {
        let tasks = self.tasks.lock().expect("tasks lock poisoned");
        Ok(tasks.contains(&task_id))
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.0.into()
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixed_clock() -> Arc<FixedClock> {
    let now = DateTime::from_timestamp(1_704_096_000, 0).expect("valid timestamp");
    Arc::new(FixedClock(now)) // 2024-01-01T08:00:00Z
}

fn build_state(ledger: Arc<MemoryLedger>) -> HttpState {
    let service = Arc::new(CompletionService::new(
        ledger.clone(),
        ledger.clone(),
        ledger,
        fixed_clock(),
    ));
    HttpState::new(service.clone(), service)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .service(complete_task)
                        .service(list_completions)
                        .service(get_streak),
                ),
        )
        .await
    };
}

async fn post_completion<S>(app: &S, task_id: Uuid, user_id: Uuid, date: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/tasks/{task_id}/complete"))
        .set_json(json!({ "userId": user_id.to_string(), "date": date }))
        .to_request();
    let response = test::call_service(app, request).await;
    let status = response.status().as_u16();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

async fn fetch_streak<S>(app: &S, task_id: Uuid, user_id: Uuid) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{task_id}/streak/user/{user_id}"))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    test::read_body_json(response).await
}

#[actix_web::test]
async fn consecutive_days_grow_the_streak() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let app = init_app!(build_state(MemoryLedger::with_task(task_id)));

    for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        let (status, _) = post_completion(&app, task_id, user_id, date).await;
        assert_eq!(status, 200);
    }

    let streak = fetch_streak(&app, task_id, user_id).await;
    assert_eq!(streak["currentStreak"], 3);
    assert_eq!(streak["longestStreak"], 3);
    assert_eq!(streak["lastCompletedDate"], "2024-01-03");
}

#[actix_web::test]
async fn a_gap_resets_current_but_longest_survives() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let app = init_app!(build_state(MemoryLedger::with_task(task_id)));

    for date in ["2024-01-01", "2024-01-02", "2024-01-05"] {
        let (status, _) = post_completion(&app, task_id, user_id, date).await;
        assert_eq!(status, 200);
    }

    let streak = fetch_streak(&app, task_id, user_id).await;
    assert_eq!(streak["currentStreak"], 1);
    assert_eq!(streak["longestStreak"], 2);
}

#[actix_web::test]
async fn same_day_replay_returns_the_original_completion() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let app = init_app!(build_state(MemoryLedger::with_task(task_id)));

    let (first_status, first) = post_completion(&app, task_id, user_id, "2024-01-01").await;
    let (second_status, second) = post_completion(&app, task_id, user_id, "2024-01-01").await;

    assert_eq!(first_status, 200);
    assert_eq!(second_status, 200);
    assert_eq!(first["id"], second["id"]);

    let streak = fetch_streak(&app, task_id, user_id).await;
    assert_eq!(streak["currentStreak"], 1);

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{task_id}/completions"))
        .to_request();
    let response = test::call_service(&app, request).await;
    let listed: Value = test::read_body_json(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn omitted_date_defaults_to_today() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let app = init_app!(build_state(MemoryLedger::with_task(task_id)));

    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/tasks/{task_id}/complete"))
        .set_json(json!({ "userId": user_id.to_string() }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["date"], "2024-01-01");
}

#[actix_web::test]
async fn unknown_task_is_rejected_with_404() {
    let app = init_app!(build_state(Arc::new(MemoryLedger::default())));

    let (status, body) =
        post_completion(&app, Uuid::new_v4(), Uuid::new_v4(), "2024-01-01").await;

    assert_eq!(status, 404);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn streaks_for_fresh_pairs_read_as_zero() {
    let task_id = Uuid::new_v4();
    let app = init_app!(build_state(MemoryLedger::with_task(task_id)));

    let streak = fetch_streak(&app, task_id, Uuid::new_v4()).await;
    assert_eq!(streak["currentStreak"], 0);
    assert_eq!(streak["longestStreak"], 0);
    assert_eq!(streak["lastCompletedDate"], Value::Null);
}

#[actix_web::test]
async fn backdated_completion_keeps_counters_under_the_default_policy() {
    let task_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let app = init_app!(build_state(MemoryLedger::with_task(task_id)));

    for date in ["2024-02-09", "2024-02-10"] {
        let (status, _) = post_completion(&app, task_id, user_id, date).await;
        assert_eq!(status, 200);
    }
    let (status, _) = post_completion(&app, task_id, user_id, "2024-02-05").await;
    assert_eq!(status, 200);

    let streak = fetch_streak(&app, task_id, user_id).await;
    assert_eq!(streak["currentStreak"], 2);
    assert_eq!(streak["longestStreak"], 2);
    assert_eq!(streak["lastCompletedDate"], "2024-02-05");
}
