//! Completion domain service.
//!
//! Implements the driving ports over the ledger, streak store, and task gate.
//! The service owns the idempotent-absorb contract: duplicate same-day
//! completions return the original entry with no new write and no streak
//! update.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    CompletionCommand, CompletionLedger, CompletionLedgerError, CompletionQuery, NewCompletion,
    RecordCompletionRequest, RecordOutcome, StreakStore, StreakStoreError, TaskGate, TaskGateError,
};
use crate::domain::{DomainResult, Error, Streak, TaskCompletion};

/// Completion service implementing the driving ports.
#[derive(Clone)]
pub struct CompletionService<L, S, G> {
    ledger: Arc<L>,
    streaks: Arc<S>,
    tasks: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<L, S, G> CompletionService<L, S, G> {
    /// Create a new service with the given driven ports and clock.
    pub fn new(ledger: Arc<L>, streaks: Arc<S>, tasks: Arc<G>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger,
            streaks,
            tasks,
            clock,
        }
    }
}

impl<L, S, G> CompletionService<L, S, G>
where
    L: CompletionLedger,
    S: StreakStore,
    G: TaskGate,
{
    fn map_ledger_error(error: CompletionLedgerError) -> Error {
        match error {
            CompletionLedgerError::Connection { message } => {
                Error::service_unavailable(format!("completion ledger unavailable: {message}"))
            }
            CompletionLedgerError::Query { message } => {
                Error::internal(format!("completion ledger error: {message}"))
            }
            CompletionLedgerError::TaskNotFound { task_id } => task_not_found(&task_id),
            CompletionLedgerError::Backdated {
                last_completed,
                attempted,
            } => Error::conflict("completion predates last applied completion").with_details(
                json!({
                    "lastCompletedDate": last_completed,
                    "attemptedDate": attempted,
                    "code": "backdated_completion",
                }),
            ),
        }
    }

    fn map_streak_error(error: StreakStoreError) -> Error {
        match error {
            StreakStoreError::Connection { message } => {
                Error::service_unavailable(format!("streak store unavailable: {message}"))
            }
            StreakStoreError::Query { message } => {
                Error::internal(format!("streak store error: {message}"))
            }
        }
    }

    fn map_gate_error(error: TaskGateError) -> Error {
        match error {
            TaskGateError::Connection { message } => {
                Error::service_unavailable(format!("task gate unavailable: {message}"))
            }
            TaskGateError::Query { message } => {
                Error::internal(format!("task gate error: {message}"))
            }
        }
    }

    async fn require_task(&self, task_id: Uuid) -> DomainResult<()> {
        let exists = self
            .tasks
            .task_exists(task_id)
            .await
            .map_err(Self::map_gate_error)?;
        if exists {
            Ok(())
        } else {
            Err(task_not_found(&task_id.to_string()))
        }
    }

    fn completion_date(&self, requested: Option<NaiveDate>) -> NaiveDate {
        requested.unwrap_or_else(|| self.clock.utc().date_naive())
    }
}

fn task_not_found(task_id: &str) -> Error {
    Error::not_found("task not found").with_details(json!({
        "taskId": task_id,
        "code": "task_not_found",
    }))
}

#[async_trait]
impl<L, S, G> CompletionCommand for CompletionService<L, S, G>
where
    L: CompletionLedger,
    S: StreakStore,
    G: TaskGate,
{
    async fn record_completion(
        &self,
        request: RecordCompletionRequest,
    ) -> DomainResult<TaskCompletion> {
        self.require_task(request.task_id).await?;

        let date = self.completion_date(request.date);

        if let Some(existing) = self
            .ledger
            .find_completion(request.task_id, request.user_id, date)
            .await
            .map_err(Self::map_ledger_error)?
        {
            warn!(
                task_id = %request.task_id,
                user_id = %request.user_id,
                %date,
                "task already completed on this date"
            );
            return Ok(existing);
        }

        let entry = NewCompletion {
            id: Uuid::new_v4(),
            task_id: request.task_id,
            user_id: request.user_id,
            date,
            completed_at: self.clock.utc(),
            notes: request.notes,
        };

        let outcome = self
            .ledger
            .record(entry)
            .await
            .map_err(Self::map_ledger_error)?;

        match outcome {
            RecordOutcome::Recorded { completion, streak } => {
                info!(
                    task_id = %completion.task_id,
                    user_id = %completion.user_id,
                    current_streak = streak.current_streak,
                    longest_streak = streak.longest_streak,
                    "task completed"
                );
                Ok(completion)
            }
            RecordOutcome::Duplicate { existing } => {
                // A concurrent request won the insert race after the
                // pre-check; the idempotent contract absorbs it.
                warn!(
                    task_id = %existing.task_id,
                    user_id = %existing.user_id,
                    %date,
                    "task already completed on this date"
                );
                Ok(existing)
            }
        }
    }
}

#[async_trait]
impl<L, S, G> CompletionQuery for CompletionService<L, S, G>
where
    L: CompletionLedger,
    S: StreakStore,
    G: TaskGate,
{
    async fn streak_for_user(&self, task_id: Uuid, user_id: Uuid) -> DomainResult<Streak> {
        self.require_task(task_id).await?;

        let stored = self
            .streaks
            .find_streak(task_id, user_id)
            .await
            .map_err(Self::map_streak_error)?;

        Ok(stored.unwrap_or_else(|| Streak::zero(task_id, user_id)))
    }

    async fn completions_for_task(&self, task_id: Uuid) -> DomainResult<Vec<TaskCompletion>> {
        self.require_task(task_id).await?;

        self.ledger
            .completions_for_task(task_id)
            .await
            .map_err(Self::map_ledger_error)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
