//! Driven port for the append-only completion ledger.
//!
//! The ledger owns the `(task, user, date)` uniqueness guarantee and the
//! transactional coupling between a ledger insert and the streak update it
//! triggers. Adapters must enforce uniqueness at the storage layer, not with a
//! check-then-write in application code, so concurrent same-day requests
//! cannot both insert.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::streak::{BackdatingPolicy, apply_completion};
use crate::domain::{Streak, TaskCompletion};

use super::define_port_error;

define_port_error! {
    /// Errors raised by completion ledger adapters.
    pub enum CompletionLedgerError {
        /// Ledger storage could not be reached.
        Connection { message: String } =>
            "completion ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "completion ledger query failed: {message}",
        /// The referenced task no longer exists (foreign key violation).
        TaskNotFound { task_id: String } =>
            "task not found: {task_id}",
        /// Strict backdating mode refused a completion dated before the last
        /// applied one; the ledger insert was rolled back.
        Backdated { last_completed: NaiveDate, attempted: NaiveDate } =>
            "completion for {attempted} predates last applied completion on {last_completed}",
    }
}

/// A completion event about to enter the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompletion {
    /// Ledger entry identifier, generated by the caller.
    pub id: Uuid,
    /// The completed task.
    pub task_id: Uuid,
    /// The user who completed it.
    pub user_id: Uuid,
    /// Calendar date the completion counts towards.
    pub date: NaiveDate,
    /// Wall-clock timestamp of the completion request.
    pub completed_at: DateTime<Utc>,
    /// Optional free-text note.
    pub notes: Option<String>,
}

impl NewCompletion {
    /// View the entry as the domain completion it will become once stored.
    pub fn to_completion(&self) -> TaskCompletion {
        TaskCompletion {
            id: self.id,
            task_id: self.task_id,
            user_id: self.user_id,
            date: self.date,
            completed_at: self.completed_at,
            notes: self.notes.clone(),
        }
    }
}

/// Result of attempting to record a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new ledger entry was created and the streak updated with it.
    Recorded {
        /// The stored ledger entry.
        completion: TaskCompletion,
        /// The streak row after applying the transition.
        streak: Streak,
    },
    /// An entry already existed for the `(task, user, date)` triple; nothing
    /// was written.
    Duplicate {
        /// The pre-existing ledger entry.
        existing: TaskCompletion,
    },
}

/// Port for completion ledger storage.
///
/// [`CompletionLedger::record`] executes the ledger insert and the streak
/// read-modify-write as one atomic unit: either both commit or neither does.
/// Updates to the same `(task, user)` streak row must be serialised against
/// each other so concurrent cross-date completions cannot lose updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionLedger: Send + Sync {
    /// Fetch the ledger entry for an exact `(task, user, date)` triple.
    async fn find_completion(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<TaskCompletion>, CompletionLedgerError>;

    /// Record a completion and apply the streak transition atomically.
    ///
    /// Returns [`RecordOutcome::Duplicate`] when another entry already holds
    /// the triple, including when a concurrent writer won the race after the
    /// caller's pre-check.
    async fn record(&self, entry: NewCompletion) -> Result<RecordOutcome, CompletionLedgerError>;

    /// All completions for a task in insertion order.
    async fn completions_for_task(
        &self,
        task_id: Uuid,
    ) -> Result<Vec<TaskCompletion>, CompletionLedgerError>;
}

/// Fixture implementation backing database-less startup and unit tests.
///
/// Holds no state: lookups return empty results and `record` reports every
/// entry as newly recorded, with the streak computed from a zero row.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCompletionLedger;

#[async_trait]
impl CompletionLedger for FixtureCompletionLedger {
    async fn find_completion(
        &self,
        _task_id: Uuid,
        _user_id: Uuid,
        _date: NaiveDate,
    ) -> Result<Option<TaskCompletion>, CompletionLedgerError> {
        Ok(None)
    }

    async fn record(&self, entry: NewCompletion) -> Result<RecordOutcome, CompletionLedgerError> {
        let zero = Streak::zero(entry.task_id, entry.user_id);
        let streak = apply_completion(&zero, entry.date, BackdatingPolicy::Preserve)
            .map_err(|err| CompletionLedgerError::query(err.to_string()))?;
        Ok(RecordOutcome::Recorded {
            completion: entry.to_completion(),
            streak,
        })
    }

    async fn completions_for_task(
        &self,
        _task_id: Uuid,
    ) -> Result<Vec<TaskCompletion>, CompletionLedgerError> {
        Ok(Vec::new())
    }
}
