//! Driving port for recording task completions.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{DomainResult, TaskCompletion};

/// Request to record a completion for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCompletionRequest {
    /// The task being completed.
    pub task_id: Uuid,
    /// The user completing it. Identity is always explicit per request; there
    /// is no ambient current-user.
    pub user_id: Uuid,
    /// Calendar date the completion counts towards. Defaults to the current
    /// UTC date when omitted.
    pub date: Option<NaiveDate>,
    /// Optional free-text note.
    pub notes: Option<String>,
}

/// Driving port: record a completion idempotently.
///
/// Recording the same `(task, user, date)` twice returns the original ledger
/// entry unchanged; callers cannot tell a replay from a first call.
#[async_trait]
pub trait CompletionCommand: Send + Sync {
    /// Record a completion, creating the ledger entry and updating the streak
    /// when the day is new for the pair.
    async fn record_completion(
        &self,
        request: RecordCompletionRequest,
    ) -> DomainResult<TaskCompletion>;
}
