//! Completion ledger entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completion event: a user finished a task on a calendar date.
///
/// ## Invariants
/// - At most one entry exists per `(task_id, user_id, date)` triple; the
///   persistence layer enforces this with a unique constraint.
/// - Entries are append-only. They are never mutated after creation and are
///   only removed when the owning task is deleted.
///
/// `date` is the unit of streak accounting. `completed_at` records the wall
/// clock of the action and carries no streak semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    /// Ledger entry identifier.
    pub id: Uuid,
    /// The completed task.
    pub task_id: Uuid,
    /// The user who completed it.
    pub user_id: Uuid,
    /// Calendar date the completion counts towards.
    pub date: NaiveDate,
    /// Wall-clock timestamp of the completion request (informational).
    pub completed_at: DateTime<Utc>,
    /// Optional free-text note attached by the user.
    pub notes: Option<String>,
}
