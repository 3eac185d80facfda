//! Driving port for completion and streak reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DomainResult, Streak, TaskCompletion};

/// Driving port: read completions and derived streaks.
#[async_trait]
pub trait CompletionQuery: Send + Sync {
    /// The streak for a `(task, user)` pair, or the zero-value default when
    /// no completion exists yet. The default is never persisted by a read.
    async fn streak_for_user(&self, task_id: Uuid, user_id: Uuid) -> DomainResult<Streak>;

    /// All completions recorded for a task, in insertion order.
    async fn completions_for_task(&self, task_id: Uuid) -> DomainResult<Vec<TaskCompletion>>;
}
