//! Driven port for reading persisted streak rows.
//!
//! Writes go through [`super::CompletionLedger::record`], which couples the
//! streak upsert to the ledger insert; this port only serves reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Streak;

use super::define_port_error;

define_port_error! {
    /// Errors raised by streak store adapters.
    pub enum StreakStoreError {
        /// Streak storage could not be reached.
        Connection { message: String } =>
            "streak store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "streak store query failed: {message}",
    }
}

/// Port for streak row lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreakStore: Send + Sync {
    /// Fetch the persisted streak row for a `(task, user)` pair.
    ///
    /// Returns `None` when no completion has ever been recorded for the pair;
    /// callers substitute the zero-value default without persisting it.
    async fn find_streak(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Streak>, StreakStoreError>;
}

/// Fixture implementation reporting no persisted streaks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStreakStore;

#[async_trait]
impl StreakStore for FixtureStreakStore {
    async fn find_streak(
        &self,
        _task_id: Uuid,
        _user_id: Uuid,
    ) -> Result<Option<Streak>, StreakStoreError> {
        Ok(None)
    }
}
