//! Driven port for the task existence gate.
//!
//! Task CRUD lives elsewhere; the core only needs to know whether a task
//! exists before accepting completions or answering streak queries.

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;

define_port_error! {
    /// Errors raised by task gate adapters.
    pub enum TaskGateError {
        /// Task storage could not be reached.
        Connection { message: String } =>
            "task gate connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "task gate query failed: {message}",
    }
}

/// Port answering "does this task exist".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskGate: Send + Sync {
    /// Whether a task row exists for the identifier.
    async fn task_exists(&self, task_id: Uuid) -> Result<bool, TaskGateError>;
}

/// Fixture implementation treating every task as existing.
///
/// Used for database-less startup so completion flows remain exercisable; it
/// deliberately never gates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTaskGate;

#[async_trait]
impl TaskGate for FixtureTaskGate {
    async fn task_exists(&self, _task_id: Uuid) -> Result<bool, TaskGateError> {
        Ok(true)
    }
}
