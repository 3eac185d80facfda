//! PostgreSQL-backed task existence adapter.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TaskGate, TaskGateError};

use super::diesel_helpers::{is_connection_error, map_diesel_error_message, map_pool_error_message};
use super::pool::{DbPool, PoolError};
use super::schema::tasks;

/// Diesel-backed implementation of the task existence port.
#[derive(Clone)]
pub struct DieselTaskGate {
    pool: DbPool,
}

impl DieselTaskGate {
    /// Create a new gate with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskGateError {
    TaskGateError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> TaskGateError {
    let message = map_diesel_error_message(error, "task exists");
    if is_connection_error(error) {
        TaskGateError::connection(message)
    } else {
        TaskGateError::query(message)
    }
}

#[async_trait]
impl TaskGate for DieselTaskGate {
    async fn task_exists(&self, task_id: Uuid) -> Result<bool, TaskGateError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(tasks::table.find(task_id)))
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(&error))
    }
}
