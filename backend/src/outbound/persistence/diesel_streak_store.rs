//! PostgreSQL-backed streak read adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::Streak;
use crate::domain::ports::{StreakStore, StreakStoreError};

use super::diesel_helpers::{is_connection_error, map_diesel_error_message, map_pool_error_message};
use super::models::StreakRow;
use super::pool::{DbPool, PoolError};
use super::schema::streaks;

/// Diesel-backed implementation of the streak read port.
#[derive(Clone)]
pub struct DieselStreakStore {
    pool: DbPool,
}

impl DieselStreakStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StreakStoreError {
    StreakStoreError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> StreakStoreError {
    let message = map_diesel_error_message(error, "find streak");
    if is_connection_error(error) {
        StreakStoreError::connection(message)
    } else {
        StreakStoreError::query(message)
    }
}

#[async_trait]
impl StreakStore for DieselStreakStore {
    async fn find_streak(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Streak>, StreakStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<StreakRow> = streaks::table
            .find((task_id, user_id))
            .select(StreakRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(&error))?;

        Ok(row.map(Streak::from))
    }
}
