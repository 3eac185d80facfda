//! PostgreSQL-backed completion ledger adapter.
//!
//! The write path runs as one transaction: append the ledger row, seed the
//! streak row if absent, lock it, apply the streak transition, and persist
//! the result. Either everything commits or nothing does. Uniqueness of the
//! `(task, user, date)` triple is enforced by the database index; a losing
//! concurrent writer observes a zero-row insert and reports the existing
//! entry as a duplicate.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::TaskCompletion;
use crate::domain::ports::{CompletionLedger, CompletionLedgerError, NewCompletion, RecordOutcome};
use crate::domain::streak::{BackdatedCompletion, BackdatingPolicy, apply_completion};

use super::diesel_helpers::{
    is_connection_error, is_task_foreign_key_violation, map_diesel_error_message,
    map_pool_error_message,
};
use super::models::{CompletionRow, NewCompletionRow, NewStreakRow, StreakRow, StreakUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{streaks, task_completions};

/// Diesel-backed implementation of the completion ledger port.
#[derive(Clone)]
pub struct DieselCompletionLedger {
    pool: DbPool,
    policy: BackdatingPolicy,
}

impl DieselCompletionLedger {
    /// Create a new ledger adapter with the given connection pool and
    /// backdating policy.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/mydb")).await?;
    /// let ledger = DieselCompletionLedger::new(pool, BackdatingPolicy::Preserve);
    /// ```
    pub fn new(pool: DbPool, policy: BackdatingPolicy) -> Self {
        Self { pool, policy }
    }
}

/// Failure inside the record transaction.
///
/// Distinguishes a policy rejection (which must roll the ledger insert back)
/// from database errors so both can abort the transaction through the same
/// error channel.
#[derive(Debug)]
enum TxError {
    Database(diesel::result::Error),
    Backdated(BackdatedCompletion),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl std::fmt::Display for TxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(error) => error.fmt(f),
            Self::Backdated(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for TxError {}

fn map_pool_error(error: PoolError) -> CompletionLedgerError {
    CompletionLedgerError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error, operation: &str) -> CompletionLedgerError {
    if is_connection_error(error) {
        return CompletionLedgerError::connection(map_diesel_error_message(error, operation));
    }
    if is_task_foreign_key_violation(error) {
        return CompletionLedgerError::task_not_found("referenced task");
    }
    CompletionLedgerError::query(map_diesel_error_message(error, operation))
}

fn map_tx_error(error: TxError, operation: &str) -> CompletionLedgerError {
    match error {
        TxError::Database(error) => map_diesel_error(&error, operation),
        TxError::Backdated(error) => {
            CompletionLedgerError::backdated(error.last_completed, error.attempted)
        }
    }
}

#[async_trait]
impl CompletionLedger for DieselCompletionLedger {
    async fn find_completion(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<TaskCompletion>, CompletionLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CompletionRow> = task_completions::table
            .filter(task_completions::task_id.eq(task_id))
            .filter(task_completions::user_id.eq(user_id))
            .filter(task_completions::date.eq(date))
            .select(CompletionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(&error, "find completion"))?;

        Ok(row.map(TaskCompletion::from))
    }

    async fn record(&self, entry: NewCompletion) -> Result<RecordOutcome, CompletionLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let policy = self.policy;

        conn.transaction::<RecordOutcome, TxError, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(task_completions::table)
                    .values(NewCompletionRow::from(&entry))
                    .on_conflict((
                        task_completions::task_id,
                        task_completions::user_id,
                        task_completions::date,
                    ))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                if inserted == 0 {
                    // Lost the same-day race (or a replayed request slipped
                    // past the service pre-check): report the winner's entry.
                    let existing: CompletionRow = task_completions::table
                        .filter(task_completions::task_id.eq(entry.task_id))
                        .filter(task_completions::user_id.eq(entry.user_id))
                        .filter(task_completions::date.eq(entry.date))
                        .select(CompletionRow::as_select())
                        .first(conn)
                        .await?;
                    return Ok(RecordOutcome::Duplicate {
                        existing: existing.into(),
                    });
                }

                // Seed the zero row if this pair has never completed before,
                // then lock it so concurrent cross-date transitions serialise.
                diesel::insert_into(streaks::table)
                    .values(NewStreakRow::zero(entry.task_id, entry.user_id))
                    .on_conflict((streaks::task_id, streaks::user_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                let row: StreakRow = streaks::table
                    .find((entry.task_id, entry.user_id))
                    .select(StreakRow::as_select())
                    .for_update()
                    .first(conn)
                    .await?;

                let updated = apply_completion(&row.into(), entry.date, policy)
                    .map_err(TxError::Backdated)?;

                diesel::update(streaks::table.find((entry.task_id, entry.user_id)))
                    .set(StreakUpdate::from(&updated))
                    .execute(conn)
                    .await?;

                Ok(RecordOutcome::Recorded {
                    completion: entry.to_completion(),
                    streak: updated,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_tx_error(error, "record completion"))
    }

    async fn completions_for_task(
        &self,
        task_id: Uuid,
    ) -> Result<Vec<TaskCompletion>, CompletionLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CompletionRow> = task_completions::table
            .filter(task_completions::task_id.eq(task_id))
            .select(CompletionRow::as_select())
            .order_by((task_completions::completed_at, task_completions::id))
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(&error, "list completions"))?;

        Ok(rows.into_iter().map(TaskCompletion::from).collect())
    }
}
