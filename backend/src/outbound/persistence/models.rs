//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::NewCompletion;
use crate::domain::{Streak, TaskCompletion};

use super::schema::{streaks, task_completions};

/// Row struct for reading from the task_completions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_completions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompletionRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<CompletionRow> for TaskCompletion {
    fn from(row: CompletionRow) -> Self {
        Self {
            id: row.id,
            task_id: row.task_id,
            user_id: row.user_id,
            date: row.date,
            completed_at: row.completed_at,
            notes: row.notes,
        }
    }
}

/// Insertable struct for appending ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_completions)]
pub(crate) struct NewCompletionRow<'a> {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a NewCompletion> for NewCompletionRow<'a> {
    fn from(entry: &'a NewCompletion) -> Self {
        Self {
            id: entry.id,
            task_id: entry.task_id,
            user_id: entry.user_id,
            date: entry.date,
            completed_at: entry.completed_at,
            notes: entry.notes.as_deref(),
        }
    }
}

/// Row struct for reading from the streaks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = streaks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StreakRow {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_completed_date: Option<NaiveDate>,
}

impl From<StreakRow> for Streak {
    fn from(row: StreakRow) -> Self {
        Self {
            task_id: row.task_id,
            user_id: row.user_id,
            current_streak: row.current_streak,
            longest_streak: row.longest_streak,
            last_completed_date: row.last_completed_date,
        }
    }
}

/// Insertable struct seeding a zero-value streak row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = streaks)]
pub(crate) struct NewStreakRow {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_completed_date: Option<NaiveDate>,
}

impl NewStreakRow {
    /// Zero-value seed for a `(task, user)` pair with no prior completions.
    pub(crate) fn zero(task_id: Uuid, user_id: Uuid) -> Self {
        Self {
            task_id,
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
        }
    }
}

/// Changeset struct applying a streak transition to an existing row.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = streaks)]
pub(crate) struct StreakUpdate {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_completed_date: Option<NaiveDate>,
}

impl From<&Streak> for StreakUpdate {
    fn from(streak: &Streak) -> Self {
        Self {
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            last_completed_date: streak.last_completed_date,
        }
    }
}
