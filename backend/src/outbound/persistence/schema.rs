//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Tasks table.
    ///
    /// Minimal existence record: the completion core only gates on the `id`
    /// column, richer task attributes live with the owning service.
    tasks (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable task title.
        title -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only completion ledger.
    ///
    /// A unique index over `(task_id, user_id, date)` enforces at most one
    /// completion per task per user per calendar day. Rows are never updated
    /// or deleted except by cascade when the task is removed.
    task_completions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Completed task (FK to `tasks`, cascade on delete).
        task_id -> Uuid,
        /// Completing user.
        user_id -> Uuid,
        /// Calendar date the completion counts towards.
        date -> Date,
        /// Wall-clock timestamp of the completion request.
        completed_at -> Timestamptz,
        /// Optional free-text note.
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Derived streak counters, one row per `(task, user)` pair.
    ///
    /// Rows are created lazily by the first recorded completion; absence of a
    /// row means zero counters.
    streaks (task_id, user_id) {
        /// The task the streak belongs to (FK to `tasks`, cascade on delete).
        task_id -> Uuid,
        /// The user the streak belongs to.
        user_id -> Uuid,
        /// Consecutive calendar days ending at `last_completed_date`.
        current_streak -> Int4,
        /// Historical maximum of `current_streak`.
        longest_streak -> Int4,
        /// Date of the most recently applied completion.
        last_completed_date -> Nullable<Date>,
    }
}

diesel::joinable!(task_completions -> tasks (task_id));
diesel::joinable!(streaks -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, task_completions, streaks);
