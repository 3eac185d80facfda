//! Shared helpers for Diesel adapter implementations.
//!
//! Each adapter owns its mapping into its port's error type; the helpers here
//! extract readable messages, emit debug context, and classify the database
//! error shapes that matter to the domain (lost connections and task foreign
//! key violations).

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Extract a readable message from a Diesel error and emit debug context.
pub(crate) fn map_diesel_error_message(error: &DieselError, operation: &str) -> String {
    let error_message = error.to_string();
    debug!(%error_message, %operation, "diesel operation failed");
    error_message
}

/// Whether the error reports a lost or closed database connection.
pub(crate) fn is_connection_error(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

/// Whether the error is a foreign key violation against the tasks table.
///
/// Identified by the constraint name when the driver reports one, falling
/// back to message inspection. Completion inserts hit this when the task was
/// deleted between the existence check and the write.
pub(crate) fn is_task_foreign_key_violation(error: &DieselError) -> bool {
    let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = error else {
        return false;
    };

    let constraint_matches = info
        .constraint_name()
        .map(str::to_lowercase)
        .is_some_and(|name| name.contains("task_id_fkey") || name.contains("tasks"));
    let message_matches = {
        let lower = info.message().to_lowercase();
        lower.contains("task_id_fkey") || lower.contains("tasks")
    };

    constraint_matches || message_matches
}
