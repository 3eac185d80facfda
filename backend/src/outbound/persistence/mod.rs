//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain ports backed by
//! PostgreSQL via the Diesel ORM with async support through `diesel-async`
//! and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   port error types.
//! - **Storage-enforced uniqueness**: the `(task, user, date)` ledger
//!   constraint lives in the database schema, and the ledger adapter relies
//!   on `ON CONFLICT DO NOTHING` plus row locks rather than check-then-write.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselCompletionLedger, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/mydb");
//! let pool = DbPool::new(config).await?;
//! let ledger = DieselCompletionLedger::new(pool, BackdatingPolicy::Preserve);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_completion_ledger;
mod diesel_streak_store;
mod diesel_task_gate;
mod models;
mod pool;
mod schema;

pub use diesel_completion_ledger::DieselCompletionLedger;
pub use diesel_streak_store::DieselStreakStore;
pub use diesel_task_gate::DieselTaskGate;
pub use pool::{DbPool, PoolConfig, PoolError};
