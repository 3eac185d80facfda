//! Domain ports: the seams between the core and its adapters.
//!
//! Driving ports ([`CompletionCommand`], [`CompletionQuery`]) are what inbound
//! adapters call. Driven ports ([`CompletionLedger`], [`StreakStore`],
//! [`TaskGate`]) are what the core calls outward, implemented by the
//! persistence layer. Every driven port carries a `Fixture*` implementation
//! for unit tests and database-less startup, and a mockall mock in test
//! builds.

mod completion_command;
mod completion_ledger;
mod completion_query;
mod macros;
mod streak_store;
mod task_gate;

pub(crate) use macros::define_port_error;

pub use completion_command::{CompletionCommand, RecordCompletionRequest};
pub use completion_ledger::{
    CompletionLedger, CompletionLedgerError, FixtureCompletionLedger, NewCompletion, RecordOutcome,
};
pub use completion_query::CompletionQuery;
pub use streak_store::{FixtureStreakStore, StreakStore, StreakStoreError};
pub use task_gate::{FixtureTaskGate, TaskGate, TaskGateError};

#[cfg(test)]
pub use completion_ledger::MockCompletionLedger;
#[cfg(test)]
pub use streak_store::MockStreakStore;
#[cfg(test)]
pub use task_gate::MockTaskGate;
