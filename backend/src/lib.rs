//! Habit and todo tracking backend: completion ledger and streak tracking.
//!
//! The crate follows a ports-and-adapters layout. Domain types, the streak
//! transition algorithm, and port traits live under [`domain`]; HTTP handlers
//! under [`inbound`]; PostgreSQL adapters under [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware attaching a `Trace-Id` header.
pub use middleware::trace::Trace;
