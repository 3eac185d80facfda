//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits for infrastructure concerns:
//!
//! - **persistence**: PostgreSQL-backed adapters using Diesel ORM
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic,
//! with one deliberate exception: the completion ledger adapter invokes the
//! domain streak transition inside its transaction so the ledger insert and
//! the streak update commit together.

pub mod persistence;
