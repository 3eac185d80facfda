//! Domain primitives and the streak-tracking core.
//!
//! Purpose: define the transport-agnostic types and algorithms that the HTTP
//! and persistence layers orbit around. The streak transition in [`streak`] is
//! the only stateful algorithm in the system; everything else is plumbing
//! around it.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failure payload.
//! - [`TaskCompletion`] — one ledger entry per `(task, user, date)`.
//! - [`Streak`] / [`apply_completion`] / [`BackdatingPolicy`] — derived
//!   consecutive-day counters and their transition function.
//! - [`CompletionService`] — the driving-port implementation wiring the
//!   ledger, streak store, and task gate together.

pub mod completion;
pub mod completions;
pub mod error;
pub mod ports;
pub mod streak;

pub use self::completion::TaskCompletion;
pub use self::completions::CompletionService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::streak::{BackdatedCompletion, BackdatingPolicy, Streak, apply_completion};

/// Header carrying the request trace identifier on error responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
