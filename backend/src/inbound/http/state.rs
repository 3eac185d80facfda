//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CompletionCommand, CompletionQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Driving port for recording completions.
    pub completions: Arc<dyn CompletionCommand>,
    /// Driving port for streak and completion reads.
    pub completions_query: Arc<dyn CompletionQuery>,
}

impl HttpState {
    /// Bundle the driving ports used by the task endpoints.
    pub fn new(
        completions: Arc<dyn CompletionCommand>,
        completions_query: Arc<dyn CompletionQuery>,
    ) -> Self {
        Self {
            completions,
            completions_query,
        }
    }
}
