//! Completion recording and streak query services.

mod service;

pub use service::CompletionService;
