//! Bundled middleware.
//!
//! - [`logger`] - One structured `tracing` event per request
//! - [`recover`] - Turns downstream panics into a 500 response

pub mod logger;
pub mod recover;

pub use logger::{logger, LoggerBuilder, LoggerMiddleware, RequestLog, REQUEST_LOG_KEY};
pub use recover::{recover, RecoverMiddleware, RecoverMode};
