//! # Tessera Core
//!
//! Request-time building blocks shared by the Tessera crates:
//!
//! - [`Context`] - Per-request state: parameters, values, continuation, request and response
//! - [`ContextPool`] - Free list of reusable contexts with a releasing drop-guard
//! - [`Handler`] - Shared handler type used for endpoints and middleware output
//! - [`HandlerError`] - Error returned by handlers and context helpers
//! - [`constants`] - Media type, charset and encoding values

#![doc(html_root_url = "https://docs.rs/tessera-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod constants;
mod context;
mod error;
mod handler;
mod pool;
mod response;

pub use context::{Ambient, Context, Continuation};
pub use error::{HandlerError, HandlerResult};
pub use handler::{handler, Handler};
pub use pool::{ContextPool, PooledContext};
pub use response::ResponseWriter;
pub use tessera_router::Params;

// Request and response types appear in the public API
pub use bytes;
pub use http;
