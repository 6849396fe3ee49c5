//! Request logging middleware.
//!
//! Emits one structured `tracing` event per request once the rest of the
//! chain has finished.
//!
//! # Log Format
//!
//! - `method` - HTTP method
//! - `path` - Request path
//! - `status` - Response status (or the error's status when the chain failed)
//! - `duration_ms` - Time spent in the downstream chain
//!
//! Successful requests log at `INFO`, failed ones at `WARN` with an `error`
//! field. The same data is stored on the context under [`REQUEST_LOG_KEY`] so
//! outer middleware can inspect it.
//!
//! # Example
//!
//! ```rust
//! use tessera_middleware::stages::LoggerMiddleware;
//!
//! let logger = LoggerMiddleware::builder()
//!     .skip_path("/health")
//!     .build();
//! ```

use std::sync::Arc;
use std::time::Instant;

use http::{Method, StatusCode};
use tessera_core::{handler, Handler};

use crate::middleware::{BoxedMiddleware, Middleware};

/// Context key under which the [`RequestLog`] of a request is stored.
pub const REQUEST_LOG_KEY: &str = "tessera.request_log";

/// What the logger recorded about one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLog {
    /// The HTTP method.
    pub method: Method,
    /// The request path.
    pub path: String,
    /// The response status.
    pub status: StatusCode,
    /// Time spent downstream, in milliseconds.
    pub duration_ms: f64,
    /// Whether the chain returned an error.
    pub failed: bool,
}

/// Logs every request that passes through it.
#[derive(Debug, Clone, Default)]
pub struct LoggerMiddleware {
    skip_paths: Arc<Vec<String>>,
}

impl LoggerMiddleware {
    /// Creates a logger for all paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for more detailed configuration.
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    fn skips(&self, path: &str) -> bool {
        self.skip_paths.iter().any(|p| p == path)
    }
}

impl Middleware for LoggerMiddleware {
    fn name(&self) -> &'static str {
        "logger"
    }

    fn wrap(&self, next: Handler) -> Handler {
        let this = self.clone();
        handler(move |ctx| {
            if this.skips(ctx.path()) {
                return next(ctx);
            }

            let start = Instant::now();
            let method = ctx.method().clone();
            let path = ctx.path().to_string();

            let result = next(ctx);

            let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
            let status = match &result {
                Ok(()) => ctx.response().status(),
                Err(err) => err.status_code(),
            };

            match &result {
                Ok(()) => tracing::info!(
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms,
                    "request completed"
                ),
                Err(err) => tracing::warn!(
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms,
                    error = %err,
                    "request failed"
                ),
            }

            ctx.set(
                REQUEST_LOG_KEY,
                RequestLog {
                    method,
                    path,
                    status,
                    duration_ms,
                    failed: result.is_err(),
                },
            );
            result
        })
    }
}

/// Builder for [`LoggerMiddleware`].
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    skip_paths: Vec<String>,
}

impl LoggerBuilder {
    /// Excludes an exact path from logging.
    #[must_use]
    pub fn skip_path(mut self, path: impl Into<String>) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    /// Builds the logger middleware.
    #[must_use]
    pub fn build(self) -> LoggerMiddleware {
        LoggerMiddleware {
            skip_paths: Arc::new(self.skip_paths),
        }
    }
}

/// Returns the request logger with default settings.
#[must_use]
pub fn logger() -> BoxedMiddleware {
    Arc::new(LoggerMiddleware::new())
}
