//! Panic recovery middleware.
//!
//! Catches a panic anywhere downstream, logs it with `tracing::error!` and
//! answers `500 Internal Server Error` instead of tearing down the worker.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use http::StatusCode;
use tessera_core::{handler, Handler, HandlerError};

use crate::middleware::{BoxedMiddleware, Middleware};

/// Body written when a panic is recovered.
pub const RECOVERED_BODY: &str = "Internal Server Error";

/// What to do once a panic was caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoverMode {
    /// Replace the response with a plain-text 500.
    #[default]
    Respond,
    /// Return [`HandlerError::Panic`] to the caller.
    Error,
}

/// Converts downstream panics into a response or an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoverMiddleware {
    mode: RecoverMode,
}

impl RecoverMiddleware {
    /// Creates a recovery middleware that answers with a 500 response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recovery middleware that reports panics as errors.
    #[must_use]
    pub fn as_error() -> Self {
        Self {
            mode: RecoverMode::Error,
        }
    }

    /// Returns the configured mode.
    #[must_use]
    pub fn mode(&self) -> RecoverMode {
        self.mode
    }
}

impl Middleware for RecoverMiddleware {
    fn name(&self) -> &'static str {
        "recover"
    }

    fn wrap(&self, next: Handler) -> Handler {
        let mode = self.mode;
        handler(move |ctx| {
            let payload = match panic::catch_unwind(AssertUnwindSafe(|| next(ctx))) {
                Ok(result) => return result,
                Err(payload) => payload,
            };

            let message = panic_message(payload.as_ref());
            tracing::error!(
                method = %ctx.method(),
                path = %ctx.path(),
                panic = %message,
                "panic recovered"
            );

            match mode {
                RecoverMode::Respond => {
                    ctx.response_mut().reset();
                    ctx.text(StatusCode::INTERNAL_SERVER_ERROR, RECOVERED_BODY)
                }
                RecoverMode::Error => Err(HandlerError::Panic(message)),
            }
        })
    }
}

/// Extracts the text of a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Returns the panic recovery middleware with default settings.
#[must_use]
pub fn recover() -> BoxedMiddleware {
    Arc::new(RecoverMiddleware::new())
}
