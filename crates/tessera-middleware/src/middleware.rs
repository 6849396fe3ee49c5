//! Core middleware trait and composition.
//!
//! A [`Middleware`] turns a [`Handler`] into a new [`Handler`] that usually
//! runs some code around the original. Chains are built by folding a list of
//! middleware over the endpoint with [`compose`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tessera_core::{handler, Context, Handler};
//! use tessera_middleware::{compose, BoxedMiddleware, FnMiddleware};
//! use http::StatusCode;
//!
//! let shout: BoxedMiddleware = Arc::new(FnMiddleware::new("shout", |next: Handler| {
//!     handler(move |ctx: &mut Context| {
//!         next(ctx)?;
//!         let body = String::from_utf8_lossy(ctx.response().body()).to_uppercase();
//!         ctx.text(StatusCode::OK, body)
//!     })
//! }));
//!
//! let chain = compose(handler(|ctx| ctx.text(StatusCode::OK, "hi")), &[shout]);
//! let mut ctx = Context::new();
//! chain(&mut ctx).unwrap();
//! assert_eq!(ctx.response().body(), "HI");
//! ```

use std::fmt;
use std::sync::Arc;

use tessera_core::Handler;

/// The core middleware trait.
///
/// # Invariants
///
/// - The returned handler SHOULD call the wrapped handler at most once
/// - Errors from the wrapped handler SHOULD be returned, not swallowed,
///   unless the middleware writes its own response instead
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware.
    ///
    /// This name is used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Wraps `next`, returning the handler that runs in its place.
    fn wrap(&self, next: Handler) -> Handler;
}

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

impl fmt::Debug for dyn Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware").field(&self.name()).finish()
    }
}

/// A middleware built from a `Fn(Handler) -> Handler` closure.
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap(&self, next: Handler) -> Handler {
        (self.func)(next)
    }
}

/// Wraps `handler` in `middleware`.
///
/// The fold runs from the last middleware to the first, so `middleware[0]`
/// ends up outermost and runs first.
#[must_use]
pub fn compose(handler: Handler, middleware: &[BoxedMiddleware]) -> Handler {
    middleware
        .iter()
        .rev()
        .fold(handler, |next, mw| mw.wrap(next))
}

/// Returns the names of `middleware` in execution order.
#[must_use]
pub fn names(middleware: &[BoxedMiddleware]) -> Vec<&'static str> {
    middleware.iter().map(|mw| mw.name()).collect()
}
