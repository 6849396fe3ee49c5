//! Request handlers.
//!
//! A [`Handler`] is a shared, type-erased function over a [`Context`]. The
//! same type is used for route endpoints, not-found fallbacks and the
//! closures produced by wrapping middleware, so the whole chain is built out
//! of one shape.

use std::sync::Arc;

use crate::{Context, HandlerResult};

/// A shared request handler.
///
/// Handlers are synchronous: they read the request from the context and write
/// the response into it, returning an error only when the request failed.
pub type Handler = Arc<dyn Fn(&mut Context) -> HandlerResult + Send + Sync>;

/// Turns a closure or function into a [`Handler`].
///
/// # Example
///
/// ```
/// use tessera_core::{handler, Context, HandlerResult};
/// use http::StatusCode;
///
/// fn hello(ctx: &mut Context) -> HandlerResult {
///     let name = ctx.param("name").unwrap_or("world").to_string();
///     ctx.text(StatusCode::OK, format!("hello {name}"))
/// }
///
/// let h = handler(hello);
/// let mut ctx = Context::new();
/// h(&mut ctx).unwrap();
/// assert_eq!(ctx.response().body(), "hello world");
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}
