//! Middleware adapters.
//!
//! Two ways of writing middleware without implementing [`Middleware`] by
//! hand:
//!
//! - [`from_next`]: a plain `Fn(&mut Context)` that continues the chain with
//!   [`Context::next`] and may stop it with [`Context::abort`]
//! - [`around`]: a function that receives the wrapped handler explicitly and
//!   decides itself whether and how to call it

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tessera_core::{handler, Context, Handler, HandlerResult};

use crate::middleware::{BoxedMiddleware, Middleware};

/// Runs `body` with `next` installed as the context's continuation.
///
/// The previous continuation and abort flag are put back afterwards, also
/// when `body` panics; the panic then continues unwinding.
pub fn with_continuation<R>(
    ctx: &mut Context,
    next: Handler,
    body: impl FnOnce(&mut Context) -> R,
) -> R {
    let saved = ctx.install_continuation(next);
    let result = panic::catch_unwind(AssertUnwindSafe(|| body(ctx)));
    ctx.restore_continuation(saved);
    match result {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

struct NextMiddleware<F> {
    name: &'static str,
    func: Arc<F>,
}

impl<F> Middleware for NextMiddleware<F>
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap(&self, next: Handler) -> Handler {
        let func = Arc::clone(&self.func);
        handler(move |ctx| with_continuation(ctx, Arc::clone(&next), |ctx| func(ctx)))
    }
}

/// Adapts a continuation-style function into middleware.
///
/// Inside `f`, [`Context::next`] runs the rest of the chain and
/// [`Context::abort`] makes later `next` calls no-ops.
///
/// # Example
///
/// ```
/// use tessera_core::{handler, Context};
/// use tessera_middleware::{compose, from_next};
/// use http::StatusCode;
///
/// let auth = from_next("auth", |ctx: &mut Context| {
///     if ctx.header("authorization").is_none() {
///         ctx.abort();
///         return ctx.text(StatusCode::UNAUTHORIZED, "login required");
///     }
///     ctx.next()
/// });
///
/// let chain = compose(handler(|ctx| ctx.text(StatusCode::OK, "secret")), &[auth]);
/// let mut ctx = Context::new();
/// chain(&mut ctx).unwrap();
/// assert_eq!(ctx.response().status(), StatusCode::UNAUTHORIZED);
/// ```
pub fn from_next<F>(name: &'static str, f: F) -> BoxedMiddleware
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(NextMiddleware {
        name,
        func: Arc::new(f),
    })
}

struct AroundMiddleware<F> {
    name: &'static str,
    func: Arc<F>,
}

impl<F> Middleware for AroundMiddleware<F>
where
    F: Fn(&mut Context, &Handler) -> HandlerResult + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap(&self, next: Handler) -> Handler {
        let func = Arc::clone(&self.func);
        handler(move |ctx| func(ctx, &next))
    }
}

/// Adapts a function that receives the wrapped handler explicitly.
///
/// The function calls `next(ctx)` itself; nothing is installed on the
/// context, so [`Context::next`] inside it refers to the enclosing chain.
///
/// # Example
///
/// ```
/// use tessera_core::{handler, Context, Handler};
/// use tessera_middleware::{around, compose};
/// use http::StatusCode;
///
/// let server_header = around("server-header", |ctx: &mut Context, next: &Handler| {
///     next(ctx)?;
///     ctx.set_header("server", "tessera")?;
///     Ok(())
/// });
///
/// let chain = compose(handler(|ctx| ctx.text(StatusCode::OK, "ok")), &[server_header]);
/// let mut ctx = Context::new();
/// chain(&mut ctx).unwrap();
/// assert_eq!(ctx.response().headers()["server"], "tessera");
/// ```
pub fn around<F>(name: &'static str, f: F) -> BoxedMiddleware
where
    F: Fn(&mut Context, &Handler) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(AroundMiddleware {
        name,
        func: Arc::new(f),
    })
}
