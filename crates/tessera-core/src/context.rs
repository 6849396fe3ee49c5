//! Per-request context.
//!
//! A [`Context`] carries everything one request needs on its way through the
//! middleware chain: captured path parameters, a string-keyed value map, the
//! continuation used by [`Context::next`], the inbound request and the
//! outbound [`ResponseWriter`]. Contexts are recycled by the
//! [`ContextPool`](crate::ContextPool); [`Context::reset`] empties them in
//! place so their allocations are kept.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{Method, Request};
use tessera_router::Params;

use crate::response::ResponseWriter;
use crate::{Handler, HandlerResult};

/// Shared, type-erased state made available to every request.
pub type Ambient = Arc<dyn Any + Send + Sync>;

/// Saved continuation state, restored after a middleware's own call.
///
/// Produced by [`Context::install_continuation`] and consumed by
/// [`Context::restore_continuation`].
#[must_use = "the previous continuation must be restored"]
pub struct Continuation {
    next: Option<Handler>,
    aborted: bool,
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("next", &self.next.is_some())
            .field("aborted", &self.aborted)
            .finish()
    }
}

/// Request-scoped state handed to every handler and middleware.
///
/// # Example
///
/// ```
/// use tessera_core::Context;
///
/// let mut ctx = Context::new();
/// ctx.params_mut().push("id", "42");
/// ctx.set("user", String::from("alice"));
///
/// assert_eq!(ctx.param("id"), Some("42"));
/// assert_eq!(ctx.get::<String>("user").map(String::as_str), Some("alice"));
/// assert_eq!(ctx.get::<u32>("user"), None);
/// ```
pub struct Context {
    params: Params,
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
    next: Option<Handler>,
    aborted: bool,
    request: Request<Bytes>,
    response: ResponseWriter,
    ambient: Option<Ambient>,
    started_at: Instant,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("params", &self.params)
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .field("has_next", &self.next.is_some())
            .field("aborted", &self.aborted)
            .field("status", &self.response.status())
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates an empty context with a default `GET /` request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: Params::new(),
            values: HashMap::new(),
            next: None,
            aborted: false,
            request: Request::default(),
            response: ResponseWriter::new(),
            ambient: None,
            started_at: Instant::now(),
        }
    }

    /// Creates a context around `request`.
    #[must_use]
    pub fn with_request(request: Request<Bytes>) -> Self {
        let mut ctx = Self::new();
        ctx.request = request;
        ctx
    }

    /// Prepares a recycled context for a new request.
    pub(crate) fn attach(&mut self, request: Request<Bytes>, ambient: Option<Ambient>) {
        self.reset();
        self.request = request;
        self.ambient = ambient;
        self.started_at = Instant::now();
    }

    /// Empties the context in place.
    ///
    /// Both maps keep their capacity. The request, response and ambient
    /// reference are dropped and the continuation and abort flag cleared.
    pub fn reset(&mut self) {
        self.params.clear();
        self.values.clear();
        self.next = None;
        self.aborted = false;
        self.request = Request::default();
        self.response.reset();
        self.ambient = None;
    }

    /// Returns the path parameter captured under `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns all captured path parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the captured path parameters mutably.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set<V: Any + Send + Sync>(&mut self, key: impl Into<String>, value: V) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Returns the value stored under `key` if it has type `V`.
    #[must_use]
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.values.get(key)?.downcast_ref()
    }

    /// Returns the value stored under `key` mutably if it has type `V`.
    pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> {
        self.values.get_mut(key)?.downcast_mut()
    }

    /// Returns `true` if any value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes and returns the value stored under `key` if it has type `V`.
    ///
    /// A value of another type is left in place.
    pub fn remove<V: Any>(&mut self, key: &str) -> Option<V> {
        if !self.values.get(key)?.is::<V>() {
            return None;
        }
        let boxed: Box<dyn Any> = self.values.remove(key)?;
        boxed.downcast::<V>().ok().map(|v| *v)
    }

    /// Runs the rest of the chain.
    ///
    /// Returns `Ok(())` without doing anything when the context was aborted
    /// or no continuation is installed.
    ///
    /// # Errors
    ///
    /// Propagates the error of the downstream handler.
    pub fn next(&mut self) -> HandlerResult {
        if self.aborted {
            return Ok(());
        }
        let Some(next) = self.next.take() else {
            return Ok(());
        };
        // The continuation is not visible to itself while it runs.
        let result = next(self);
        self.next = Some(next);
        result
    }

    /// Stops the chain: later calls to [`next`](Self::next) do nothing.
    ///
    /// Code already on the stack keeps running.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    /// Returns `true` once [`abort`](Self::abort) was called.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Installs `next` as the continuation, returning the state it replaced.
    ///
    /// The abort flag is cleared for the new continuation's scope.
    pub fn install_continuation(&mut self, next: Handler) -> Continuation {
        let saved = Continuation {
            next: self.next.replace(next),
            aborted: self.aborted,
        };
        self.aborted = false;
        saved
    }

    /// Puts back a continuation saved by
    /// [`install_continuation`](Self::install_continuation).
    pub fn restore_continuation(&mut self, saved: Continuation) {
        self.next = saved.next;
        self.aborted = saved.aborted;
    }

    /// Returns `true` if a continuation is installed.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the inbound request.
    #[must_use]
    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// Returns the inbound request mutably.
    pub fn request_mut(&mut self) -> &mut Request<Bytes> {
        &mut self.request
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// Returns the response being built.
    #[must_use]
    pub fn response(&self) -> &ResponseWriter {
        &self.response
    }

    /// Returns the response being built mutably.
    pub fn response_mut(&mut self) -> &mut ResponseWriter {
        &mut self.response
    }

    /// Returns the ambient state if it has type `A`.
    #[must_use]
    pub fn ambient<A: Any>(&self) -> Option<&A> {
        self.ambient.as_deref()?.downcast_ref()
    }

    /// Returns when the current request was attached.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the time spent on the current request so far.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}
