//! Route groups.
//!
//! A [`Group`] registers routes under a shared path prefix with a shared
//! middleware stack. Group middleware is composed into each handler when the
//! route is registered, so only routes added after a `use_middleware` call
//! see that middleware. Nested groups start from a copy of their parent's
//! stack; adding middleware to a child never affects the parent.
//!
//! ```
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use tessera_core::handler;
//! use tessera_server::Router;
//!
//! let mut router = Router::new();
//! let mut api = router.group("/api");
//! let mut v1 = api.group("v1/");
//! v1.get("/ping", handler(|ctx| ctx.text(StatusCode::OK, "pong"))).unwrap();
//!
//! let request = Request::get("/api/v1/ping").body(Bytes::new()).unwrap();
//! assert_eq!(router.dispatch(request).unwrap().body(), "pong");
//! ```

use http::Method;
use tessera_core::Handler;
use tessera_middleware::{compose, BoxedMiddleware};
use tessera_router::RouteError;

use crate::router::{route_verbs, Router};

/// Routes sharing a prefix and middleware, registered into a [`Router`].
#[derive(Debug)]
pub struct Group<'r> {
    router: &'r mut Router,
    prefix: String,
    middleware: Vec<BoxedMiddleware>,
}

impl<'r> Group<'r> {
    pub(crate) fn new(router: &'r mut Router, prefix: &str) -> Self {
        Self {
            router,
            prefix: join_paths("", prefix),
            middleware: Vec::new(),
        }
    }

    /// The normalized prefix, e.g. `/api/v1`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Appends middleware for routes registered from now on.
    pub fn use_middleware(&mut self, middleware: BoxedMiddleware) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// Opens a nested group under `prefix`, inheriting this group's middleware.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group {
            prefix: join_paths(&self.prefix, prefix),
            middleware: self.middleware.clone(),
            router: &mut *self.router,
        }
    }

    /// Registers `handler` for `method` at `prefix + path`.
    ///
    /// # Errors
    ///
    /// Returns the [`RouteError`] from the router's tree.
    pub fn handle(&mut self, method: Method, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        let full = join_paths(&self.prefix, path);
        let wrapped = compose(handler, &self.middleware);
        self.router.handle(method, &full, wrapped)?;
        Ok(self)
    }

    route_verbs! {
        /// Registers a `GET` route in this group.
        get => GET;
        /// Registers a `POST` route in this group.
        post => POST;
        /// Registers a `PUT` route in this group.
        put => PUT;
        /// Registers a `DELETE` route in this group.
        delete => DELETE;
        /// Registers a `PATCH` route in this group.
        patch => PATCH;
        /// Registers a `HEAD` route in this group.
        head => HEAD;
        /// Registers an `OPTIONS` route in this group.
        options => OPTIONS;
    }
}

/// Joins two path fragments with exactly one `/` between them.
///
/// The result always starts with `/` and never ends with one, except for
/// the root path itself.
fn join_paths(prefix: &str, path: &str) -> String {
    let head = prefix.trim_matches('/');
    let tail = path.trim_matches('/');

    let mut joined = String::with_capacity(head.len() + tail.len() + 2);
    for part in [head, tail] {
        if !part.is_empty() {
            joined.push('/');
            joined.push_str(part);
        }
    }
    if joined.is_empty() {
        joined.push('/');
    }
    joined
}
