//! The request router.
//!
//! [`Router`] owns the route tree, the router-wide middleware stack, the
//! optional not-found handler and the context pool. Registration takes
//! `&mut self` and happens before serving; [`Router::dispatch`] takes
//! `&self`, so a finished router is shared as `Arc<Router>`.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use tessera_core::handler;
//! use tessera_server::Router;
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/:id", handler(|ctx| {
//!         let id = ctx.param("id").unwrap_or_default().to_string();
//!         ctx.text(StatusCode::OK, id)
//!     }))
//!     .unwrap();
//!
//! let request = Request::get("/users/42").body(Bytes::new()).unwrap();
//! let response = router.dispatch(request).unwrap();
//! assert_eq!(response.body(), "42");
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use tessera_config::RouterConfig;
use tessera_core::{handler, Ambient, ContextPool, Handler, HandlerError, Params};
use tessera_middleware::{compose, names, BoxedMiddleware};
use tessera_router::{RouteError, RouteTree};

use crate::group::Group;

/// Generates the per-verb registration shorthands on top of `handle`.
macro_rules! route_verbs {
    ($($(#[$doc:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
                self.handle(Method::$method, path, handler)
            }
        )*
    };
}

pub(crate) use route_verbs;

/// Maps method and path to handlers and runs them.
pub struct Router {
    tree: RouteTree<Handler>,
    middleware: Vec<BoxedMiddleware>,
    not_found: Option<Handler>,
    default_not_found: Handler,
    pool: ContextPool,
    ambient: Option<Ambient>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.tree.len())
            .field("middleware", &names(&self.middleware))
            .field("custom_not_found", &self.not_found.is_some())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router with the default [`RouterConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&RouterConfig::default())
    }

    /// Creates a router sized and labelled by `config`.
    #[must_use]
    pub fn with_config(config: &RouterConfig) -> Self {
        Self {
            tree: RouteTree::new(),
            middleware: Vec::new(),
            not_found: None,
            default_not_found: not_found_text(&config.not_found_message),
            pool: ContextPool::new(config.pool_max_idle),
            ambient: None,
        }
    }

    /// Appends router-wide middleware.
    ///
    /// Router middleware wraps every request, including unmatched ones, and
    /// runs outside any group middleware.
    pub fn use_middleware(&mut self, middleware: BoxedMiddleware) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// Shares `value` with every request; read it with `Context::ambient`.
    pub fn set_ambient<A: Any + Send + Sync>(&mut self, value: A) -> &mut Self {
        self.ambient = Some(Arc::new(value));
        self
    }

    /// Registers `handler` for `method` and `path`.
    ///
    /// # Errors
    ///
    /// Returns the [`RouteError`] from the tree; the router is unchanged.
    pub fn handle(&mut self, method: Method, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.tree.insert(&method, path, handler)?;
        Ok(self)
    }

    route_verbs! {
        /// Registers a `GET` route.
        get => GET;
        /// Registers a `POST` route.
        post => POST;
        /// Registers a `PUT` route.
        put => PUT;
        /// Registers a `DELETE` route.
        delete => DELETE;
        /// Registers a `PATCH` route.
        patch => PATCH;
        /// Registers a `HEAD` route.
        head => HEAD;
        /// Registers an `OPTIONS` route.
        options => OPTIONS;
    }

    /// Opens a route group under `prefix`.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group::new(self, prefix)
    }

    /// Replaces the built-in 404 response.
    pub fn on_not_found(&mut self, handler: Handler) -> &mut Self {
        self.not_found = Some(handler);
        self
    }

    /// Looks up the handler for `method` and `path` without running it.
    ///
    /// The returned handler includes group middleware but not router
    /// middleware.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<(Handler, Params)> {
        let mut params = Params::new();
        let handler = self.tree.search_into(method, path, &mut params)?;
        Some((Arc::clone(handler), params))
    }

    /// Runs the request through the middleware and the matching handler.
    ///
    /// The path is percent-decoded before matching, so captured values are
    /// decoded too. Unmatched requests go to the not-found handler. A context
    /// is taken from the pool for the duration of the call and returned on
    /// every exit path, unwinding included.
    ///
    /// # Errors
    ///
    /// Returns whatever error the handler chain returned, unmodified.
    pub fn dispatch(&self, request: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        let method = request.method().clone();
        let path = percent_decode_str(request.uri().path())
            .decode_utf8_lossy()
            .into_owned();

        let mut ctx = self.pool.acquire(request, self.ambient.clone());
        let matched = self.tree.search_into(&method, &path, ctx.params_mut());

        let (endpoint, found) = match matched {
            Some(endpoint) => (Arc::clone(endpoint), true),
            None => (self.not_found_handler(), false),
        };

        tracing::debug!(%method, %path, found, "dispatching request");

        let chain = compose(endpoint, &self.middleware);
        if let Err(err) = chain(&mut *ctx) {
            if !found {
                tracing::warn!(%method, %path, error = %err, "not-found handler failed");
            }
            return Err(err);
        }

        Ok(ctx.response_mut().take())
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Names of the router-wide middleware, outermost first.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<&'static str> {
        names(&self.middleware)
    }

    /// The context pool backing dispatch.
    #[must_use]
    pub fn pool(&self) -> &ContextPool {
        &self.pool
    }

    fn not_found_handler(&self) -> Handler {
        Arc::clone(self.not_found.as_ref().unwrap_or(&self.default_not_found))
    }
}

fn not_found_text(message: &str) -> Handler {
    let message: Arc<str> = Arc::from(message);
    handler(move |ctx| ctx.text(StatusCode::NOT_FOUND, &*message))
}
