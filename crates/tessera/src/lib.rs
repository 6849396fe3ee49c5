//! # Tessera
//!
//! A trie-based HTTP router: patterns are split into typed segments and
//! stored in a tree keyed by method and path, handlers run with a pooled,
//! reusable [`Context`](tessera_core::Context), and middleware composes
//! around them with `next`/`abort` continuation control.
//!
//! | Crate | Provides |
//! |-------|----------|
//! | [`router`] | segment classifier, route tree, params |
//! | [`core`] | context, handler type, errors, context pool, response helpers |
//! | [`middleware`] | middleware trait, adapters, logger and recover |
//! | [`server`] | `Router`, groups, Hyper server, shutdown |
//! | [`config`] | layered TOML/JSON/env configuration |
//! | [`telemetry`] | `tracing-subscriber` setup |
//!
//! ```rust,ignore
//! use tessera::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("tessera.toml")?
//!         .with_env_prefix("TESSERA")
//!         .load()?;
//!     init_logging(&config.logging)?;
//!
//!     let mut router = Router::with_config(&config.router);
//!     router.use_middleware(logger()).use_middleware(recover());
//!     router.get("/hello/:name", handler(|ctx| {
//!         let name = ctx.param("name").unwrap_or("world").to_string();
//!         ctx.text(StatusCode::OK, format!("hello {name}"))
//!     }))?;
//!
//!     serve(router, config.server).await?;
//!     Ok(())
//! }
//! ```

pub use tessera_config as config;
pub use tessera_core as core;
pub use tessera_middleware as middleware;
pub use tessera_router as router;
pub use tessera_server as server;
pub use tessera_telemetry as telemetry;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tessera_config::{ConfigLoader, TesseraConfig};
    pub use tessera_core::constants::header;
    pub use tessera_core::http::{Method, StatusCode};
    pub use tessera_core::{handler, Context, Handler, HandlerError, HandlerResult};
    pub use tessera_middleware::{around, from_next, logger, recover, BoxedMiddleware, Middleware};
    pub use tessera_router::RouteError;
    pub use tessera_server::{serve, Group, Router, Server, ShutdownSignal};
    pub use tessera_telemetry::init_logging;
}
