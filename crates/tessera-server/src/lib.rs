//! # Tessera Server
//!
//! Routing and serving for Tessera:
//!
//! - [`Router`]: route registration, router-wide middleware, not-found
//!   handling and pooled-context dispatch
//! - [`Group`]: prefixed route groups with their own middleware
//! - [`Server`] / [`serve`]: a Hyper HTTP/1.1 server with graceful shutdown
//!
//! ## Example
//!
//! ```rust,ignore
//! use http::StatusCode;
//! use tessera_core::handler;
//! use tessera_config::ServerConfig;
//! use tessera_middleware::{logger, recover};
//! use tessera_server::{serve, Router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tessera_server::ServerError> {
//!     let mut router = Router::new();
//!     router.use_middleware(logger()).use_middleware(recover());
//!     router.get("/hello/:name", handler(|ctx| {
//!         let name = ctx.param("name").unwrap_or("world").to_string();
//!         ctx.text(StatusCode::OK, format!("hello {name}"))
//!     }))?;
//!
//!     serve(router, ServerConfig::default()).await
//! }
//! ```

mod error;
mod group;
mod router;
mod server;
mod shutdown;

pub use error::{ServerError, ServerResult};
pub use group::Group;
pub use router::Router;
pub use server::{error_response, serve, HttpResponse, Server};
pub use shutdown::ShutdownSignal;
