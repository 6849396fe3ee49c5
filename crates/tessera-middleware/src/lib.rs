//! # Tessera Middleware
//!
//! Middleware composition for Tessera.
//!
//! A middleware is a handler transform: it receives the handler it wraps and
//! returns the handler that runs in its place. A chain is built by folding a
//! list of middleware over an endpoint, first element outermost:
//!
//! ```text
//! compose(h, [m1, m2, m3]) == m1(m2(m3(h)))
//!
//! Request → m1 → m2 → m3 → h
//!                          ↓
//! Response ← m1 ← m2 ← m3 ←┘
//! ```
//!
//! ## Writing Middleware
//!
//! | Style | Entry point | Continues with |
//! |-------|-------------|----------------|
//! | Trait | [`Middleware`] | the `Handler` passed to `wrap` |
//! | Closure | [`FnMiddleware`] | the `Handler` passed to the closure |
//! | Continuation | [`from_next`] | `ctx.next()`, stoppable with `ctx.abort()` |
//! | Explicit | [`around`] | the `&Handler` argument |
//!
//! ## Example
//!
//! ```
//! use tessera_core::{handler, Context};
//! use tessera_middleware::{compose, from_next, stages};
//! use http::StatusCode;
//!
//! let count = from_next("count", |ctx: &mut Context| {
//!     ctx.set("seen", 1_u32);
//!     ctx.next()
//! });
//!
//! let chain = compose(
//!     handler(|ctx| ctx.text(StatusCode::OK, "hello")),
//!     &[stages::recover(), stages::logger(), count],
//! );
//!
//! let mut ctx = Context::new();
//! chain(&mut ctx).unwrap();
//! assert_eq!(ctx.get::<u32>("seen"), Some(&1));
//! ```

#![doc(html_root_url = "https://docs.rs/tessera-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapters;
pub mod middleware;
pub mod stages;

// Re-export main types at crate root
pub use adapters::{around, from_next, with_continuation};
pub use middleware::{compose, names, BoxedMiddleware, FnMiddleware, Middleware};
pub use stages::{logger, recover};
