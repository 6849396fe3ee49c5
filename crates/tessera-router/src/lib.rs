//! Segment trie router for Tessera.
//!
//! This crate provides the path-matching tree used by the Tessera dispatcher.
//! Patterns are split on `/` and stored one segment per node; every level of
//! a search is resolved independently with a fixed priority, so lookups cost
//! O(segments) regardless of how many routes are registered.
//!
//! # Features
//!
//! - **Static segments**: `/users/me`
//! - **Single parameters**: `/users/:id`
//! - **Double parameters**: `/range/:from-:to` (split on `-`, `_`, `.` or `~`)
//! - **Prefix parameters**: `/api/v::version`, `/raw/::rest`
//! - **Delimited parameters**: `/tags/:tags(,)` (only if `,` occurs)
//! - **Catch-all**: `/files/*`, captured under `*`
//! - **Multi-segment**: `/assets/+`, captured under `+`
//!
//! # Example
//!
//! ```rust
//! use tessera_router::RouteTree;
//! use http::Method;
//!
//! let mut tree = RouteTree::new();
//! tree.insert(&Method::GET, "/users", "listUsers").unwrap();
//! tree.insert(&Method::GET, "/users/:id", "getUser").unwrap();
//! tree.insert(&Method::GET, "/range/:from-:to", "getRange").unwrap();
//!
//! let found = tree.search(&Method::GET, "/range/10-20").unwrap();
//! assert_eq!(*found.value, "getRange");
//! assert_eq!(found.params.get("from"), Some("10"));
//! assert_eq!(found.params.get("to"), Some("20"));
//! ```
//!
//! # Architecture
//!
//! The method is the first segment of every stored key:
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "GET"          "POST"
//!              │               │
//!        ┌─────┴─────┐      "users"
//!        │           │
//!     "users"     "files"
//!        │           │
//!      ":id"        "*"
//! ```
//!
//! At most one wildcard-family child exists per node, and `*`/`+` only ever
//! appear as leaves. Both rules are enforced at registration.

mod error;
mod node;
mod params;
mod segment;
mod tree;

pub use error::{RouteError, RouteResult, SegmentError};
pub use node::Node;
pub use params::Params;
pub use segment::{Segment, CATCH_ALL_KEY, DOUBLE_DELIMITERS, MULTI_SEGMENT_KEY};
pub use tree::RouteTree;

/// A successful search: the registered value and the captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the matched route
    pub value: &'a T,
    /// Extracted path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(value: &'a T, params: Params) -> Self {
        Self { value, params }
    }
}
