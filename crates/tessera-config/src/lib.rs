//! Typed configuration for Tessera services.
//!
//! [`TesseraConfig`] has three sections, each fully defaulted:
//!
//! - [`ServerConfig`]: bind address, shutdown grace period, body size limit
//! - [`RouterConfig`]: context pool cap, built-in 404 body
//! - [`LogConfig`]: the `tracing-subscriber` setup
//!
//! [`ConfigLoader`] layers defaults, TOML/JSON files and environment
//! variables, rejecting unknown fields at every layer.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! max_body_bytes = 4194304
//!
//! [router]
//! pool_max_idle = 1024
//! not_found_message = "404 page not found"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Keys use the form `PREFIX__SECTION__KEY`, e.g.
//! `TESSERA__SERVER__HTTP_ADDR=0.0.0.0:9000` or
//! `TESSERA__LOGGING__FORMAT=pretty`.

mod config;
mod error;
mod loader;
mod schema;

pub use config::{TesseraConfig, TesseraConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogConfig, LogFormat, RouterConfig, ServerConfig, DEFAULT_MAX_BODY_BYTES};

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
