//! Configuration sections.

use serde::{Deserialize, Serialize};
use tessera_core::constants::{DEFAULT_POOL_MAX_IDLE, NOT_FOUND_BODY};

pub use tessera_telemetry::{LogConfig, LogFormat};

/// Default body size limit: 4 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// HTTP server section.
///
/// # Example
///
/// ```
/// use tessera_config::ServerConfig;
///
/// let config = ServerConfig {
///     http_addr: "127.0.0.1:3000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.shutdown_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address, e.g. `0.0.0.0:8080`.
    pub http_addr: String,

    /// How long to wait for open connections after shutdown is requested.
    pub shutdown_timeout_secs: u64,

    /// Largest accepted request body. Larger bodies get 413.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            shutdown_timeout_secs: 30,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Router section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Contexts kept in the pool's free list between requests.
    pub pool_max_idle: usize,

    /// Body of the built-in 404 response.
    pub not_found_message: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            pool_max_idle: DEFAULT_POOL_MAX_IDLE,
            not_found_message: NOT_FOUND_BODY.to_string(),
        }
    }
}
