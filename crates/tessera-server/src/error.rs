//! Server error types.

use std::net::SocketAddr;

use tessera_config::ConfigError;
use tessera_router::RouteError;
use thiserror::Error;

/// Errors that stop a server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration, including an unparsable bind address.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A route failed to register.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Other listener I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
