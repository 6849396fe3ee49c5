//! Logging setup for Tessera services.
//!
//! Library crates only emit `tracing` events; an application decides where
//! they go by calling [`init_logging`] once at startup.
//!
//! ```rust,ignore
//! use tessera_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(addr = "127.0.0.1:8080", "listening");
//! ```

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{build_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
