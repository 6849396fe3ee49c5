//! Handler error type.
//!
//! [`HandlerError`] is what a handler, a middleware or a context helper
//! returns when a request cannot be completed. Dispatch hands it back to the
//! caller unmodified; turning it into a response is the serving layer's job.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`HandlerError`].
pub type HandlerResult<T = ()> = Result<T, HandlerError>;

/// Errors produced while handling a request.
///
/// # Example
///
/// ```
/// use tessera_core::{HandlerError, HandlerResult};
/// use http::StatusCode;
///
/// fn load(id: &str) -> HandlerResult<u64> {
///     id.parse().map_err(|_| HandlerError::bad_request("id must be numeric"))
/// }
///
/// let err = load("abc").unwrap_err();
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Error, Debug)]
pub enum HandlerError {
    /// A failure that maps to a specific HTTP status.
    #[error("{status}: {message}")]
    Status {
        /// Status to respond with.
        status: StatusCode,
        /// Human-readable message.
        message: String,
    },

    /// The request body was not valid JSON for the target type.
    #[error("JSON decoding error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// A response value could not be serialized.
    #[error("JSON encoding error: {0}")]
    JsonEncode(#[source] serde_json::Error),

    /// A URL-encoded query or form could not be decoded.
    #[error("Form decoding error: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// A response header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A handler panicked and the panic was recovered.
    #[error("Handler panicked: {0}")]
    Panic(String),

    /// Any other application error.
    #[error(transparent)]
    Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Creates an error with an explicit status.
    #[must_use]
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a `400 Bad Request` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::status(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a `404 Not Found` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::status(StatusCode::NOT_FOUND, message)
    }

    /// Creates a `500 Internal Server Error`.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::status(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Wraps an arbitrary error.
    pub fn custom(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(err))
    }

    /// Returns the HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Status { status, .. } => *status,
            Self::JsonDecode(_) | Self::Form(_) => StatusCode::BAD_REQUEST,
            Self::JsonEncode(_) | Self::InvalidHeader(_) | Self::Panic(_) | Self::Custom(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the message safe to show to a client.
    ///
    /// Server-side failures are reduced to the canonical reason phrase.
    #[must_use]
    pub fn public_message(&self) -> String {
        let status = self.status_code();
        if status.is_server_error() {
            return status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string();
        }
        match self {
            Self::Status { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = HandlerError::bad_request("missing name");
        assert_eq!(err.to_string(), "400 Bad Request: missing name");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "missing name");
    }

    #[test]
    fn test_json_error_is_client_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HandlerError::from(source);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.public_message().starts_with("JSON decoding error"));
    }

    #[test]
    fn test_json_encode_is_server_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HandlerError::JsonEncode(source);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn test_server_status_hides_message() {
        let err = HandlerError::internal("db password wrong");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal Server Error");
        assert_eq!(err.to_string(), "500 Internal Server Error: db password wrong");

        let err = HandlerError::status(StatusCode::SERVICE_UNAVAILABLE, "replica lag");
        assert_eq!(err.public_message(), "Service Unavailable");
    }

    #[test]
    fn test_panic_hides_details() {
        let err = HandlerError::Panic("index out of bounds".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn test_custom_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = HandlerError::custom(io);
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
