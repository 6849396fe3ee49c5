//! Registration errors.
//!
//! Everything in this module describes a defect in route declarations. None of
//! these errors can occur while matching a request: a pattern segment that does
//! not accept an input segment is simply skipped.

use thiserror::Error;

/// Result type for route registration.
pub type RouteResult<T> = Result<T, RouteError>;

/// A single pattern segment could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// A parameter segment declares no name (e.g. `:`, `::` or `:(,)`).
    #[error("empty parameter name in segment `{segment}`")]
    EmptyParamName {
        /// The offending segment.
        segment: String,
    },

    /// A delimited parameter opens `(` without closing it at the end.
    #[error("unclosed delimiter group in segment `{segment}`")]
    UnclosedDelimiter {
        /// The offending segment.
        segment: String,
    },

    /// A delimited parameter declares `()`.
    #[error("empty delimiter in segment `{segment}`")]
    EmptyDelimiter {
        /// The offending segment.
        segment: String,
    },

    /// A double parameter splits into more than two `:`-prefixed parts.
    #[error("segment `{segment}` declares more than two parameters")]
    TooManyParts {
        /// The offending segment.
        segment: String,
    },
}

/// A route could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// One of the route's segments is malformed.
    #[error("invalid route `{pattern}`: {source}")]
    InvalidSegment {
        /// The route being registered.
        pattern: String,
        /// What was wrong with the segment.
        #[source]
        source: SegmentError,
    },

    /// The same parameter name appears twice in one route.
    #[error("duplicate parameter `{name}` in route `{pattern}`")]
    DuplicateParam {
        /// The route being registered.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// A catch-all or multi-segment wildcard is followed by more segments.
    #[error("wildcard `{segment}` must be the last segment of route `{pattern}`")]
    WildcardNotLast {
        /// The route being registered.
        pattern: String,
        /// The misplaced wildcard segment.
        segment: String,
    },

    /// A second wildcard-family child would be created at one tree level.
    #[error("wildcard `{segment}` in route `{pattern}` conflicts with existing wildcard `{existing}`")]
    ConflictingWildcard {
        /// The route being registered.
        pattern: String,
        /// The segment that could not be added.
        segment: String,
        /// The wildcard segment already registered at that level.
        existing: String,
    },
}

impl RouteError {
    /// Returns the route pattern the error was raised for.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidSegment { pattern, .. }
            | Self::DuplicateParam { pattern, .. }
            | Self::WildcardNotLast { pattern, .. }
            | Self::ConflictingWildcard { pattern, .. } => pattern,
        }
    }
}
