//! Pattern segment classification.
//!
//! A route pattern is split on `/` and every piece is classified into a
//! [`Segment`]. Classification happens once, at registration time; matching
//! against request input reuses the parsed operands.
//!
//! # Grammar
//!
//! Checked in this order, first rule wins:
//!
//! | Pattern          | Kind                | Captures                              |
//! |------------------|---------------------|---------------------------------------|
//! | `*`              | catch-all           | remaining path under `*`              |
//! | `+`              | multi-segment       | remaining path under `+`              |
//! | `::name`         | prefix (empty)      | whole segment under `name`            |
//! | `v::name`        | prefix              | segment after `v` under `name`        |
//! | `:name(,)`       | delimited           | whole segment, only if `,` occurs     |
//! | `:a-:b`          | double              | two halves split on `-`, `_`, `.`, `~` |
//! | `:name`          | single              | whole segment under `name`            |
//! | anything else    | static              | nothing                               |

use crate::error::SegmentError;
use crate::params::Params;

/// Parameter key holding the remainder captured by a catch-all (`*`) segment.
pub const CATCH_ALL_KEY: &str = "*";

/// Parameter key holding the remainder captured by a multi-segment (`+`) segment.
pub const MULTI_SEGMENT_KEY: &str = "+";

/// Delimiters accepted between the two halves of a double parameter.
pub const DOUBLE_DELIMITERS: [char; 4] = ['-', '_', '.', '~'];

/// The kind of a pattern segment, with its kind-specific operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched exactly.
    Static,

    /// `:name`, captures one whole segment.
    Param {
        /// Parameter name.
        name: String,
    },

    /// `:a-:b`, captures two values split on `delimiter`.
    Double {
        /// Name of the left half.
        first: String,
        /// Name of the right half.
        second: String,
        /// One of [`DOUBLE_DELIMITERS`].
        delimiter: char,
    },

    /// `::name` or `lit::name`, captures what follows a required literal prefix.
    Prefix {
        /// Literal the input segment must start with (may be empty).
        prefix: String,
        /// Parameter name.
        name: String,
    },

    /// `:name(delim)`, captures the whole segment when `delim` occurs in it.
    Delimited {
        /// Parameter name.
        name: String,
        /// Text that must occur in the input segment.
        delimiter: String,
    },

    /// `*`, captures the rest of the path.
    CatchAll,

    /// `+`, captures the rest of the path (one or more segments).
    MultiSegment,
}

impl Segment {
    /// Classifies one pattern segment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tessera_router::Segment;
    ///
    /// assert_eq!(Segment::parse("users").unwrap(), Segment::Static);
    /// assert_eq!(
    ///     Segment::parse(":id").unwrap(),
    ///     Segment::Param { name: "id".to_string() }
    /// );
    /// assert_eq!(Segment::parse("*").unwrap(), Segment::CatchAll);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, SegmentError> {
        match raw {
            "*" => return Ok(Self::CatchAll),
            "+" => return Ok(Self::MultiSegment),
            _ => {}
        }

        if let Some(name) = raw.strip_prefix("::") {
            return Ok(Self::Prefix {
                prefix: String::new(),
                name: param_name(raw, name)?,
            });
        }

        if let Some((prefix, name)) = raw.split_once("::") {
            return Ok(Self::Prefix {
                prefix: prefix.to_string(),
                name: param_name(raw, name)?,
            });
        }

        let Some(body) = raw.strip_prefix(':') else {
            return Ok(Self::Static);
        };

        if let Some(open) = body.find('(') {
            let delimiter = body[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| SegmentError::UnclosedDelimiter {
                    segment: raw.to_string(),
                })?;
            if delimiter.is_empty() {
                return Err(SegmentError::EmptyDelimiter {
                    segment: raw.to_string(),
                });
            }
            return Ok(Self::Delimited {
                name: param_name(raw, &body[..open])?,
                delimiter: delimiter.to_string(),
            });
        }

        if let Some(double) = parse_double(raw, body)? {
            return Ok(double);
        }

        Ok(Self::Param {
            name: param_name(raw, body)?,
        })
    }

    /// Returns `true` for every kind except [`Segment::Static`].
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Self::Static)
    }

    /// Returns `true` for kinds that consume the rest of the path.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CatchAll | Self::MultiSegment)
    }

    /// Returns the parameter names this segment captures into.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        match self {
            Self::Static => Vec::new(),
            Self::Param { name } | Self::Prefix { name, .. } | Self::Delimited { name, .. } => {
                vec![name.as_str()]
            }
            Self::Double { first, second, .. } => vec![first.as_str(), second.as_str()],
            Self::CatchAll => vec![CATCH_ALL_KEY],
            Self::MultiSegment => vec![MULTI_SEGMENT_KEY],
        }
    }

    /// Tries to match one input segment against a parameter-family kind.
    ///
    /// On acceptance the captured values are pushed to `params` and `true` is
    /// returned. Nothing is pushed on rejection. Static, catch-all and
    /// multi-segment kinds never accept here: they are matched by the tree
    /// directly.
    pub fn capture(&self, input: &str, params: &mut Params) -> bool {
        match self {
            Self::Static | Self::CatchAll | Self::MultiSegment => false,
            Self::Param { name } => {
                params.push(name.as_str(), input);
                true
            }
            Self::Double {
                first,
                second,
                delimiter,
            } => match input.split_once(*delimiter) {
                Some((left, right))
                    if !left.is_empty() && !right.is_empty() && !right.contains(*delimiter) =>
                {
                    params.push(first.as_str(), left);
                    params.push(second.as_str(), right);
                    true
                }
                _ => false,
            },
            Self::Prefix { prefix, name } => match input.strip_prefix(prefix.as_str()) {
                Some(rest) if !rest.is_empty() => {
                    params.push(name.as_str(), rest);
                    true
                }
                _ => false,
            },
            Self::Delimited { name, delimiter } => {
                if input.contains(delimiter.as_str()) {
                    params.push(name.as_str(), input);
                    true
                } else {
                    false
                }
            }
        }
    }
}

fn param_name(raw: &str, name: &str) -> Result<String, SegmentError> {
    if name.is_empty() {
        return Err(SegmentError::EmptyParamName {
            segment: raw.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Splits `:a-:b` style bodies. `body` is the segment without its leading `:`.
fn parse_double(raw: &str, body: &str) -> Result<Option<Segment>, SegmentError> {
    for delimiter in DOUBLE_DELIMITERS {
        let Some(index) = body
            .char_indices()
            .find(|&(i, c)| c == delimiter && body[i + 1..].starts_with(':'))
            .map(|(i, _)| i)
        else {
            continue;
        };

        let first = &body[..index];
        let second = &body[index + 2..];
        if second.contains(':') {
            return Err(SegmentError::TooManyParts {
                segment: raw.to_string(),
            });
        }

        return Ok(Some(Segment::Double {
            first: param_name(raw, first)?,
            second: param_name(raw, second)?,
            delimiter,
        }));
    }
    Ok(None)
}
