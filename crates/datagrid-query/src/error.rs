//! Error types for the query crate.

use thiserror::Error;

use crate::axis::Axis;

/// Which side of a bracket pair was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// A `(` that is never closed.
    Opening,
    /// A `)` with no `(` before it.
    Closing,
}

impl std::fmt::Display for Bracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bracket::Opening => f.write_str("opening"),
            Bracket::Closing => f.write_str("closing"),
        }
    }
}

/// Errors that can occur when compiling or running a query.
///
/// Every variant aborts the whole query: there is no partial-result mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Parentheses in the query do not balance.
    #[error("unmatched {0} bracket detected")]
    UnmatchedBracket(Bracket),

    /// A selector has an empty operator or one outside the predicate library.
    #[error("invalid operator '{operator}' in selector '{selector}'")]
    InvalidOperator { selector: String, operator: String },

    /// A selector chunk has no field before its operator.
    #[error("no field found in selector '{selector}'")]
    MissingField { selector: String },

    /// Set operators and operands do not line up.
    #[error("malformed query: {reason}")]
    MalformedQuery { reason: String },

    /// The query holds more selectors than the configured cap.
    #[error("query exceeds the limit of {limit} selectors")]
    TooManySelectors { limit: usize },

    /// A field does not name a key or label on the opposite axis.
    #[error("field '{field}' not found among {axis} keys")]
    UnknownField { axis: Axis, field: String },
}

impl QueryError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        QueryError::MalformedQuery {
            reason: reason.into(),
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
