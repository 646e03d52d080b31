//! Error types for the gather crate.
//!
//! Only unrecoverable conditions are errors. An attribute that does not
//! resolve, or resolves to null, is an ordinary outcome and never shows up
//! here.

use thiserror::Error;

/// Errors that can occur when building or executing queries and aggregations.
#[derive(Debug, Error)]
pub enum GatherError {
    /// An attribute resolved but its value cannot be read.
    #[error("unable to read value of '{path}': {reason}")]
    Access { path: String, reason: String },

    /// An operator name that is not part of the operator set.
    #[error("unknown operator in criteria: '{0}'")]
    UnknownOperator(String),

    /// A join name other than `and` / `or`.
    #[error("unknown join: '{0}'")]
    UnknownJoin(String),

    /// An aggregator name that is not part of the aggregator family.
    #[error("unknown aggregator: '{0}'")]
    UnknownAggregator(String),

    /// Invalid regular expression or wildcard pattern.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A numeric aggregator was fed a value that is not a number.
    #[error("{aggregator} aggregator expects numbers, got {found}")]
    NotNumeric {
        aggregator: &'static str,
        found: &'static str,
    },

    /// An unsigned value too large for a `Long*` aggregator's `i64` state.
    #[error("{aggregator} aggregator cannot hold {value}: exceeds i64::MAX")]
    Overflow {
        aggregator: &'static str,
        value: u64,
    },

    /// An average was requested over zero observations.
    #[error("{aggregator} aggregator has no observations to divide by")]
    DivideByZero { aggregator: &'static str },
}

/// Result type for gather operations.
pub type Result<T> = std::result::Result<T, GatherError>;
