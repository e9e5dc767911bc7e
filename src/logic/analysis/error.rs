//! Query argument-contract errors.
//!
//! These are caller mistakes, not data-quality findings: a query given an
//! invalid argument fails fast instead of degrading to an approximate or
//! empty answer.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Inverted window: start is after end.
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Exactly one of the two optional window bounds was supplied.
    MissingBound,
    /// A count, limit, or threshold parameter was zero.
    NonPositiveArgument { name: &'static str },
    /// k is larger than the distinct-event population in scope.
    CountExceedsPopulation { requested: usize, available: usize },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidWindow { start, end } => {
                write!(f, "Start time {} must not be after end time {}", start, end)
            }
            QueryError::MissingBound => {
                write!(f, "Window bounds must be both present or both absent")
            }
            QueryError::NonPositiveArgument { name } => {
                write!(f, "{} must be positive", name)
            }
            QueryError::CountExceedsPopulation { requested, available } => {
                write!(
                    f,
                    "k ({}) cannot be larger than unique event count ({})",
                    requested, available
                )
            }
        }
    }
}

impl std::error::Error for QueryError {}
