//! Error type for event searches.

use luna_core::OracleError;
use luna_time::TimeError;
use thiserror::Error;

/// Errors from the search engine.
///
/// Not finding an event inside the window is not an error; see
/// [`SearchOutcome::NotFound`](crate::SearchOutcome::NotFound).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The oracle failed; the search was abandoned at that step.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// The search configuration was rejected.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(&'static str),
    /// The cancellation token fired.
    #[error("search cancelled after {steps} steps")]
    Cancelled { steps: usize },
    /// The event time could not be expressed as a civil timestamp.
    #[error(transparent)]
    Time(#[from] TimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_error_converts() {
        let e: SearchError = OracleError::NotInitialized.into();
        assert!(matches!(e, SearchError::Oracle(OracleError::NotInitialized)));
        assert_eq!(e.to_string(), OracleError::NotInitialized.to_string());
    }

    #[test]
    fn cancelled_display() {
        let e = SearchError::Cancelled { steps: 12 };
        assert_eq!(e.to_string(), "search cancelled after 12 steps");
    }
}
