//! Error types for time conversion.

use thiserror::Error;

/// Errors from Delta T table construction, civil conversion or parsing.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Delta T anchors are too few, unsorted or non-finite.
    #[error("invalid Delta T table: {0}")]
    InvalidDeltaTTable(&'static str),
    /// Julian day cannot be represented as a civil timestamp.
    #[error("JD {0} is outside the representable civil range")]
    OutOfRange(f64),
    /// Timestamp text could not be parsed.
    #[error("cannot parse timestamp {input:?}: expected RFC 3339 or YYYY-MM-DDThh:mm:ss")]
    Parse { input: String },
}
