//! Oracle and provider error types.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use jpl_kernel::KernelError;
use thiserror::Error;

/// Status reported by an [`EphemerisProvider`](crate::EphemerisProvider).
///
/// `code` follows the DE lookup convention: `-1` outside coverage, `-2`
/// read failure, `-3` quantity not in file, `-5` invalid body combination.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (code {code})")]
pub struct LookupError {
    pub code: i32,
    pub message: String,
}

impl LookupError {
    pub const OUT_OF_RANGE: i32 = -1;
    pub const READ_FAILURE: i32 = -2;
    pub const MISSING_QUANTITY: i32 = -3;
    pub const INVALID_INDEX: i32 = -5;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<KernelError> for LookupError {
    fn from(e: KernelError) -> Self {
        Self::new(e.lookup_code(), e.to_string())
    }
}

/// One failed attempt to open an ephemeris source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAttempt {
    pub source: PathBuf,
    pub error: String,
}

impl Display for SourceAttempt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.error)
    }
}

/// Errors from the ephemeris oracle.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// No source in the fallback list could be opened.
    #[error("no ephemeris source could be opened: {}", join_attempts(.attempts))]
    DataSourceUnavailable { attempts: Vec<SourceAttempt> },
    /// Queried before a successful initialization.
    #[error("ephemeris oracle used before initialization")]
    NotInitialized,
    /// The provider rejected the query.
    #[error("ephemeris lookup failed with code {code}: {message}")]
    EphemerisLookup { code: i32, message: String },
}

impl OracleError {
    /// Provider status code, when this is a lookup failure.
    pub fn lookup_code(&self) -> Option<i32> {
        match self {
            Self::EphemerisLookup { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<LookupError> for OracleError {
    fn from(e: LookupError) -> Self {
        Self::EphemerisLookup {
            code: e.code,
            message: e.message,
        }
    }
}

fn join_attempts(attempts: &[SourceAttempt]) -> String {
    if attempts.is_empty() {
        return "no sources configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
