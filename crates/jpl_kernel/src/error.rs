//! Error types for DE file parsing and evaluation.

use thiserror::Error;

/// Errors from opening or evaluating a JPL DE binary ephemeris.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// I/O error while opening or reading the file.
    #[error("I/O error: {0}")]
    Io(String),
    /// The file is not a recognisable DE binary ephemeris.
    #[error("invalid DE file: {0}")]
    InvalidFormat(String),
    /// Requested epoch lies outside the file's coverage.
    #[error("epoch JD {jd} outside coverage [{start}, {end}]")]
    OutOfRange { jd: f64, start: f64, end: f64 },
    /// The file carries no coefficients for the requested quantity.
    #[error("quantity {0} not present in this ephemeris")]
    MissingQuantity(u32),
    /// Target/center combination is not a valid DE query.
    #[error("invalid target/center combination ({target}, {center})")]
    InvalidBody { target: u32, center: u32 },
}

impl KernelError {
    /// Status code in the classic DE lookup convention.
    ///
    /// `-1` outside coverage, `-2` read failure, `-3` quantity not in file,
    /// `-5` invalid index. Format errors surface as read failures.
    pub fn lookup_code(&self) -> i32 {
        match self {
            Self::OutOfRange { .. } => -1,
            Self::Io(_) | Self::InvalidFormat(_) => -2,
            Self::MissingQuantity(_) => -3,
            Self::InvalidBody { .. } => -5,
        }
    }
}

impl From<std::io::Error> for KernelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_codes() {
        let range = KernelError::OutOfRange {
            jd: 0.0,
            start: 1.0,
            end: 2.0,
        };
        assert_eq!(range.lookup_code(), -1);
        assert_eq!(KernelError::Io("eof".into()).lookup_code(), -2);
        assert_eq!(KernelError::MissingQuantity(15).lookup_code(), -3);
        assert_eq!(
            KernelError::InvalidBody {
                target: 0,
                center: 3
            }
            .lookup_code(),
            -5
        );
    }

    #[test]
    fn display_mentions_coverage() {
        let msg = KernelError::OutOfRange {
            jd: 100.0,
            start: 200.0,
            end: 300.0,
        }
        .to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("300"));
    }
}
