//! Provider seam between the oracle and a concrete ephemeris source.

use jpl_kernel::DeKernel;

use crate::body::Body;
use crate::error::LookupError;

/// Source of raw ephemeris values.
///
/// `compute` returns values in the DE file's native units: positions in km
/// and rates per day for bodies; angles in radians and rates per day for
/// nutations and librations. Non-positional quantities ignore `center`.
pub trait EphemerisProvider: Send + Sync {
    fn compute(&self, jd: f64, target: Body, center: Body) -> Result<[f64; 6], LookupError>;

    /// `(start_jd, end_jd)` this provider can answer for.
    fn coverage(&self) -> (f64, f64);
}

impl EphemerisProvider for DeKernel {
    fn compute(&self, jd: f64, target: Body, center: Body) -> Result<[f64; 6], LookupError> {
        Ok(DeKernel::compute(self, jd, target.code(), center.code())?)
    }

    fn coverage(&self) -> (f64, f64) {
        DeKernel::coverage(self)
    }
}
