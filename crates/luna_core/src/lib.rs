//! Ephemeris oracle over a JPL DE data file.
//!
//! [`Oracle`] opens the first usable file from a fallback list and answers
//! typed queries: body states relative to a center, nutation angles, and
//! lunar libration. Raw values come through the [`EphemerisProvider`] seam,
//! which [`jpl_kernel::DeKernel`] implements.

mod body;
mod error;
mod oracle;
mod provider;

pub use body::{Body, UnknownBody};
pub use error::{LookupError, OracleError, SourceAttempt};
pub use oracle::{DEFAULT_SOURCES, Oracle};
pub use provider::EphemerisProvider;

/// Cartesian state in the ICRF/J2000 frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

/// Nutation in longitude and obliquity (IAU 1980, as tabulated in DE files).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutationAngles {
    pub dpsi_rad: f64,
    pub deps_rad: f64,
    pub dpsi_rate_rad_day: f64,
    pub deps_rate_rad_day: f64,
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Oracle>();
};
