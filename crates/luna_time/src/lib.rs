//! Time handling for ephemeris searches.
//!
//! This crate provides:
//! - a [`JulianDay`] scalar on the dynamical (TT/TDB) time scale
//! - calendar ↔ Julian Date conversion
//! - a Delta T anchor table with piecewise-linear interpolation
//! - civil UTC (`chrono`) ↔ Julian Day conversion and ISO-8601 helpers

pub mod civil;
pub mod delta_t;
pub mod error;
pub mod julian;

pub use civil::{
    DEFAULT_DELTA_T_SECONDS, DeltaTModel, TimeConverter, decimal_year, format_iso, now,
    parse_iso, utc_julian,
};
pub use delta_t::{DEFAULT_DELTA_T_ANCHORS, DeltaTTable};
pub use error::TimeError;
pub use julian::{
    J2000_JD, JulianDay, SECONDS_PER_DAY, SYNODIC_MONTH_DAYS, UNIX_EPOCH_JD, calendar_to_jd,
    decimal_year_from_jd, jd_to_calendar,
};
