//! Julian Day scalar and calendar ↔ JD conversion.

use std::fmt::{Display, Formatter};

/// Julian Date of J2000.0 (2000-Jan-01 12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-Jan-01 00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// A point on the continuous dynamical time scale (TT/TDB), in days.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct JulianDay(f64);

impl JulianDay {
    pub const J2000: Self = Self(J2000_JD);

    pub fn from_days(days: f64) -> Self {
        Self(days)
    }

    pub fn days(self) -> f64 {
        self.0
    }

    pub fn add_days(self, days: f64) -> Self {
        Self(self.0 + days)
    }

    pub fn add_seconds(self, seconds: f64) -> Self {
        Self(self.0 + seconds / SECONDS_PER_DAY)
    }

    /// `self - earlier`, in days.
    pub fn days_since(self, earlier: Self) -> f64 {
        self.0 - earlier.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<f64> for JulianDay {
    fn from(days: f64) -> Self {
        Self(days)
    }
}

impl Display for JulianDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

/// Convert a proleptic Gregorian calendar date to a Julian Date.
///
/// `day` may carry a fractional part for the time of day.
/// Algorithm from Meeus, _Astronomical Algorithms_, ch. 7.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let y = y as f64;
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day + b - 1524.5
}

/// Convert a Julian Date to `(year, month, day_with_fraction)` in the
/// proleptic Gregorian calendar.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let z = (jd + 0.5).floor();
    let f = jd + 0.5 - z;
    let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
    let a = z + 1.0 + alpha - (alpha / 4.0).floor();
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = (if e < 14.0 { e - 1.0 } else { e - 13.0 }) as u32;
    let year = (if month > 2 { c - 4716.0 } else { c - 4715.0 }) as i32;
    (year, month, day)
}

/// Fractional year for a Julian Date, e.g. 2000.5 near the start of July 2000.
pub fn decimal_year_from_jd(jd: f64) -> f64 {
    let (year, _, _) = jd_to_calendar(jd);
    let start = calendar_to_jd(year, 1, 1.0);
    let end = calendar_to_jd(year.saturating_add(1), 1, 1.0);
    year as f64 + (jd - start) / (end - start)
}
