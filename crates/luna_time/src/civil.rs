//! Civil UTC timestamps ↔ Julian Day on the dynamical time scale.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::delta_t::DeltaTTable;
use crate::error::TimeError;
use crate::julian::{JulianDay, SECONDS_PER_DAY, UNIX_EPOCH_JD, decimal_year_from_jd};

/// TT - UTC at J2000 (32.184 s + 32 leap seconds), the fixed offset used
/// when no Delta T table is configured.
pub const DEFAULT_DELTA_T_SECONDS: f64 = 64.184;

/// Beyond this the calendar arithmetic leaves the range chrono can represent.
const MAX_CIVIL_JD: f64 = 1.0e8;

/// How TT - UT is obtained for a given instant.
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaTModel {
    /// Interpolated from an anchor table by decimal year.
    Table(DeltaTTable),
    /// Constant offset in seconds.
    Fixed(f64),
}

impl DeltaTModel {
    /// Delta T in seconds at a decimal year.
    pub fn seconds_at(&self, year: f64) -> f64 {
        match self {
            Self::Table(table) => table.delta_t(year),
            Self::Fixed(seconds) => *seconds,
        }
    }
}

impl Default for DeltaTModel {
    fn default() -> Self {
        Self::Fixed(DEFAULT_DELTA_T_SECONDS)
    }
}

/// Converts between civil UTC and [`JulianDay`] using a [`DeltaTModel`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeConverter {
    model: DeltaTModel,
}

impl TimeConverter {
    pub fn new(model: DeltaTModel) -> Self {
        Self { model }
    }

    /// Converter backed by the default Delta T anchor table.
    pub fn with_table() -> Self {
        Self::new(DeltaTModel::Table(DeltaTTable::default()))
    }

    pub fn model(&self) -> &DeltaTModel {
        &self.model
    }

    /// Civil UTC → dynamical-time Julian Day.
    pub fn to_julian(&self, time: DateTime<Utc>) -> JulianDay {
        let jd_ut = utc_julian(time);
        let dt = self.model.seconds_at(decimal_year_from_jd(jd_ut));
        JulianDay::from_days(jd_ut).add_seconds(dt)
    }

    /// Dynamical-time Julian Day → civil UTC.
    ///
    /// Delta T depends on the (unknown) UT year, so the offset is evaluated
    /// twice: once at the TT year and once at the corrected UT year.
    pub fn to_civil(&self, jd: JulianDay) -> Result<DateTime<Utc>, TimeError> {
        if !jd.is_finite() || jd.days().abs() > MAX_CIVIL_JD {
            return Err(TimeError::OutOfRange(jd.days()));
        }
        let mut jd_ut = jd.days();
        for _ in 0..2 {
            let dt = self.model.seconds_at(decimal_year_from_jd(jd_ut));
            jd_ut = jd.days() - dt / SECONDS_PER_DAY;
        }

        let total = (jd_ut - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
        let mut secs = total.floor();
        let mut nanos = ((total - secs) * 1e9).round();
        if nanos >= 1e9 {
            secs += 1.0;
            nanos -= 1e9;
        }
        DateTime::from_timestamp(secs as i64, nanos as u32).ok_or(TimeError::OutOfRange(jd.days()))
    }

    /// Current instant on the dynamical time scale.
    pub fn now(&self) -> JulianDay {
        self.to_julian(now())
    }
}

/// UTC Julian Date of a civil timestamp (no Delta T applied).
pub fn utc_julian(time: DateTime<Utc>) -> f64 {
    let secs = time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + secs / SECONDS_PER_DAY
}

/// Fractional UTC year of a civil timestamp, for Delta T lookups.
pub fn decimal_year(time: DateTime<Utc>) -> f64 {
    decimal_year_from_jd(utc_julian(time))
}

/// Current UTC time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format as `YYYY-MM-DDThh:mm:ssZ`.
pub fn format_iso(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse RFC 3339, `YYYY-MM-DDThh:mm:ss[Z]` (taken as UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_iso(input: &str) -> Result<DateTime<Utc>, TimeError> {
    let text = input.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    let naive = text.strip_suffix('Z').unwrap_or(text);
    if let Ok(t) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S") {
        return Ok(t.and_utc());
    }
    if let Some(t) = NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(t.and_utc());
    }
    Err(TimeError::Parse {
        input: input.to_string(),
    })
}
