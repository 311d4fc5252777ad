//! New moon and full moon search.
//!
//! New moon is the minimum of the geocentric Sun-Moon angle, full moon its
//! maximum. Both are found with the fixed-step extremum detector in
//! [`crate::engine`].

use luna_core::Oracle;
use luna_time::JulianDay;

use crate::engine::find_extremum;
use crate::error::SearchError;
use crate::separation::sun_moon_angle;
use crate::types::{Extremum, ExtremumEvent, SearchConfig, SearchOutcome};

/// Chained searches restart at least this far after the previous event.
const MIN_RESUME_DAYS: f64 = 1.0 / 24.0;

fn require(config: &SearchConfig, kind: Extremum, msg: &'static str) -> Result<(), SearchError> {
    if config.extremum == kind {
        Ok(())
    } else {
        Err(SearchError::InvalidConfig(msg))
    }
}

/// Next new moon after `start`. A new moon exactly at `start` is not
/// reported.
///
/// Use [`SearchConfig::new_moon`] or a variant of it.
pub fn next_new_moon(
    oracle: &Oracle,
    start: JulianDay,
    config: &SearchConfig,
) -> Result<SearchOutcome, SearchError> {
    require(config, Extremum::Minimum, "new moon search needs Extremum::Minimum")?;
    find_extremum(start, config, |jd| sun_moon_angle(oracle, jd))
}

/// Next full moon. Use [`SearchConfig::full_moon`] or a variant of it.
pub fn next_full_moon(
    oracle: &Oracle,
    start: JulianDay,
    config: &SearchConfig,
) -> Result<SearchOutcome, SearchError> {
    require(config, Extremum::Maximum, "full moon search needs Extremum::Maximum")?;
    find_extremum(start, config, |jd| sun_moon_angle(oracle, jd))
}

/// All new moons in `[start, end)`, chronological.
pub fn search_new_moons(
    oracle: &Oracle,
    start: JulianDay,
    end: JulianDay,
    config: &SearchConfig,
) -> Result<Vec<ExtremumEvent>, SearchError> {
    chain(start, end, config, |from| next_new_moon(oracle, from, config))
}

/// All full moons in `[start, end)`, chronological.
pub fn search_full_moons(
    oracle: &Oracle,
    start: JulianDay,
    end: JulianDay,
    config: &SearchConfig,
) -> Result<Vec<ExtremumEvent>, SearchError> {
    chain(start, end, config, |from| next_full_moon(oracle, from, config))
}

fn chain<F>(
    start: JulianDay,
    end: JulianDay,
    config: &SearchConfig,
    mut next: F,
) -> Result<Vec<ExtremumEvent>, SearchError>
where
    F: FnMut(JulianDay) -> Result<SearchOutcome, SearchError>,
{
    let resume = config.step_days.max(MIN_RESUME_DAYS);
    let mut events = Vec::new();
    let mut cursor = start;
    while cursor < end {
        match next(cursor)? {
            SearchOutcome::Found(event) => {
                if event.jd >= end {
                    break;
                }
                cursor = event.jd.add_days(resume);
                events.push(event);
            }
            // Restart one step before the window end so a trough on the
            // last sample is still seen with both neighbours.
            SearchOutcome::NotFound { .. } if config.max_steps >= 2 => {
                cursor = cursor.add_days((config.max_steps - 1) as f64 * config.step_days);
            }
            SearchOutcome::NotFound { .. } => break,
        }
    }
    Ok(events)
}
