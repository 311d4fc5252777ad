//! Equinox and solstice search.
//!
//! An equinox is a minimum of |solar declination| and a solstice a maximum.
//! Which of the four events was found is read off the Sun's ecliptic
//! longitude at the event.

use std::f64::consts::FRAC_PI_2;

use luna_core::Oracle;
use luna_time::JulianDay;

use crate::engine::find_extremum;
use crate::error::SearchError;
use crate::separation::{sun_declination, sun_ecliptic_longitude};
use crate::types::{Extremum, ExtremumEvent, SearchConfig, SearchOutcome};

/// The four seasonal markers, named for their northern-hemisphere months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl Season {
    /// Nearest marker to a solar ecliptic longitude in radians.
    pub fn from_longitude(lon_rad: f64) -> Self {
        let quadrant = (lon_rad / FRAC_PI_2).round().rem_euclid(4.0) as u8;
        match quadrant {
            0 => Self::MarchEquinox,
            1 => Self::JuneSolstice,
            2 => Self::SeptemberEquinox,
            _ => Self::DecemberSolstice,
        }
    }

    pub fn is_equinox(self) -> bool {
        matches!(self, Self::MarchEquinox | Self::SeptemberEquinox)
    }
}

/// An equinox or solstice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonEvent {
    pub season: Season,
    /// Solar ecliptic longitude (J2000) at the event, radians.
    pub sun_longitude_rad: f64,
    /// The detected extremum; `value` is |declination| in radians.
    pub event: ExtremumEvent,
}

/// Next equinox after `start`. Use [`SearchConfig::equinox`] or a variant.
pub fn next_equinox(
    oracle: &Oracle,
    start: JulianDay,
    config: &SearchConfig,
) -> Result<Option<SeasonEvent>, SearchError> {
    if config.extremum != Extremum::Minimum {
        return Err(SearchError::InvalidConfig("equinox search needs Extremum::Minimum"));
    }
    seasonal(oracle, start, config)
}

/// Next solstice after `start`. Use [`SearchConfig::solstice`] or a variant.
pub fn next_solstice(
    oracle: &Oracle,
    start: JulianDay,
    config: &SearchConfig,
) -> Result<Option<SeasonEvent>, SearchError> {
    if config.extremum != Extremum::Maximum {
        return Err(SearchError::InvalidConfig("solstice search needs Extremum::Maximum"));
    }
    seasonal(oracle, start, config)
}

fn seasonal(
    oracle: &Oracle,
    start: JulianDay,
    config: &SearchConfig,
) -> Result<Option<SeasonEvent>, SearchError> {
    let outcome = find_extremum(start, config, |jd| Ok(sun_declination(oracle, jd)?.abs()))?;
    let SearchOutcome::Found(event) = outcome else {
        return Ok(None);
    };
    let lon = sun_ecliptic_longitude(oracle, event.jd)?;
    Ok(Some(SeasonEvent {
        season: Season::from_longitude(lon),
        sun_longitude_rad: lon,
        event,
    }))
}
