//! Event search over ephemeris geometry: new and full moons, equinoxes,
//! solstices and lunations.
//!
//! This crate provides:
//! - A fixed-step extremum detector with a two-stage acceptance guard
//!   ([`find_extremum`]), usable with any scalar function of time
//! - Sun-Moon angle and solar declination computed in extended precision
//! - New/full moon search, single and chained over a range
//! - Equinox/solstice search
//! - Lunation bracketing (previous/next new moon, moon age)

pub mod engine;
pub mod error;
pub mod lunar_phase;
pub mod lunation;
pub mod seasons;
pub mod separation;
#[cfg(test)]
mod testing;
pub mod types;

pub use engine::find_extremum;
pub use error::SearchError;
pub use lunar_phase::{next_full_moon, next_new_moon, search_full_moons, search_new_moons};
pub use lunation::{Lunation, lunation_at, lunation_number};
pub use seasons::{Season, SeasonEvent, next_equinox, next_solstice};
pub use separation::{illuminated_fraction, sun_declination, sun_ecliptic_longitude, sun_moon_angle};
pub use types::{
    CancellationToken, DEFAULT_STEP_DAYS, Extremum, ExtremumEvent, SearchConfig, SearchOutcome,
};
