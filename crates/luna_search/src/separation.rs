//! Scalar functions of body geometry tracked by the searches.
//!
//! Positions arrive as f64 kilometres; the geometry is carried out in
//! [`DoubleDouble`] so that small angles near conjunction keep their
//! significant digits. Each function rounds its result to f64 on return,
//! so the search engine forms deltas and threshold comparisons on f64
//! samples. That rounding is about 1e-16 rad, far below the change between
//! samples at any usable step.

use luna_core::{Body, Oracle};
use luna_math::{
    CoordinateTransform, Cylindrical, DoubleDouble, Real, Spherical, Vec3, icrf_to_ecliptic,
};
use luna_time::JulianDay;

use crate::error::SearchError;

/// Geocentric ICRF position of `body`.
pub(crate) fn geocentric(
    oracle: &Oracle,
    jd: JulianDay,
    body: Body,
) -> Result<Vec3<DoubleDouble>, SearchError> {
    let state = oracle.query_state(jd.days(), Body::Earth, body)?;
    Ok(Vec3::from_array(state.position_km))
}

/// Angle Moon-Earth-Sun in radians, `[0, pi]`.
///
/// Zero at new moon, pi at full moon.
pub fn sun_moon_angle(oracle: &Oracle, jd: JulianDay) -> Result<f64, SearchError> {
    let moon = geocentric(oracle, jd, Body::Moon)?;
    let sun = geocentric(oracle, jd, Body::Sun)?;
    Ok(moon.angle_to(sun).to_f64())
}

/// Geocentric declination of the Sun in the ICRF equator, radians.
pub fn sun_declination(oracle: &Oracle, jd: JulianDay) -> Result<f64, SearchError> {
    let sun = geocentric(oracle, jd, Body::Sun)?;
    let cyl = Cylindrical::from_cartesian(&sun);
    Ok(cyl.z.atan2(cyl.rho).to_f64())
}

/// Geocentric ecliptic (J2000) longitude of the Sun, radians in `[0, 2pi)`.
pub fn sun_ecliptic_longitude(oracle: &Oracle, jd: JulianDay) -> Result<f64, SearchError> {
    let sun = geocentric(oracle, jd, Body::Sun)?;
    let sph: Spherical<DoubleDouble> = Spherical::from_cartesian(&icrf_to_ecliptic(sun));
    Ok(sph.phi.to_f64().rem_euclid(std::f64::consts::TAU))
}

/// Fraction of the lunar disc lit as seen from Earth's centre.
///
/// Uses the geocentric Sun-Moon angle as the phase angle complement, which is
/// good to a fraction of a percent.
pub fn illuminated_fraction(oracle: &Oracle, jd: JulianDay) -> Result<f64, SearchError> {
    let angle = sun_moon_angle(oracle, jd)?;
    Ok(0.5 * (1.0 - angle.cos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{AU_KM, MOON_KM, SYNODIC, T0, fixed_sky, orbiting_moon};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn angle_tracks_orbit_phase() {
        let oracle = orbiting_moon();
        let at_new = sun_moon_angle(&oracle, JulianDay::from_days(T0)).unwrap();
        assert!(at_new.abs() < 1e-12);
        let quarter = sun_moon_angle(&oracle, JulianDay::from_days(T0 + SYNODIC / 4.0)).unwrap();
        assert!((quarter - FRAC_PI_2).abs() < 1e-9);
        let full = sun_moon_angle(&oracle, JulianDay::from_days(T0 + SYNODIC / 2.0)).unwrap();
        assert!((full - PI).abs() < 1e-9);
    }

    #[test]
    fn declination_and_longitude_of_fixed_sun() {
        // Sun 30 degrees north of the equator on the ICRF y-z plane.
        let oracle = fixed_sky([0.0, 0.866_025_403_784_438_6, 0.5], [MOON_KM, 0.0, 0.0]);
        let jd = JulianDay::from_days(T0);
        let dec = sun_declination(&oracle, jd).unwrap();
        assert!((dec - PI / 6.0).abs() < 1e-12);
        let lon = sun_ecliptic_longitude(&oracle, jd).unwrap();
        assert!(lon > 0.0 && lon < PI);
    }

    #[test]
    fn tiny_angle_keeps_relative_precision() {
        let tiny = 1e-9;
        let oracle = fixed_sky([AU_KM, 0.0, 0.0], [MOON_KM, MOON_KM * tiny, 0.0]);
        let angle = sun_moon_angle(&oracle, JulianDay::from_days(T0)).unwrap();
        assert!((angle - tiny).abs() < tiny * 1e-9, "{angle:e}");
    }

    #[test]
    fn lit_fraction_bounds() {
        let oracle = orbiting_moon();
        let new = illuminated_fraction(&oracle, JulianDay::from_days(T0)).unwrap();
        let full = illuminated_fraction(&oracle, JulianDay::from_days(T0 + SYNODIC / 2.0)).unwrap();
        assert!(new < 1e-12);
        assert!((full - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uninitialized_oracle_propagates() {
        let oracle = Oracle::new();
        let err = sun_moon_angle(&oracle, JulianDay::from_days(T0)).unwrap_err();
        assert!(matches!(err, SearchError::Oracle(_)));
    }
}
