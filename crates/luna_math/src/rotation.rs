//! ICRF ↔ ecliptic-of-J2000 rotation.

use crate::matrix::Mat3;
use crate::real::Real;
use crate::vector::Vec3;

/// Mean obliquity of the ecliptic at J2000.0 (IAU 2006): 84381.406″.
pub const OBLIQUITY_J2000_ARCSEC: f64 = 84_381.406;

/// [`OBLIQUITY_J2000_ARCSEC`] in radians.
pub const OBLIQUITY_J2000_RAD: f64 = OBLIQUITY_J2000_ARCSEC / 206_264.806_247_096_36;

/// Rotation taking ICRF (equatorial) vectors to the J2000 ecliptic frame.
pub fn icrf_to_ecliptic_matrix<T: Real>() -> Mat3<T> {
    Mat3::rotation_x(T::from_f64(OBLIQUITY_J2000_RAD))
}

/// Rotate an ICRF vector into the J2000 ecliptic frame.
pub fn icrf_to_ecliptic<T: Real>(v: Vec3<T>) -> Vec3<T> {
    icrf_to_ecliptic_matrix() * v
}

/// Rotate a J2000 ecliptic vector into ICRF.
pub fn ecliptic_to_icrf<T: Real>(v: Vec3<T>) -> Vec3<T> {
    icrf_to_ecliptic_matrix().transpose() * v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obliquity_in_degrees() {
        assert!((OBLIQUITY_J2000_RAD.to_degrees() - 23.439_279_444).abs() < 1e-8);
    }

    #[test]
    fn x_axis_unchanged() {
        let v = icrf_to_ecliptic(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(v, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn celestial_pole_tilts_by_obliquity() {
        // The north celestial pole sits at ecliptic latitude 90 - eps.
        let pole = icrf_to_ecliptic(Vec3::new(0.0, 0.0, 1.0));
        let lat = pole.z.asin();
        assert!((lat - (std::f64::consts::FRAC_PI_2 - OBLIQUITY_J2000_RAD)).abs() < 1e-12);
        assert!(pole.y > 0.0);
    }

    #[test]
    fn round_trip() {
        let v = Vec3::new(1.5e8, -2.0e7, 9.0e6);
        let back = ecliptic_to_icrf(icrf_to_ecliptic(v));
        assert!((back - v).magnitude() < 1e-6);
    }
}
