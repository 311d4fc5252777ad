//! Geometry helpers for ephemeris computations.
//!
//! Provides a [`Real`] scalar abstraction with an extended-precision
//! [`DoubleDouble`] implementation, generic 3-vectors and 3x3 matrices,
//! coordinate system conversions (Cartesian ↔ Spherical ↔ Cylindrical) and
//! the ICRF ↔ Ecliptic J2000 rotation.

pub mod coords;
pub mod double_double;
pub mod matrix;
pub mod real;
pub mod rotation;
pub mod vector;

pub use coords::{CoordinateTransform, Cylindrical, Spherical};
pub use double_double::DoubleDouble;
pub use matrix::Mat3;
pub use real::Real;
pub use rotation::{OBLIQUITY_J2000_RAD, ecliptic_to_icrf, icrf_to_ecliptic};
pub use vector::Vec3;
