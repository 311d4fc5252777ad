//! Cartesian ↔ Spherical ↔ Cylindrical coordinate conversion.
//!
//! Every representation converts through Cartesian, so any pair can be
//! converted with [`CoordinateTransform::convert`].

use crate::real::Real;
use crate::vector::Vec3;

/// Spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical<T> {
    /// Distance from the origin.
    pub r: T,
    /// Polar angle from +z, in `[0, pi]`.
    pub theta: T,
    /// Azimuth from +x toward +y, in `(-pi, pi]`.
    pub phi: T,
}

/// Cylindrical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylindrical<T> {
    /// Distance from the z axis.
    pub rho: T,
    /// Azimuth from +x toward +y, in `(-pi, pi]`.
    pub phi: T,
    pub z: T,
}

/// A coordinate representation of a point in 3-space.
pub trait CoordinateTransform<T: Real>: Sized {
    fn to_cartesian(&self) -> Vec3<T>;
    fn from_cartesian(v: &Vec3<T>) -> Self;

    /// Re-express this point in another representation.
    fn convert<U: CoordinateTransform<T>>(&self) -> U {
        U::from_cartesian(&self.to_cartesian())
    }
}

impl<T: Real> CoordinateTransform<T> for Vec3<T> {
    fn to_cartesian(&self) -> Vec3<T> {
        *self
    }

    fn from_cartesian(v: &Vec3<T>) -> Self {
        *v
    }
}

impl<T: Real> CoordinateTransform<T> for Spherical<T> {
    fn to_cartesian(&self) -> Vec3<T> {
        let (st, ct) = (self.theta.sin(), self.theta.cos());
        let (sp, cp) = (self.phi.sin(), self.phi.cos());
        Vec3::new(self.r * st * cp, self.r * st * sp, self.r * ct)
    }

    fn from_cartesian(v: &Vec3<T>) -> Self {
        let rho = (v.x * v.x + v.y * v.y).sqrt();
        Self {
            r: v.magnitude(),
            theta: rho.atan2(v.z),
            phi: v.y.atan2(v.x),
        }
    }
}

impl<T: Real> CoordinateTransform<T> for Cylindrical<T> {
    fn to_cartesian(&self) -> Vec3<T> {
        Vec3::new(
            self.rho * self.phi.cos(),
            self.rho * self.phi.sin(),
            self.z,
        )
    }

    fn from_cartesian(v: &Vec3<T>) -> Self {
        Self {
            rho: (v.x * v.x + v.y * v.y).sqrt(),
            phi: v.y.atan2(v.x),
            z: v.z,
        }
    }
}

impl<T: Real> Spherical<T> {
    /// Latitude-style elevation above the x-y plane, `pi/2 - theta`.
    pub fn elevation(&self) -> T {
        T::pi() / T::from_f64(2.0) - self.theta
    }
}
