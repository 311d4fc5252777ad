//! Three-component vectors over any [`Real`] scalar.

use std::ops::{Add, Neg, Sub};

use crate::real::Real;

/// Cartesian 3-vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Real> Vec3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Lift an f64 triple (e.g. an ephemeris position) into `T`.
    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(T::from_f64(v[0]), T::from_f64(v[1]), T::from_f64(v[2]))
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x.to_f64(), self.y.to_f64(), self.z.to_f64()]
    }

    pub fn scale(self, k: T) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn magnitude(self) -> T {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalize(self) -> Option<Self> {
        let m = self.magnitude();
        if m == T::zero() {
            return None;
        }
        Some(Self::new(self.x / m, self.y / m, self.z / m))
    }

    /// Angle between two vectors in `[0, pi]`.
    ///
    /// Uses `atan2(|a x b|, a . b)`, which stays well conditioned near 0 and
    /// pi where the `acos` form loses most of its digits.
    pub fn angle_to(self, other: Self) -> T {
        self.cross(other).magnitude().atan2(self.dot(other))
    }
}

impl<T: Real> Add for Vec3<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Real> Sub for Vec3<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: Real> Neg for Vec3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: Real> From<[f64; 3]> for Vec3<T> {
    fn from(v: [f64; 3]) -> Self {
        Self::from_array(v)
    }
}
