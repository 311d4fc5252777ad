//! Scalar abstraction shared by the vector, matrix and coordinate code.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A real-number type the geometry helpers can be instantiated over.
///
/// Implemented for `f64` and [`DoubleDouble`](crate::DoubleDouble).
pub trait Real:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;

    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    fn one() -> Self {
        Self::from_f64(1.0)
    }

    fn pi() -> Self;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    /// Four-quadrant arctangent of `self / x`, in `(-pi, pi]`.
    fn atan2(self, x: Self) -> Self;
}

impl Real for f64 {
    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn pi() -> Self {
        std::f64::consts::PI
    }

    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    fn abs(self) -> Self {
        f64::abs(self)
    }

    fn sin(self) -> Self {
        f64::sin(self)
    }

    fn cos(self) -> Self {
        f64::cos(self)
    }

    fn atan2(self, x: Self) -> Self {
        f64::atan2(self, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hypot<T: Real>(a: T, b: T) -> T {
        (a * a + b * b).sqrt()
    }

    #[test]
    fn generic_code_over_f64() {
        assert_eq!(hypot(3.0_f64, 4.0), 5.0);
        assert_eq!(<f64 as Real>::zero(), 0.0);
        assert_eq!(<f64 as Real>::one(), 1.0);
        assert!((Real::atan2(1.0_f64, 1.0) - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
    }
}
