//! 3x3 matrices for frame rotations.

use std::ops::Mul;

use crate::real::Real;
use crate::vector::Vec3;

/// Row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3<T> {
    pub rows: [[T; 3]; 3],
}

impl<T: Real> Mat3<T> {
    pub fn new(rows: [[T; 3]; 3]) -> Self {
        Self { rows }
    }

    pub fn identity() -> Self {
        let (o, l) = (T::zero(), T::one());
        Self::new([[l, o, o], [o, l, o], [o, o, l]])
    }

    /// Frame rotation about the x axis by `angle` (radians).
    ///
    /// Rotates the coordinate frame, not the vector: a positive angle turns
    /// +y toward +z as seen from the new frame, i.e. `R1(angle)`.
    pub fn rotation_x(angle: T) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, l) = (T::zero(), T::one());
        Self::new([[l, o, o], [o, c, s], [o, -s, c]])
    }

    /// Frame rotation about the y axis, `R2(angle)`.
    pub fn rotation_y(angle: T) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, l) = (T::zero(), T::one());
        Self::new([[c, o, -s], [o, l, o], [s, o, c]])
    }

    /// Frame rotation about the z axis, `R3(angle)`.
    pub fn rotation_z(angle: T) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, l) = (T::zero(), T::one());
        Self::new([[c, s, o], [-s, c, o], [o, o, l]])
    }

    pub fn transpose(self) -> Self {
        let r = self.rows;
        Self::new([
            [r[0][0], r[1][0], r[2][0]],
            [r[0][1], r[1][1], r[2][1]],
            [r[0][2], r[1][2], r[2][2]],
        ])
    }

    pub fn mul_vec(&self, v: Vec3<T>) -> Vec3<T> {
        let row = |i: usize| {
            let r = self.rows[i];
            r[0] * v.x + r[1] * v.y + r[2] * v.z
        };
        Vec3::new(row(0), row(1), row(2))
    }

    pub fn mul_mat(&self, other: &Self) -> Self {
        let a = &self.rows;
        let b = &other.rows;
        let cell = |i: usize, j: usize| a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        Self::new([
            [cell(0, 0), cell(0, 1), cell(0, 2)],
            [cell(1, 0), cell(1, 1), cell(1, 2)],
            [cell(2, 0), cell(2, 1), cell(2, 2)],
        ])
    }
}

impl<T: Real> Mul for Mat3<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl<T: Real> Mul<Vec3<T>> for Mat3<T> {
    type Output = Vec3<T>;

    fn mul(self, rhs: Vec3<T>) -> Vec3<T> {
        self.mul_vec(rhs)
    }
}
