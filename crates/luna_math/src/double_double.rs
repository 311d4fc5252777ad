//! Double-double arithmetic: an unevaluated sum `hi + lo` of two f64 values,
//! giving about 106 bits of significand.
//!
//! Addition, multiplication, division and square root are built on
//! error-free transformations (Knuth two-sum, FMA two-product). The
//! trigonometric functions start from the f64 result and apply a first-order
//! correction for `lo`, so they are accurate to roughly f64 precision; the
//! arithmetic around them keeps the extra bits.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::real::Real;

/// Extended-precision real number stored as `hi + lo` with `|lo| <= ulp(hi)/2`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleDouble {
    hi: f64,
    lo: f64,
}

/// `s + e == a + b` exactly.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let e = (a - (s - bb)) + (b - bb);
    (s, e)
}

/// `two_sum` for `|a| >= |b|`.
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    (s, b - (s - a))
}

/// `p + e == a * b` exactly.
#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    (p, a.mul_add(b, -p))
}

impl DoubleDouble {
    pub const ZERO: Self = Self { hi: 0.0, lo: 0.0 };
    pub const ONE: Self = Self { hi: 1.0, lo: 0.0 };
    pub const PI: Self = Self {
        hi: std::f64::consts::PI,
        lo: 1.224_646_799_147_353_2e-16,
    };

    /// Build from two parts, renormalising.
    pub fn new(hi: f64, lo: f64) -> Self {
        let (hi, lo) = two_sum(hi, lo);
        Self { hi, lo }
    }

    pub fn hi(self) -> f64 {
        self.hi
    }

    pub fn lo(self) -> f64 {
        self.lo
    }

    /// Exact product of two f64 values.
    pub fn from_product(a: f64, b: f64) -> Self {
        let (hi, lo) = two_prod(a, b);
        Self { hi, lo }
    }

    /// Exact sum of two f64 values.
    pub fn from_sum(a: f64, b: f64) -> Self {
        Self::new(a, b)
    }

    pub fn is_finite(self) -> bool {
        self.hi.is_finite() && self.lo.is_finite()
    }

    pub fn is_zero(self) -> bool {
        self.hi == 0.0
    }

    pub fn is_sign_negative(self) -> bool {
        self.hi < 0.0 || (self.hi == 0.0 && self.lo < 0.0)
    }
}

impl From<f64> for DoubleDouble {
    fn from(v: f64) -> Self {
        Self { hi: v, lo: 0.0 }
    }
}

impl From<DoubleDouble> for f64 {
    fn from(v: DoubleDouble) -> Self {
        v.hi + v.lo
    }
}

impl Add for DoubleDouble {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (s, e) = two_sum(self.hi, rhs.hi);
        let (t, f) = two_sum(self.lo, rhs.lo);
        let (s, e) = quick_two_sum(s, e + t);
        let (hi, lo) = quick_two_sum(s, e + f);
        Self { hi, lo }
    }
}

impl Neg for DoubleDouble {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Sub for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for DoubleDouble {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (p, e) = two_prod(self.hi, rhs.hi);
        let e = e + (self.hi * rhs.lo + self.lo * rhs.hi);
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }
}

impl Div for DoubleDouble {
    type Output = Self;

    /// Long division: three f64 quotient digits.
    fn div(self, rhs: Self) -> Self {
        let q1 = self.hi / rhs.hi;
        if !q1.is_finite() {
            return Self::from(q1);
        }
        let r = self - rhs * Self::from(q1);
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * Self::from(q2);
        let q3 = r.hi / rhs.hi;
        let (hi, lo) = quick_two_sum(q1, q2);
        Self { hi, lo } + Self::from(q3)
    }
}

impl AddAssign for DoubleDouble {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for DoubleDouble {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for DoubleDouble {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl PartialOrd for DoubleDouble {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi)? {
            Ordering::Equal => self.lo.partial_cmp(&other.lo),
            ord => Some(ord),
        }
    }
}

impl Display for DoubleDouble {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&f64::from(*self), f)
    }
}

impl Real for DoubleDouble {
    fn from_f64(v: f64) -> Self {
        Self::from(v)
    }

    fn to_f64(self) -> f64 {
        self.into()
    }

    fn pi() -> Self {
        Self::PI
    }

    /// One Newton step from the f64 root: `x + (a - x^2) / 2x`.
    fn sqrt(self) -> Self {
        if self.hi <= 0.0 {
            return if self.hi == 0.0 {
                Self::ZERO
            } else {
                Self::from(f64::NAN)
            };
        }
        let x = Self::from(self.hi.sqrt());
        x + (self - x * x) / (x * Self::from(2.0))
    }

    fn abs(self) -> Self {
        if self.is_sign_negative() { -self } else { self }
    }

    fn sin(self) -> Self {
        let (s, c) = self.hi.sin_cos();
        Self::new(s, c * self.lo)
    }

    fn cos(self) -> Self {
        let (s, c) = self.hi.sin_cos();
        Self::new(c, -s * self.lo)
    }

    /// f64 estimate refined by one Newton step on the unit circle.
    fn atan2(self, x: Self) -> Self {
        let y = self;
        if y.is_zero() && x.is_zero() {
            return Self::ZERO;
        }
        let z = Self::from(y.hi.atan2(x.hi));
        let r = (x * x + y * y).sqrt();
        let (xx, yy) = (x / r, y / r);
        if xx.hi.abs() > yy.hi.abs() {
            z + (yy - z.sin()) / z.cos()
        } else {
            z - (xx - z.cos()) / z.sin()
        }
    }
}
