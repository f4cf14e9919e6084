use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A point on the complex plane.
///
/// Plain `Copy` value with pure arithmetic; every operation returns a new
/// value and nothing is mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// `re² + im²`, used by the escape test to avoid a square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude `|z|`.
    #[inline]
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Argument in radians, in `(-π, π]`.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// `z²`, expanded so the hot loop does not go through the general product.
    #[inline]
    pub fn square(self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: 2.0 * self.re * self.im,
        }
    }

    /// `true` when both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Scaling by a real factor.
impl Mul<f64> for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.re * rhs, self.im * rhs)
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{} - {}i", self.re, -self.im)
        } else {
            write!(f, "{} + {}i", self.re, self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn add_and_sub_are_inverse() {
        let a = Complex::new(1.5, -2.0);
        let b = Complex::new(-0.25, 4.0);
        let back = (a + b) - b;
        assert!(approx_eq(back.re, a.re));
        assert!(approx_eq(back.im, a.im));
    }

    #[test]
    fn product() {
        // (1 + 2i)(3 + 4i) = -5 + 10i
        let c = Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0);
        assert!(approx_eq(c.re, -5.0));
        assert!(approx_eq(c.im, 10.0));
    }

    #[test]
    fn square_matches_product() {
        let z = Complex::new(0.3, -1.7);
        assert_eq!(z.square(), z * z);
    }

    #[test]
    fn scaling_and_negation() {
        let z = Complex::new(2.0, -3.0) * 0.5;
        assert_eq!(z, Complex::new(1.0, -1.5));
        assert_eq!(-z, Complex::new(-1.0, 1.5));
    }

    #[test]
    fn magnitude() {
        let z = Complex::new(3.0, 4.0);
        assert!(approx_eq(z.norm_sq(), 25.0));
        assert!(approx_eq(z.norm(), 5.0));
    }

    #[test]
    fn argument_quadrants() {
        assert!(approx_eq(Complex::new(1.0, 0.0).arg(), 0.0));
        assert!(approx_eq(Complex::new(0.0, 1.0).arg(), FRAC_PI_2));
        assert!(approx_eq(Complex::new(-1.0, 0.0).arg(), PI));
        assert!(approx_eq(Complex::new(0.0, -1.0).arg(), -FRAC_PI_2));
    }

    #[test]
    fn display_sign() {
        assert_eq!(Complex::new(1.0, 2.0).to_string(), "1 + 2i");
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1 - 2i");
    }
}
