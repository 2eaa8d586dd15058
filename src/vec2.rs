//! Double-precision 2D vector.
//!
//! Used both as a point and as a displacement. All curve and transform math
//! in this crate runs on `Vec2D`.

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A 2D point or vector with `f64` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2D {
    pub x: f64,
    pub y: f64,
}

impl Vec2D {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[inline]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Squared length. Prefer this over [`Vec2D::length`] on hot paths.
    #[inline]
    pub fn sq_length(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.sq_length().sqrt()
    }

    /// Direction angle in radians, `atan2(y, x)`.
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        (self + other) * 0.5
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2D {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2D {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2D {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2D {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2D {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2D> for f64 {
    type Output = Vec2D;

    #[inline]
    fn mul(self, rhs: Vec2D) -> Vec2D {
        rhs * self
    }
}

impl Div<f64> for Vec2D {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2D {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Vec2D::new(1.0, 2.0);
        let b = Vec2D::new(3.0, -1.0);
        assert_eq!(a + b, Vec2D::new(4.0, 1.0));
        assert_eq!(a - b, Vec2D::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2D::new(2.0, 4.0));
        assert_eq!(2.0 * a, Vec2D::new(2.0, 4.0));
        assert_eq!(-a, Vec2D::new(-1.0, -2.0));
        assert_eq!(b / 2.0, Vec2D::new(1.5, -0.5));
    }

    #[test]
    fn test_dot_and_length() {
        let a = Vec2D::new(3.0, 4.0);
        assert_eq!(a.dot(Vec2D::new(1.0, 0.0)), 3.0);
        assert_eq!(a.sq_length(), 25.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a.cross(Vec2D::new(1.0, 0.0)), -4.0);
    }

    #[test]
    fn test_midpoint() {
        let m = Vec2D::new(0.0, 0.0).midpoint(Vec2D::new(2.0, 4.0));
        assert_eq!(m, Vec2D::new(1.0, 2.0));
    }
}
