//! Premultiplied floating-point ARGB color.
//!
//! Every pixel the compositor touches is an [`Argb`]: four `f32`
//! components in `[0, 1]` with color channels premultiplied by alpha.
//! Conversions to and from straight 8-bit RGBA are provided for callers
//! that exchange pixels with the outside world.

use core::ops::{Add, AddAssign, Mul, Sub};

/// Premultiplied ARGB color with `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Argb {
    pub a: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Argb {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Construct from already premultiplied components.
    #[inline]
    pub const fn new(a: f32, r: f32, g: f32, b: f32) -> Self {
        Self { a, r, g, b }
    }

    /// Construct from straight (non-premultiplied) components.
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(a, r * a, g * a, b * a)
    }

    /// Construct from straight 8-bit RGBA.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Straight 8-bit RGBA, rounding to nearest. Transparent colors map to
    /// all zeros.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let s = self.unpremultiplied();
        [to_u8(s.r), to_u8(s.g), to_u8(s.b), to_u8(self.a)]
    }

    /// Components divided by alpha, or zero if alpha is zero.
    pub fn unpremultiplied(&self) -> Self {
        if self.a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let k = 1.0 / self.a;
        Self::new(self.a, self.r * k, self.g * k, self.b * k)
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Linear interpolation from `self` (at `k = 0`) to `c` (at `k = 1`).
    #[inline]
    pub fn lerp(&self, c: &Argb, k: f32) -> Argb {
        *self + (*c - *self) * k
    }

    /// Clamp every component to `[0, 1]` and color channels to alpha.
    pub fn clamped(&self) -> Self {
        let a = self.a.clamp(0.0, 1.0);
        Self::new(
            a,
            self.r.clamp(0.0, a),
            self.g.clamp(0.0, a),
            self.b.clamp(0.0, a),
        )
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

impl Add for Argb {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.a + rhs.a, self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Argb {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Argb {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.a - rhs.a, self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f32> for Argb {
    type Output = Self;

    #[inline]
    fn mul(self, k: f32) -> Self {
        Self::new(self.a * k, self.r * k, self.g * k, self.b * k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_straight_premultiplies() {
        let c = Argb::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Argb::new(0.5, 0.5, 0.25, 0.0));
    }

    #[test]
    fn test_rgba8_roundtrip() {
        let c = Argb::from_rgba8(255, 128, 0, 255);
        assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
        assert!(c.is_opaque());
    }

    #[test]
    fn test_transparent_to_rgba8() {
        assert_eq!(Argb::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
        assert!(Argb::TRANSPARENT.is_transparent());
    }

    #[test]
    fn test_lerp() {
        let c = Argb::BLACK.lerp(&Argb::WHITE, 0.5);
        assert_eq!(c, Argb::new(1.0, 0.5, 0.5, 0.5));
        assert_eq!(Argb::BLACK.lerp(&Argb::WHITE, 0.0), Argb::BLACK);
        assert_eq!(Argb::BLACK.lerp(&Argb::WHITE, 1.0), Argb::WHITE);
    }

    #[test]
    fn test_clamped() {
        let c = Argb::new(1.2, 1.5, -0.1, 0.3).clamped();
        assert_eq!(c, Argb::new(1.0, 1.0, 0.0, 0.3));
    }
}
