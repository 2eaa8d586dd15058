//! Gradient generators.
//!
//! A gradient generator is a [`GradientFunction`] that maps a point to a
//! scalar parameter `t`, wrapped in a [`SpanGradient`] that applies the
//! spread policy to `t` and looks the result up in a [`GradientCache`].
//!
//! `t = 0` corresponds to the first stop of the ramp and `t = 1` to the
//! last.

use std::sync::Arc;

use crate::color::Argb;
use crate::gradient_lut::{GradientCache, SpreadType};
use crate::vec2::Vec2D;

/// Fraction of the radius a focal point is pulled back to when it lies on
/// or outside the circle.
const FOCAL_PULL_IN: f64 = 0.999;

// ============================================================================
// GradientFunction trait
// ============================================================================

/// Maps a point to a gradient parameter, before spread.
pub trait GradientFunction {
    fn calculate(&self, p: Vec2D) -> f64;
}

// ============================================================================
// Gradient functions
// ============================================================================

/// Projection onto the `start -> end` axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientLinear {
    start: Vec2D,
    dir: Vec2D,
    sq_len: f64,
}

impl GradientLinear {
    /// A zero-length axis puts every point at `t = 1`.
    pub fn new(start: Vec2D, end: Vec2D) -> Self {
        let dir = end - start;
        let sq_len = dir.sq_length();
        if sq_len == 0.0 {
            log::debug!("degenerate linear gradient axis at {start:?}");
        }
        Self { start, dir, sq_len }
    }
}

impl GradientFunction for GradientLinear {
    #[inline]
    fn calculate(&self, p: Vec2D) -> f64 {
        if self.sq_len == 0.0 {
            return 1.0;
        }
        (p - self.start).dot(self.dir) / self.sq_len
    }
}

/// Distance from the center over the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientRadial {
    center: Vec2D,
    radius: f64,
}

impl GradientRadial {
    /// The sign of `radius` is ignored; a zero radius puts every point at
    /// `t = 1`.
    pub fn new(center: Vec2D, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}

impl GradientFunction for GradientRadial {
    #[inline]
    fn calculate(&self, p: Vec2D) -> f64 {
        if self.radius == 0.0 {
            return 1.0;
        }
        (p - self.center).length() / self.radius
    }
}

/// Two-point radial gradient: circles interpolate from the focal point
/// (`t = 0`) to the outer circle (`t = 1`).
///
/// For a point `p`, `t` is `|p - f|` divided by the distance from the focal
/// point `f` to the circle along the ray through `p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientRadialFocus {
    center: Vec2D,
    radius: f64,
    focal: Vec2D,
}

impl GradientRadialFocus {
    pub fn new(center: Vec2D, radius: f64, focal: Vec2D) -> Self {
        let radius = radius.abs();
        let mut focal = focal;
        let offset = focal - center;
        let dist = offset.length();
        if radius > 0.0 && dist >= radius * FOCAL_PULL_IN {
            focal = center + offset * (radius * FOCAL_PULL_IN / dist);
            log::debug!("focal point pulled inside gradient circle to {focal:?}");
        }
        Self {
            center,
            radius,
            focal,
        }
    }

    pub fn focal(&self) -> Vec2D {
        self.focal
    }
}

impl GradientFunction for GradientRadialFocus {
    fn calculate(&self, p: Vec2D) -> f64 {
        if self.radius == 0.0 {
            return 1.0;
        }
        let d = p - self.focal;
        let len = d.length();
        if len == 0.0 {
            return 0.0;
        }
        let dir = d / len;
        let fc = self.focal - self.center;
        let b = fc.dot(dir);
        let disc = b * b - fc.sq_length() + self.radius * self.radius;
        // The focal point is strictly inside the circle, so `disc > 0`.
        let u = -b + disc.max(0.0).sqrt();
        if u <= 0.0 {
            return 1.0;
        }
        len / u
    }
}

// ============================================================================
// SpanGradient
// ============================================================================

/// Gradient generator: function, spread, and color ramp.
#[derive(Debug, Clone)]
pub struct SpanGradient<G> {
    function: G,
    cache: Arc<GradientCache>,
    spread: SpreadType,
}

impl<G: GradientFunction> SpanGradient<G> {
    pub fn new(function: G, cache: Arc<GradientCache>) -> Self {
        Self {
            function,
            cache,
            spread: SpreadType::Pad,
        }
    }

    pub fn set_spread_type(&mut self, spread: SpreadType) {
        self.spread = spread;
    }

    pub fn spread_type(&self) -> SpreadType {
        self.spread
    }

    pub fn gradient_function(&self) -> &G {
        &self.function
    }

    /// Spread-adjusted parameter at `p`.
    #[inline]
    pub fn parameter(&self, p: Vec2D) -> f64 {
        self.spread.apply(self.function.calculate(p))
    }

    #[inline]
    pub fn color_at(&self, p: Vec2D) -> Argb {
        self.cache.lookup(self.parameter(p))
    }
}
