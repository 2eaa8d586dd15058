//! Gradient color lookup table.
//!
//! A [`ColorGradient`] is a list of color stops over `[0, 1]`. A
//! [`GradientCache`] discretizes it into a fixed-size ramp so gradient
//! generators can fetch a color in O(1) per pixel. [`SpreadType`] decides
//! what happens outside the `[0, 1]` domain (and outside image bounds).

use crate::color::Argb;

// ============================================================================
// SpreadType
// ============================================================================

/// Policy for mapping out-of-range coordinates back into the source domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadType {
    /// Clamp to the edge value.
    #[default]
    Pad,
    /// Wrap around periodically.
    Repeat,
    /// Mirror at every boundary crossing.
    Reflect,
}

impl SpreadType {
    /// Map a gradient parameter into `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        if !t.is_finite() {
            return 0.0;
        }
        match self {
            SpreadType::Pad => t.clamp(0.0, 1.0),
            SpreadType::Repeat => t - t.floor(),
            SpreadType::Reflect => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 {
                    2.0 - m
                } else {
                    m
                }
            }
        }
    }
}

// ============================================================================
// ColorGradient
// ============================================================================

/// A color stop. `offset` is clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Argb,
}

/// Piecewise-linear color ramp defined by stops.
///
/// Interpolation runs in premultiplied space. Stops with equal offsets form
/// a hard edge; the later one wins above the offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
}

impl ColorGradient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two-stop gradient from `c0` at 0 to `c1` at 1.
    pub fn two_stop(c0: Argb, c1: Argb) -> Self {
        let mut g = Self::new();
        g.add_stop(0.0, c0);
        g.add_stop(1.0, c1);
        g
    }

    /// Insert a stop, keeping the list sorted by offset.
    pub fn add_stop(&mut self, offset: f64, color: Argb) {
        let offset = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(0.0, 1.0)
        };
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at parameter `t` in `[0, 1]`. Outside the stop range the
    /// nearest end stop is used; an empty gradient is transparent.
    pub fn color_at(&self, t: f64) -> Argb {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Argb::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        let i = self.stops.partition_point(|s| s.offset <= t);
        let (s0, s1) = (&self.stops[i - 1], &self.stops[i]);
        let span = s1.offset - s0.offset;
        if span <= 0.0 {
            return s1.color;
        }
        s0.color.lerp(&s1.color, ((t - s0.offset) / span) as f32)
    }
}

// ============================================================================
// GradientCache
// ============================================================================

/// Precomputed color ramp with `size` entries covering `t` in `[0, 1]`.
///
/// Lookup uses `index = round(t * (size - 1))`, so `t = 0` and `t = 1`
/// return the exact end colors.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCache {
    lut: Vec<Argb>,
}

impl GradientCache {
    pub const DEFAULT_SIZE: usize = 256;

    pub fn new(gradient: &ColorGradient) -> Self {
        Self::with_size(gradient, Self::DEFAULT_SIZE)
    }

    /// Build a ramp with `size` entries; sizes below 2 are raised to 2.
    pub fn with_size(gradient: &ColorGradient, size: usize) -> Self {
        let size = size.max(2);
        let last = (size - 1) as f64;
        let lut = (0..size)
            .map(|i| gradient.color_at(i as f64 / last))
            .collect();
        Self { lut }
    }

    pub fn size(&self) -> usize {
        self.lut.len()
    }

    /// Color for a spread-adjusted parameter `t`; values outside `[0, 1]`
    /// are clamped.
    #[inline]
    pub fn lookup(&self, t: f64) -> Argb {
        let last = self.lut.len() - 1;
        let i = (t.clamp(0.0, 1.0) * last as f64 + 0.5) as usize;
        self.lut[i.min(last)]
    }
}
