//! Image resampling kernels.
//!
//! The kernels used when an image brush is drawn through a general affine
//! transform, and [`ImageTransformType`], the paint-state setting that picks
//! one of them.

use crate::basics::PI;

// ============================================================================
// ImageTransformType
// ============================================================================

/// Interpolation quality for transformed image brushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageTransformType {
    /// Single tap, no filtering.
    NearestNeighbor,
    /// 2x2 taps, linear weights.
    #[default]
    Bilinear,
    /// 4x4 taps, Keys cubic convolution (`a = -0.5`).
    Bicubic,
    /// 4x4 taps, separable Lanczos window of radius 2.
    Lanczos2,
    /// 4x4 taps, Lanczos radius-2 weight of the radial tap distance.
    Lanczos2Hypot,
}

impl ImageTransformType {
    /// Kernel radius in source pixels; zero for nearest neighbor.
    pub fn radius(self) -> f64 {
        match self {
            ImageTransformType::NearestNeighbor => 0.0,
            ImageTransformType::Bilinear => ImageFilterBilinear.radius(),
            ImageTransformType::Bicubic => ImageFilterBicubic.radius(),
            ImageTransformType::Lanczos2 | ImageTransformType::Lanczos2Hypot => {
                ImageFilterLanczos2.radius()
            }
        }
    }
}

// ============================================================================
// ImageFilterFunction trait
// ============================================================================

/// Image filter shape function: a symmetric weight over tap distance.
pub trait ImageFilterFunction {
    /// The radius of the filter kernel.
    fn radius(&self) -> f64;
    /// Weight at distance `x` from the center; `x` may be negative.
    fn calc_weight(&self, x: f64) -> f64;
}

/// Tent filter, radius 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilterBilinear;

impl ImageFilterFunction for ImageFilterBilinear {
    fn radius(&self) -> f64 {
        1.0
    }
    fn calc_weight(&self, x: f64) -> f64 {
        (1.0 - x.abs()).max(0.0)
    }
}

/// Keys cubic convolution with `a = -0.5` (Catmull-Rom), radius 2.
///
/// Interpolating: weights are 1 at the center tap and 0 at the others when
/// sampling exactly on a pixel center.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilterBicubic;

impl ImageFilterFunction for ImageFilterBicubic {
    fn radius(&self) -> f64 {
        2.0
    }
    fn calc_weight(&self, x: f64) -> f64 {
        let x = x.abs();
        if x <= 1.0 {
            (1.5 * x - 2.5) * x * x + 1.0
        } else if x < 2.0 {
            ((-0.5 * x + 2.5) * x - 4.0) * x + 2.0
        } else {
            0.0
        }
    }
}

/// Lanczos window, radius 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilterLanczos2;

impl ImageFilterFunction for ImageFilterLanczos2 {
    fn radius(&self) -> f64 {
        2.0
    }
    fn calc_weight(&self, x: f64) -> f64 {
        let x = x.abs();
        if x == 0.0 {
            return 1.0;
        }
        if x >= 2.0 {
            return 0.0;
        }
        let x = x * PI;
        let xr = x / 2.0;
        (x.sin() / x) * (xr.sin() / xr)
    }
}
