//! Resampling image generator.
//!
//! [`ImageSampler`] reconstructs a color at a fractional source-space
//! coordinate with one of the [`ImageTransformType`] kernels. Source pixel
//! `i` covers `[i, i + 1)` and has its center at `i + 0.5`. Every tap goes
//! through the spread rule before it is weighted, so kernels near an edge
//! see padded, tiled or mirrored neighbors.

use crate::color::Argb;
use crate::gradient_lut::SpreadType;
use crate::image_accessors::ImageAccessor;
use crate::image_filters::{
    ImageFilterBicubic, ImageFilterBilinear, ImageFilterFunction, ImageFilterLanczos2,
    ImageTransformType,
};
use crate::rendering_buffer::{Bitmap, Image};
use crate::vec2::Vec2D;

/// Sample coordinates are clamped to `±2^52`, where every `f64` is already
/// an integer and tap indices stay far from `i64` overflow.
const COORD_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Image resampling generator.
///
/// Holds a shared handle to the source image; cloning the brush image is
/// cheap and the sampler never writes to it.
#[derive(Debug, Clone)]
pub struct ImageSampler {
    image: Image,
    spread: SpreadType,
    filter: ImageTransformType,
}

impl ImageSampler {
    pub fn new(image: Image, filter: ImageTransformType) -> Self {
        Self {
            image,
            spread: SpreadType::Repeat,
            filter,
        }
    }

    pub fn set_spread_type(&mut self, spread: SpreadType) {
        self.spread = spread;
    }

    pub fn spread_type(&self) -> SpreadType {
        self.spread
    }

    pub fn filter(&self) -> ImageTransformType {
        self.filter
    }

    /// Color at source-space point `p`. A null image yields transparent.
    pub fn sample(&self, p: Vec2D) -> Argb {
        let Some(acc) = self.image.bitmap().and_then(|b| ImageAccessor::new(b, self.spread)) else {
            return Argb::TRANSPARENT;
        };
        let p = Vec2D::new(
            p.x.clamp(-COORD_LIMIT, COORD_LIMIT),
            p.y.clamp(-COORD_LIMIT, COORD_LIMIT),
        );
        match self.filter {
            ImageTransformType::NearestNeighbor => {
                acc.pixel(p.x.floor() as i64, p.y.floor() as i64)
            }
            ImageTransformType::Bilinear => sample_separable(&acc, p, &ImageFilterBilinear),
            ImageTransformType::Bicubic => {
                sample_separable(&acc, p, &ImageFilterBicubic).clamped()
            }
            ImageTransformType::Lanczos2 => {
                sample_separable(&acc, p, &ImageFilterLanczos2).clamped()
            }
            ImageTransformType::Lanczos2Hypot => sample_radial(&acc, p).clamped(),
        }
    }

    pub fn bitmap(&self) -> Option<&Bitmap<Argb>> {
        self.image.bitmap()
    }
}

/// Weighted sum over the `2r x 2r` taps around `p` with separable weights,
/// normalized by the total weight.
fn sample_separable<F: ImageFilterFunction>(acc: &ImageAccessor<'_>, p: Vec2D, f: &F) -> Argb {
    let r = f.radius() as i64;
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;

    let mut sum = Argb::TRANSPARENT;
    let mut total = 0.0;
    for j in (y0 - r + 1)..=(y0 + r) {
        let wy = f.calc_weight(fy - j as f64);
        if wy == 0.0 {
            continue;
        }
        for i in (x0 - r + 1)..=(x0 + r) {
            let w = wy * f.calc_weight(fx - i as f64);
            if w == 0.0 {
                continue;
            }
            sum += acc.pixel(i, j) * w as f32;
            total += w;
        }
    }
    normalize(sum, total)
}

/// Lanczos-2 weights of the Euclidean tap distance over a 4x4 footprint.
fn sample_radial(acc: &ImageAccessor<'_>, p: Vec2D) -> Argb {
    let f = ImageFilterLanczos2;
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;

    let mut sum = Argb::TRANSPARENT;
    let mut total = 0.0;
    for j in (y0 - 1)..=(y0 + 2) {
        let dy = fy - j as f64;
        for i in (x0 - 1)..=(x0 + 2) {
            let dx = fx - i as f64;
            let w = f.calc_weight(dx.hypot(dy));
            if w == 0.0 {
                continue;
            }
            sum += acc.pixel(i, j) * w as f32;
            total += w;
        }
    }
    normalize(sum, total)
}

#[inline]
fn normalize(sum: Argb, total: f64) -> Argb {
    if total.abs() < 1e-12 {
        Argb::TRANSPARENT
    } else {
        sum * (1.0 / total) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(v: f32) -> Argb {
        Argb::new(1.0, v, v, v)
    }

    /// 4x4 image whose pixel (x, y) has red = x / 3, blue = y / 3.
    fn ramp_image() -> Image {
        let data = (0..16)
            .map(|i| Argb::new(1.0, (i % 4) as f32 / 3.0, 0.0, (i / 4) as f32 / 3.0))
            .collect();
        Image::from_bitmap(Bitmap::from_vec(4, 4, data).unwrap())
    }

    const ALL: [ImageTransformType; 5] = [
        ImageTransformType::NearestNeighbor,
        ImageTransformType::Bilinear,
        ImageTransformType::Bicubic,
        ImageTransformType::Lanczos2,
        ImageTransformType::Lanczos2Hypot,
    ];

    #[test]
    fn test_pixel_centers_exact() {
        let img = ramp_image();
        for filter in &ALL[..4] {
            let s = ImageSampler::new(img.clone(), *filter);
            for (x, y) in [(0, 0), (1, 2), (3, 3)] {
                let got = s.sample(Vec2D::new(x as f64 + 0.5, y as f64 + 0.5));
                let want = img.pixel(x, y);
                assert!(
                    (got.r - want.r).abs() < 1e-5 && (got.b - want.b).abs() < 1e-5,
                    "{filter:?} at ({x}, {y}): {got:?} != {want:?}"
                );
            }
        }
    }

    #[test]
    fn test_hypot_preserves_linear_ramp_inside() {
        // Diagonal taps carry weight, but symmetric weights over a linear
        // ramp still reproduce the center value away from the edges.
        let img = ramp_image();
        let s = ImageSampler::new(img.clone(), ImageTransformType::Lanczos2Hypot);
        for (x, y) in [(1, 1), (2, 1), (1, 2)] {
            let got = s.sample(Vec2D::new(x as f64 + 0.5, y as f64 + 0.5));
            let want = img.pixel(x, y);
            assert!((got.r - want.r).abs() < 1e-5, "({x}, {y}): {got:?}");
            assert!((got.b - want.b).abs() < 1e-5, "({x}, {y}): {got:?}");
        }
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let mut img = Image::new(3, 3);
        img.fill(gray(0.5));
        for filter in ALL {
            let mut s = ImageSampler::new(img.clone(), filter);
            s.set_spread_type(SpreadType::Pad);
            let c = s.sample(Vec2D::new(1.3, 0.2));
            assert!((c.r - 0.5).abs() < 1e-5, "{filter:?}: {c:?}");
            assert!((c.a - 1.0).abs() < 1e-5, "{filter:?}: {c:?}");
        }
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut s = ImageSampler::new(ramp_image(), ImageTransformType::Bilinear);
        s.set_spread_type(SpreadType::Pad);
        // Halfway between pixel centers 1 and 2 on row 0.
        let c = s.sample(Vec2D::new(2.0, 0.5));
        assert!((c.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_huge_coordinates_wrap_without_overflow() {
        for filter in ALL {
            for spread in [SpreadType::Pad, SpreadType::Repeat, SpreadType::Reflect] {
                let mut s = ImageSampler::new(ramp_image(), filter);
                s.set_spread_type(spread);
                for p in [
                    Vec2D::new(1e30, 0.5),
                    Vec2D::new(0.5, -1e30),
                    Vec2D::new(f64::MAX, f64::MIN),
                    Vec2D::new(9.2e18, 9.2e18),
                ] {
                    let c = s.sample(p);
                    assert!(c.a >= 0.0 && c.a <= 1.0 + 1e-5, "{filter:?} {spread:?} {p:?}: {c:?}");
                }
            }
        }
    }

    #[test]
    fn test_nearest_uses_spread() {
        let mut s = ImageSampler::new(ramp_image(), ImageTransformType::NearestNeighbor);
        s.set_spread_type(SpreadType::Repeat);
        let c = s.sample(Vec2D::new(5.5, 0.5));
        assert!((c.r - 1.0 / 3.0).abs() < 1e-6);

        s.set_spread_type(SpreadType::Pad);
        let c = s.sample(Vec2D::new(5.5, 0.5));
        assert!((c.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_null_image_is_transparent() {
        let s = ImageSampler::new(Image::default(), ImageTransformType::Bicubic);
        assert_eq!(s.sample(Vec2D::new(0.5, 0.5)), Argb::TRANSPARENT);
    }
}
