//! Fillers and generators: per-pixel color production for a draw call.
//!
//! A [`Filler`] is what the compositor pulls colors from. It either knows
//! the color directly (solid fill, integer-offset image) or delegates to a
//! [`Generator`] through an inverse transform. Both are built per draw call
//! by the fill strategy selector and dropped when the call returns.

use crate::basics::PointI;
use crate::color::Argb;
use crate::gradient_lut::SpreadType;
use crate::image_accessors::ImageAccessor;
use crate::renderer_scanline::SpanGenerator;
use crate::rendering_buffer::Image;
use crate::span_gradient::{GradientLinear, GradientRadial, GradientRadialFocus, SpanGradient};
use crate::span_image_filter::ImageSampler;
use crate::trans_affine::TransAffine;
use crate::vec2::Vec2D;

// ============================================================================
// Generator
// ============================================================================

/// Color source evaluated at a continuous point.
#[derive(Debug, Clone)]
pub enum Generator {
    /// Resampled image.
    Image(ImageSampler),
    Linear(SpanGradient<GradientLinear>),
    Radial(SpanGradient<GradientRadial>),
    /// Radial gradient with a focal point distinct from the center.
    Focal(SpanGradient<GradientRadialFocus>),
}

impl Generator {
    #[inline]
    pub fn color_at(&self, p: Vec2D) -> Argb {
        match self {
            Generator::Image(g) => g.sample(p),
            Generator::Linear(g) => g.color_at(p),
            Generator::Radial(g) => g.color_at(p),
            Generator::Focal(g) => g.color_at(p),
        }
    }

    pub fn set_spread_type(&mut self, spread: SpreadType) {
        match self {
            Generator::Image(g) => g.set_spread_type(spread),
            Generator::Linear(g) => g.set_spread_type(spread),
            Generator::Radial(g) => g.set_spread_type(spread),
            Generator::Focal(g) => g.set_spread_type(spread),
        }
    }

    pub fn spread_type(&self) -> SpreadType {
        match self {
            Generator::Image(g) => g.spread_type(),
            Generator::Linear(g) => g.spread_type(),
            Generator::Radial(g) => g.spread_type(),
            Generator::Focal(g) => g.spread_type(),
        }
    }

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Image(_) => "image sampler",
            Generator::Linear(_) => "linear gradient",
            Generator::Radial(_) => "radial gradient",
            Generator::Focal(_) => "focal gradient",
        }
    }
}

// ============================================================================
// Filler
// ============================================================================

/// Per-draw-call color producer consumed by the scanline compositor.
#[derive(Debug, Clone)]
pub enum Filler {
    /// Constant premultiplied color.
    Solid(Argb),
    /// Destination pixel `(x, y)` reads source pixel `(x, y) + offset`,
    /// wrapped by `spread`.
    DirectImage {
        image: Image,
        offset: PointI,
        spread: SpreadType,
    },
    /// Destination pixel centers are mapped through `transform` (device to
    /// generator space) and evaluated by the generator. `None` means the
    /// generator is already parameterized in device space.
    Generated {
        generator: Generator,
        transform: Option<TransAffine>,
    },
}

impl Filler {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Filler::Solid(_) => "solid",
            Filler::DirectImage { .. } => "direct image",
            Filler::Generated { generator, .. } => generator.name(),
        }
    }

    /// Color of destination pixel `(x, y)`.
    pub fn pixel(&self, x: i32, y: i32) -> Argb {
        let mut c = [Argb::TRANSPARENT];
        self.fill_span(&mut c, x, y);
        c[0]
    }

    /// Fill `span` with the colors of destination pixels `x..x + span.len()`
    /// on row `y`.
    pub fn fill_span(&self, span: &mut [Argb], x: i32, y: i32) {
        match self {
            Filler::Solid(c) => span.fill(*c),
            Filler::DirectImage {
                image,
                offset,
                spread,
            } => {
                match image.bitmap().and_then(|b| ImageAccessor::new(b, *spread)) {
                    Some(acc) => acc.row_span(
                        x as i64 + offset.x as i64,
                        y as i64 + offset.y as i64,
                        span,
                    ),
                    None => span.fill(Argb::TRANSPARENT),
                }
            }
            Filler::Generated {
                generator,
                transform,
            } => {
                let py = y as f64 + 0.5;
                match transform {
                    None => {
                        for (i, out) in span.iter_mut().enumerate() {
                            let p = Vec2D::new((x as i64 + i as i64) as f64 + 0.5, py);
                            *out = generator.color_at(p);
                        }
                    }
                    Some(mtx) => {
                        // Affine maps are linear along the row, so step in
                        // generator space instead of transforming every pixel.
                        let mut p = mtx.transform(Vec2D::new(x as f64 + 0.5, py));
                        let step = mtx.transform_2x2(Vec2D::new(1.0, 0.0));
                        for out in span.iter_mut() {
                            *out = generator.color_at(p);
                            p += step;
                        }
                    }
                }
            }
        }
    }
}

impl SpanGenerator for Filler {
    type Color = Argb;

    fn prepare(&mut self) {}

    fn generate(&mut self, span: &mut [Argb], x: i32, y: i32, len: u32) {
        let len = (len as usize).min(span.len());
        self.fill_span(&mut span[..len], x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient_lut::{ColorGradient, GradientCache};
    use crate::image_filters::ImageTransformType;
    use crate::rendering_buffer::Bitmap;
    use std::sync::Arc;

    const RED: Argb = Argb::new(1.0, 1.0, 0.0, 0.0);
    const BLUE: Argb = Argb::new(1.0, 0.0, 0.0, 1.0);

    /// 4x4 image whose pixel (x, y) has red = x and green = y (unnormalized).
    fn index_image() -> Image {
        let data = (0..16)
            .map(|i| Argb::new(1.0, (i % 4) as f32, (i / 4) as f32, 0.0))
            .collect();
        Image::from_bitmap(Bitmap::from_vec(4, 4, data).unwrap())
    }

    #[test]
    fn test_solid_filler() {
        let f = Filler::Solid(RED);
        let mut span = [Argb::TRANSPARENT; 5];
        f.fill_span(&mut span, -3, 7);
        assert_eq!(span, [RED; 5]);
        assert_eq!(f.name(), "solid");
    }

    #[test]
    fn test_direct_repeat_offset() {
        let f = Filler::DirectImage {
            image: index_image(),
            offset: PointI::new(5, 0),
            spread: SpreadType::Repeat,
        };
        let c = f.pixel(0, 0);
        assert_eq!((c.r, c.g), (1.0, 0.0));
    }

    #[test]
    fn test_direct_spreads() {
        let mut row = [Argb::TRANSPARENT; 6];
        for (spread, want) in [
            (SpreadType::Pad, [0.0, 0.0, 0.0, 0.0, 1.0, 2.0]),
            (SpreadType::Repeat, [1.0, 2.0, 3.0, 0.0, 1.0, 2.0]),
            (SpreadType::Reflect, [2.0, 1.0, 0.0, 0.0, 1.0, 2.0]),
        ] {
            let f = Filler::DirectImage {
                image: index_image(),
                offset: PointI::new(-3, 1),
                spread,
            };
            f.fill_span(&mut row, 0, 0);
            let got: Vec<f32> = row.iter().map(|c| c.r).collect();
            assert_eq!(got, want, "{spread:?}");
            assert!(row.iter().all(|c| c.g == 1.0));
        }
    }

    #[test]
    fn test_direct_null_image_is_transparent() {
        let f = Filler::DirectImage {
            image: Image::default(),
            offset: PointI::new(0, 0),
            spread: SpreadType::Pad,
        };
        assert_eq!(f.pixel(2, 2), Argb::TRANSPARENT);
    }

    fn linear(start: Vec2D, end: Vec2D) -> Generator {
        let cache = Arc::new(GradientCache::new(&ColorGradient::two_stop(RED, BLUE)));
        Generator::Linear(SpanGradient::new(GradientLinear::new(start, end), cache))
    }

    #[test]
    fn test_generated_samples_pixel_centers() {
        let f = Filler::Generated {
            generator: linear(Vec2D::new(0.5, 0.0), Vec2D::new(3.5, 0.0)),
            transform: None,
        };
        let mut span = [Argb::TRANSPARENT; 4];
        f.fill_span(&mut span, 0, 0);
        assert_eq!(span[0], RED);
        assert_eq!(span[3], BLUE);
    }

    #[test]
    fn test_generated_with_transform_matches_per_pixel() {
        let mut mtx = TransAffine::new_rotation(0.3);
        mtx.scale(0.5, 0.25);
        mtx.translate(3.0, -1.0);
        let f = Filler::Generated {
            generator: linear(Vec2D::new(0.0, 0.0), Vec2D::new(4.0, 1.0)),
            transform: Some(mtx),
        };
        let mut span = [Argb::TRANSPARENT; 8];
        f.fill_span(&mut span, 2, 3);
        let Filler::Generated { generator, .. } = &f else {
            unreachable!()
        };
        for (i, c) in span.iter().enumerate() {
            let p = mtx.transform(Vec2D::new(2.0 + i as f64 + 0.5, 3.5));
            let want = generator.color_at(p);
            assert!((c.r - want.r).abs() < 0.01, "pixel {i}: {c:?} vs {want:?}");
        }
    }

    #[test]
    fn test_generator_spread_forwarding() {
        let mut g = Generator::Image(ImageSampler::new(
            index_image(),
            ImageTransformType::NearestNeighbor,
        ));
        assert_eq!(g.spread_type(), SpreadType::Repeat);
        g.set_spread_type(SpreadType::Reflect);
        assert_eq!(g.spread_type(), SpreadType::Reflect);
        assert_eq!(g.name(), "image sampler");
    }

    #[test]
    fn test_span_generator_respects_len() {
        let mut f = Filler::Solid(BLUE);
        let mut span = [Argb::TRANSPARENT; 4];
        f.prepare();
        f.generate(&mut span, 0, 0, 2);
        assert_eq!(span, [BLUE, BLUE, Argb::TRANSPARENT, Argb::TRANSPARENT]);
    }
}
