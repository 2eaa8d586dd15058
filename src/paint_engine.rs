//! Paint engine: draw calls on an [`Image`].
//!
//! Each draw call snapshots the current [`PaintState`], picks a fill
//! strategy for the brush ([`select_filler`]), rasterizes the path in
//! device space and hands the coverage to the scanline compositor.
//!
//! The world transform maps device space to the painter's space, so the
//! engine maps paths by its inverse. Brush space reaches device space
//! through the brush transform followed by that inverse.

use crate::basics::{FillingRule, PointI};
use crate::brush::{Brush, BrushKind};
use crate::color::Argb;
use crate::comp_op::BlendMode;
use crate::conv_curve::PathVertexStream;
use crate::error::{FillError, Result};
use crate::gradient_lut::SpreadType;
use crate::image_filters::ImageTransformType;
use crate::path_storage::Path;
use crate::rasterizer_scanline_aa::RasterizerScanlineAa;
use crate::renderer_scanline::{paste_image, render_scanlines};
use crate::rendering_buffer::Image;
use crate::scanline_u::ScanlineU8;
use crate::span_generator::{Filler, Generator};
use crate::span_gradient::{GradientLinear, GradientRadial, GradientRadialFocus, SpanGradient};
use crate::span_image_filter::ImageSampler;
use crate::trans_affine::TransAffine;
use crate::vec2::Vec2D;

// ============================================================================
// PaintState
// ============================================================================

/// Everything a draw call reads besides its geometry.
#[derive(Debug, Clone)]
pub struct PaintState {
    pub blend_mode: BlendMode,
    /// Current pen color. Fills use `brush`.
    pub argb: Argb,
    pub brush: Brush,
    /// Global opacity in `[0, 1]`.
    pub opacity: f32,
    /// Maps device space to painter space.
    pub world_transform: TransAffine,
    /// Resampling kernel for transformed image brushes.
    pub image_transform_type: ImageTransformType,
    pub filling_rule: FillingRule,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::Normal,
            argb: Argb::BLACK,
            brush: Brush::from_color(Argb::BLACK),
            opacity: 1.0,
            world_transform: TransAffine::new(),
            image_transform_type: ImageTransformType::Bilinear,
            filling_rule: FillingRule::NonZero,
        }
    }
}

impl PaintState {
    /// Set both the pen color and a solid brush of that color.
    pub fn set_color(&mut self, argb: Argb) {
        self.argb = argb;
        self.brush = Brush::from_color(argb);
    }

    /// Device to painter space mapping, or `SingularTransform`.
    pub fn shape_transform(&self) -> Result<TransAffine> {
        self.world_transform
            .inverted()
            .ok_or(FillError::SingularTransform)
    }
}

// ============================================================================
// Fill strategy selection
// ============================================================================

/// Pick the filler for `brush` under `state`.
///
/// | brush | transform (brush to device) | filler |
/// |---|---|---|
/// | color | any | `Solid` |
/// | image | whole-pixel translation | `DirectImage` |
/// | image | otherwise | image sampler through the inverse transform |
/// | gradient | similar | gradient in device space, no transform |
/// | gradient | otherwise | gradient in brush space through the inverse |
///
/// Surface brushes yield [`FillError::UnsupportedBrush`].
pub fn select_filler(brush: &Brush, state: &PaintState) -> Result<Filler> {
    let shape = state.shape_transform()?;
    let fill_shape = brush.transform().then(&shape);
    let spread = brush.spread_type();

    let filler = match brush.kind() {
        BrushKind::Color(argb) => Filler::Solid(*argb),
        BrushKind::Image(image) => {
            if image.is_null() {
                return Err(FillError::EmptySource);
            }
            let inverse = inverse_of(&fill_shape)?;
            match fill_shape
                .integer_translation()
                .and_then(|_| inverse.integer_translation())
            {
                Some(offset) => Filler::DirectImage {
                    image: image.clone(),
                    offset,
                    spread,
                },
                None => {
                    let mut sampler = ImageSampler::new(image.clone(), state.image_transform_type);
                    sampler.set_spread_type(spread);
                    Filler::Generated {
                        generator: Generator::Image(sampler),
                        transform: Some(inverse),
                    }
                }
            }
        }
        BrushKind::LinearGradient { cache, info, .. } => {
            let (function, transform) = if fill_shape.is_similar() {
                let start = fill_shape.transform(info.start);
                let end = fill_shape.transform(info.end);
                (GradientLinear::new(start, end), None)
            } else {
                (
                    GradientLinear::new(info.start, info.end),
                    Some(inverse_of(&fill_shape)?),
                )
            };
            let generator = Generator::Linear(SpanGradient::new(function, cache.clone()));
            gradient_filler(generator, spread, transform)
        }
        BrushKind::RadialGradient { cache, info, .. } => {
            let similar = fill_shape.is_similar();
            let transform = if similar {
                None
            } else {
                Some(inverse_of(&fill_shape)?)
            };
            let (center, radius, focal) = if similar {
                (
                    fill_shape.transform(info.center),
                    info.radius * fill_shape.sx.abs(),
                    fill_shape.transform(info.focal),
                )
            } else {
                (info.center, info.radius, info.focal)
            };
            let generator = if info.is_focal() {
                Generator::Focal(SpanGradient::new(
                    GradientRadialFocus::new(center, radius, focal),
                    cache.clone(),
                ))
            } else {
                Generator::Radial(SpanGradient::new(
                    GradientRadial::new(center, radius),
                    cache.clone(),
                ))
            };
            gradient_filler(generator, spread, transform)
        }
        BrushKind::Surface(_) => {
            return Err(FillError::UnsupportedBrush {
                kind: brush.kind().name(),
            })
        }
    };
    log::trace!("{} brush filled by {} filler", brush.kind().name(), filler.name());
    Ok(filler)
}

fn inverse_of(m: &TransAffine) -> Result<TransAffine> {
    m.inverted().ok_or(FillError::SingularTransform)
}

fn gradient_filler(
    mut generator: Generator,
    spread: SpreadType,
    transform: Option<TransAffine>,
) -> Filler {
    generator.set_spread_type(spread);
    Filler::Generated {
        generator,
        transform,
    }
}

// ============================================================================
// ImagePaintEngine
// ============================================================================

/// Paint engine drawing into an owned [`Image`].
///
/// The rasterizer and scanline buffers are reused between draw calls; the
/// filler is built per call and dropped when the call returns.
#[derive(Debug, Clone, Default)]
pub struct ImagePaintEngine {
    image: Image,
    state: PaintState,
    ras: RasterizerScanlineAa,
    sl: ScanlineU8,
}

impl ImagePaintEngine {
    pub fn new(image: Image) -> Self {
        Self {
            image,
            state: PaintState::default(),
            ras: RasterizerScanlineAa::new(),
            sl: ScanlineU8::new(),
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    pub fn state(&self) -> &PaintState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PaintState {
        &mut self.state
    }

    pub fn set_state(&mut self, state: PaintState) {
        self.state = state;
    }

    /// Fill `path` with the current brush.
    ///
    /// Returns the number of destination pixels touched. On `Err` the
    /// image is left untouched.
    pub fn fill_path(&mut self, path: &Path) -> Result<usize> {
        let filler = select_filler(&self.state.brush, &self.state)?;
        let shape = self.state.shape_transform()?;
        if path.is_empty() {
            return Ok(0);
        }
        let rect = self.image.rect();
        let Some(dst) = self.image.bitmap_mut() else {
            return Ok(0);
        };

        let device_path = path.transformed(&shape);
        let mut vs = PathVertexStream::new(&device_path);
        self.ras.reset();
        self.ras.clip_box(&rect);
        self.ras.filling_rule(self.state.filling_rule);
        self.ras.add_path(&mut vs);

        let mut filler = filler;
        Ok(render_scanlines(
            &mut self.ras,
            &mut self.sl,
            dst,
            &mut filler,
            &self.state.blend_mode,
            self.state.opacity,
        ))
    }

    /// Fill `path`, silently skipping draw calls that cannot be filled.
    pub fn draw_path(&mut self, path: &Path) {
        if let Err(e) = self.fill_path(path) {
            log::debug!("draw_path aborted: {e}");
        }
    }

    /// Fill the ellipse centered at `center` with radii `rx` and `ry`.
    pub fn draw_ellipse(&mut self, center: Vec2D, rx: f64, ry: f64) {
        let mut path = Path::new();
        path.add_ellipse(center, rx, ry);
        self.draw_path(&path);
    }

    /// Blend `image` with its top-left corner at device pixel `point`.
    ///
    /// Untransformed and unfiltered: only the current blend mode and
    /// opacity apply. Pixels outside the target are skipped.
    pub fn draw_image(&mut self, point: PointI, image: &Image) -> Result<()> {
        let src = image.bitmap().ok_or(FillError::EmptySource)?;
        let Some(dst) = self.image.bitmap_mut() else {
            return Ok(());
        };
        if paste_image(dst, src, point, &self.state.blend_mode, self.state.opacity).is_none() {
            log::trace!("draw_image at {point:?} misses the target");
        }
        Ok(())
    }
}
