//! Brush: what a path is filled with.
//!
//! A [`Brush`] is a cheap-to-clone value type. The fill description lives in
//! a shared [`BrushKind`] together with a spread policy and a brush-space
//! transform; mutating one clone detaches it from the others, so a brush
//! captured earlier never observes later changes.

use std::fmt;
use std::sync::Arc;

use crate::basics::PointI;
use crate::color::Argb;
use crate::gradient_lut::{ColorGradient, GradientCache, SpreadType};
use crate::rendering_buffer::Image;
use crate::trans_affine::TransAffine;
use crate::vec2::Vec2D;

// ============================================================================
// Gradient geometry
// ============================================================================

/// Linear gradient axis in brush space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearGradientInfo {
    pub start: Vec2D,
    pub end: Vec2D,
}

impl LinearGradientInfo {
    pub fn new(start: Vec2D, end: Vec2D) -> Self {
        Self { start, end }
    }
}

/// Radial gradient circle and focal point in brush space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadialGradientInfo {
    pub center: Vec2D,
    pub radius: f64,
    pub focal: Vec2D,
}

impl RadialGradientInfo {
    /// Gradient with its focal point at the center.
    pub fn new(center: Vec2D, radius: f64) -> Self {
        Self {
            center,
            radius,
            focal: center,
        }
    }

    pub fn with_focal(center: Vec2D, radius: f64, focal: Vec2D) -> Self {
        Self {
            center,
            radius,
            focal,
        }
    }

    pub fn is_focal(&self) -> bool {
        self.focal != self.center
    }
}

// ============================================================================
// Tile source
// ============================================================================

/// Source of square image tiles making up an unbounded canvas.
///
/// Surface brushes carry one of these. Filling with a surface brush is not
/// supported by the paint engine; the trait exists so callers can still
/// describe such brushes.
pub trait TileSource: fmt::Debug + Send + Sync {
    /// Edge length of every tile in pixels.
    fn tile_size(&self) -> u32;

    /// The tile at tile coordinates `key`, if present.
    fn tile(&self, key: PointI) -> Option<Image>;
}

// ============================================================================
// Brush
// ============================================================================

/// Fill description held by a brush.
#[derive(Debug, Clone)]
pub enum BrushKind {
    Color(Argb),
    Image(Image),
    LinearGradient {
        gradient: ColorGradient,
        cache: Arc<GradientCache>,
        info: LinearGradientInfo,
    },
    RadialGradient {
        gradient: ColorGradient,
        cache: Arc<GradientCache>,
        info: RadialGradientInfo,
    },
    Surface(Arc<dyn TileSource>),
}

impl BrushKind {
    /// Short lowercase name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            BrushKind::Color(_) => "color",
            BrushKind::Image(_) => "image",
            BrushKind::LinearGradient { .. } => "linear gradient",
            BrushKind::RadialGradient { .. } => "radial gradient",
            BrushKind::Surface(_) => "surface",
        }
    }

    fn default_spread(&self) -> SpreadType {
        match self {
            BrushKind::LinearGradient { .. } | BrushKind::RadialGradient { .. } => SpreadType::Pad,
            BrushKind::Color(_) | BrushKind::Image(_) | BrushKind::Surface(_) => SpreadType::Repeat,
        }
    }
}

#[derive(Debug, Clone)]
struct BrushData {
    kind: BrushKind,
    spread: SpreadType,
    transform: TransAffine,
}

/// Copy-on-write fill description.
#[derive(Debug, Clone)]
pub struct Brush {
    d: Arc<BrushData>,
}

impl Brush {
    fn from_kind(kind: BrushKind) -> Self {
        let spread = kind.default_spread();
        Self {
            d: Arc::new(BrushData {
                kind,
                spread,
                transform: TransAffine::new(),
            }),
        }
    }

    /// Solid brush from a premultiplied color.
    pub fn from_color(argb: Argb) -> Self {
        Self::from_kind(BrushKind::Color(argb))
    }

    pub fn from_image(image: Image) -> Self {
        Self::from_kind(BrushKind::Image(image))
    }

    pub fn from_surface(surface: Arc<dyn TileSource>) -> Self {
        Self::from_kind(BrushKind::Surface(surface))
    }

    pub fn from_linear_gradient(gradient: &ColorGradient, start: Vec2D, end: Vec2D) -> Self {
        Self::from_kind(BrushKind::LinearGradient {
            cache: Arc::new(GradientCache::new(gradient)),
            gradient: gradient.clone(),
            info: LinearGradientInfo::new(start, end),
        })
    }

    /// Radial gradient with the focal point at the center.
    pub fn from_radial_gradient(gradient: &ColorGradient, center: Vec2D, radius: f64) -> Self {
        Self::from_radial_gradient_info(gradient, RadialGradientInfo::new(center, radius))
    }

    pub fn from_focal_gradient(
        gradient: &ColorGradient,
        center: Vec2D,
        radius: f64,
        focal: Vec2D,
    ) -> Self {
        Self::from_radial_gradient_info(gradient, RadialGradientInfo::with_focal(center, radius, focal))
    }

    pub fn from_radial_gradient_info(gradient: &ColorGradient, info: RadialGradientInfo) -> Self {
        Self::from_kind(BrushKind::RadialGradient {
            cache: Arc::new(GradientCache::new(gradient)),
            gradient: gradient.clone(),
            info,
        })
    }

    pub fn kind(&self) -> &BrushKind {
        &self.d.kind
    }

    /// `true` if both handles share the same data.
    pub fn shares_data_with(&self, other: &Brush) -> bool {
        Arc::ptr_eq(&self.d, &other.d)
    }

    // ---------------------------------------------------------------
    // Accessors (neutral values on kind mismatch)
    // ---------------------------------------------------------------

    /// The solid color, or transparent for non-color brushes.
    pub fn argb(&self) -> Argb {
        match self.d.kind {
            BrushKind::Color(c) => c,
            _ => Argb::TRANSPARENT,
        }
    }

    pub fn image(&self) -> Option<&Image> {
        match &self.d.kind {
            BrushKind::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn surface(&self) -> Option<&Arc<dyn TileSource>> {
        match &self.d.kind {
            BrushKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn linear_gradient_info(&self) -> LinearGradientInfo {
        match self.d.kind {
            BrushKind::LinearGradient { info, .. } => info,
            _ => LinearGradientInfo::default(),
        }
    }

    pub fn radial_gradient_info(&self) -> RadialGradientInfo {
        match self.d.kind {
            BrushKind::RadialGradient { info, .. } => info,
            _ => RadialGradientInfo::default(),
        }
    }

    pub fn gradient(&self) -> Option<&ColorGradient> {
        match &self.d.kind {
            BrushKind::LinearGradient { gradient, .. } | BrushKind::RadialGradient { gradient, .. } => {
                Some(gradient)
            }
            _ => None,
        }
    }

    pub fn gradient_cache(&self) -> Option<&Arc<GradientCache>> {
        match &self.d.kind {
            BrushKind::LinearGradient { cache, .. } | BrushKind::RadialGradient { cache, .. } => {
                Some(cache)
            }
            _ => None,
        }
    }

    // ---------------------------------------------------------------
    // Spread and transform
    // ---------------------------------------------------------------

    pub fn spread_type(&self) -> SpreadType {
        self.d.spread
    }

    pub fn set_spread_type(&mut self, spread: SpreadType) {
        Arc::make_mut(&mut self.d).spread = spread;
    }

    pub fn transform(&self) -> TransAffine {
        self.d.transform
    }

    pub fn set_transform(&mut self, transform: TransAffine) {
        Arc::make_mut(&mut self.d).transform = transform;
    }

    /// Translate brush space; applied before the existing transform.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        Arc::make_mut(&mut self.d)
            .transform
            .premultiply(&TransAffine::new_translation(dx, dy));
    }

    /// Scale brush space; applied before the existing transform.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        Arc::make_mut(&mut self.d)
            .transform
            .premultiply(&TransAffine::new_scaling(sx, sy));
    }

    /// Rotate brush space by `angle` radians; applied before the existing
    /// transform.
    pub fn rotate(&mut self, angle: f64) {
        Arc::make_mut(&mut self.d)
            .transform
            .premultiply(&TransAffine::new_rotation(angle));
    }
}

impl From<Argb> for Brush {
    fn from(argb: Argb) -> Self {
        Self::from_color(argb)
    }
}

impl From<Image> for Brush {
    fn from(image: Image) -> Self {
        Self::from_image(image)
    }
}
