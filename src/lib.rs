//! # malachite-raster
//!
//! Vector path rendering core of a 2D painting engine. Given a path of line
//! and cubic Bézier segments and a brush (solid color, image, linear or
//! radial gradient), it produces anti-aliased pixels composited into an
//! ARGB image under a blend mode and opacity.
//!
//! ## Architecture
//!
//! Every draw call runs the same pipeline:
//!
//! 1. **Path Vertex Stream**: flattens curves into move-to/line-to vertices
//! 2. **Rasterizer**: turns the polygon into per-pixel coverage spans
//! 3. **Fill Strategy Selector**: picks a filler for the brush and transform
//! 4. **Fillers & Generators**: produce a color per destination pixel
//! 5. **Scanline Compositor**: blends colors into the destination, weighted
//!    by coverage and opacity
//!
//! [`paint_engine::ImagePaintEngine`] drives the whole pipeline.
//!
//! ```
//! use malachite_raster::{Argb, Image, ImagePaintEngine, Path};
//!
//! let mut engine = ImagePaintEngine::new(Image::new(16, 16));
//! engine.state_mut().set_color(Argb::new(1.0, 1.0, 0.0, 0.0));
//! let mut path = Path::new();
//! path.add_rect(4.0, 4.0, 8.0, 8.0);
//! engine.draw_path(&path);
//! assert!(engine.image().pixel(8, 8).is_opaque());
//! ```

// Foundation types & math
pub mod basics;
pub mod color;
pub mod trans_affine;
pub mod vec2;

// Geometry
pub mod conv_curve;
pub mod curves;
pub mod path_storage;

// Pixel storage
pub mod rendering_buffer;

// Rasterizer
pub mod rasterizer_scanline_aa;
pub mod scanline_u;

// Brushes, fillers & generators
pub mod brush;
pub mod gradient_lut;
pub mod image_accessors;
pub mod image_filters;
pub mod span_generator;
pub mod span_gradient;
pub mod span_image_filter;

// Compositing
pub mod comp_op;
pub mod renderer_scanline;

// Paint engine
pub mod error;
pub mod paint_engine;

pub use basics::{FillingRule, PointI, RectI};
pub use brush::{Brush, BrushKind};
pub use color::Argb;
pub use comp_op::{BlendMode, BlendOp};
pub use curves::{flatten, FlattenConfig, Polyline};
pub use error::{FillError, Result};
pub use gradient_lut::{ColorGradient, SpreadType};
pub use image_filters::ImageTransformType;
pub use paint_engine::{ImagePaintEngine, PaintState};
pub use path_storage::Path;
pub use rendering_buffer::Image;
pub use trans_affine::TransAffine;
pub use vec2::Vec2D;
