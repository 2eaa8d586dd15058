//! Scanline compositor.
//!
//! Drives the rasterizer → scanline → filler → blend pipeline. For every
//! coverage span the filler produces the span's colors, and the blend
//! operator combines them with the destination row, each source pixel
//! weighted by `coverage / 255 × opacity`.
//!
//! Image paste takes the same per-row blend path without a rasterizer,
//! restricted to the destination ∩ source rectangle.

use crate::basics::{CoverType, PointI, RectI, COVER_FULL};
use crate::color::Argb;
use crate::comp_op::BlendOp;
use crate::rasterizer_scanline_aa::{RasterizerScanlineAa, Scanline};
use crate::rendering_buffer::Bitmap;
use crate::scanline_u::ScanlineU8;

// ============================================================================
// SpanGenerator trait
// ============================================================================

/// Producers of per-pixel colors for horizontal spans.
///
/// The compositor calls `prepare` once per draw call and then `generate`
/// once per coverage span.
pub trait SpanGenerator {
    type Color;

    /// Called once before rendering begins.
    fn prepare(&mut self);

    /// Fill `span[0..len]` with colors for pixels starting at `(x, y)`.
    fn generate(&mut self, span: &mut [Self::Color], x: i32, y: i32, len: u32);
}

// ============================================================================
// render_scanlines
// ============================================================================

/// Render everything accumulated in `ras` into `dst`.
///
/// Returns the number of pixels touched (pixels with non-zero coverage).
pub fn render_scanlines<SG, B>(
    ras: &mut RasterizerScanlineAa,
    sl: &mut ScanlineU8,
    dst: &mut Bitmap<Argb>,
    span_gen: &mut SG,
    op: &B,
    opacity: f32,
) -> usize
where
    SG: SpanGenerator<Color = Argb>,
    B: BlendOp + ?Sized,
{
    if !ras.rewind_scanlines() {
        return 0;
    }
    let (w, h) = (dst.width() as i32, dst.height() as i32);

    sl.reset(ras.min_x(), ras.max_x());
    span_gen.prepare();
    let mut colors: Vec<Argb> = Vec::new();
    let mut touched = 0;
    while ras.sweep_scanline(sl) {
        let y = sl.y();
        if y < 0 || y >= h {
            continue;
        }
        let row = dst.row_mut(y as u32);
        for span in sl.spans() {
            let x1 = span.x.max(0);
            let x2 = span.x_end().min(w);
            if x1 >= x2 {
                continue;
            }
            let len = (x2 - x1) as usize;
            let covers = &sl.span_covers(span)[(x1 - span.x) as usize..];
            colors.clear();
            colors.resize(len, Argb::TRANSPARENT);
            span_gen.generate(&mut colors, x1, y, len as u32);
            blend_span(op, &mut row[x1 as usize..x2 as usize], &colors, covers, opacity);
            touched += len;
        }
    }
    touched
}

// ============================================================================
// blend_span
// ============================================================================

/// Blend `src` into `dst` with per-pixel coverage and a global opacity.
///
/// Runs of equal coverage are handed to the blend operator in one call.
/// Fully covered runs at opacity `1.0` use the unweighted `blend`.
pub fn blend_span<B: BlendOp + ?Sized>(
    op: &B,
    dst: &mut [Argb],
    src: &[Argb],
    covers: &[CoverType],
    opacity: f32,
) {
    let n = dst.len().min(src.len()).min(covers.len());
    let mut i = 0;
    while i < n {
        let cover = covers[i];
        let mut j = i + 1;
        while j < n && covers[j] == cover {
            j += 1;
        }
        if cover == COVER_FULL && opacity >= 1.0 {
            op.blend(&mut dst[i..j], &src[i..j]);
        } else if cover != 0 {
            let weight = cover as f32 / 255.0 * opacity;
            op.blend_with_opacity(&mut dst[i..j], &src[i..j], weight);
        }
        i = j;
    }
}

// ============================================================================
// paste_image
// ============================================================================

/// Blend `src` into `dst` with its top-left corner at `point`.
///
/// Only the intersection of both rectangles is touched. Returns that
/// intersection, or `None` if it is empty.
pub fn paste_image<B: BlendOp + ?Sized>(
    dst: &mut Bitmap<Argb>,
    src: &Bitmap<Argb>,
    point: PointI,
    op: &B,
    opacity: f32,
) -> Option<RectI> {
    let src_rect = RectI::from_origin_size(point, src.width() as i32, src.height() as i32);
    let r = dst.rect().intersect(&src_rect);
    if !r.is_valid() {
        return None;
    }
    let sx = (r.x1 - point.x) as usize;
    let len = r.width() as usize;
    let dx = r.x1 as usize;
    for y in r.y1..=r.y2 {
        let src_row = &src.row((y - point.y) as u32)[sx..sx + len];
        let dst_row = &mut dst.row_mut(y as u32)[dx..dx + len];
        if opacity >= 1.0 {
            op.blend(dst_row, src_row);
        } else {
            op.blend_with_opacity(dst_row, src_row, opacity);
        }
    }
    Some(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comp_op::BlendMode;
    use crate::span_generator::Filler;
    use crate::vec2::Vec2D;

    const RED: Argb = Argb::new(1.0, 1.0, 0.0, 0.0);
    const BLUE: Argb = Argb::new(1.0, 0.0, 0.0, 1.0);

    fn triangle(ras: &mut RasterizerScanlineAa) {
        ras.move_to(Vec2D::new(20.0, 20.0));
        ras.line_to(Vec2D::new(80.0, 20.0));
        ras.line_to(Vec2D::new(50.0, 80.0));
    }

    #[test]
    fn test_render_triangle_solid_red() {
        let mut dst: Bitmap<Argb> = Bitmap::new(100, 100);
        dst.fill(Argb::WHITE);
        let mut ras = RasterizerScanlineAa::new();
        let mut sl = ScanlineU8::new();
        triangle(&mut ras);

        let n = render_scanlines(
            &mut ras,
            &mut sl,
            &mut dst,
            &mut Filler::Solid(RED),
            &BlendMode::Normal,
            1.0,
        );
        assert!(n > 0);
        assert_eq!(dst.pixel(50, 40), Some(RED));
        assert_eq!(dst.pixel(0, 0), Some(Argb::WHITE));

        // Anti-aliased edge: partly red, partly white.
        let edge = dst.pixel(35, 50).unwrap();
        assert!(edge.r > 0.99 && edge.g > 0.0 && edge.g < 1.0, "{edge:?}");
    }

    #[test]
    fn test_render_clips_to_destination() {
        let mut dst: Bitmap<Argb> = Bitmap::new(10, 10);
        let mut ras = RasterizerScanlineAa::new();
        let mut sl = ScanlineU8::new();
        ras.move_to(Vec2D::new(-50.0, -50.0));
        ras.line_to(Vec2D::new(50.0, -50.0));
        ras.line_to(Vec2D::new(50.0, 50.0));
        ras.line_to(Vec2D::new(-50.0, 50.0));
        let n = render_scanlines(
            &mut ras,
            &mut sl,
            &mut dst,
            &mut Filler::Solid(BLUE),
            &BlendMode::Normal,
            1.0,
        );
        assert_eq!(n, 100);
        assert!(dst.data().iter().all(|c| *c == BLUE));
    }

    #[test]
    fn test_render_empty() {
        let mut dst: Bitmap<Argb> = Bitmap::new(4, 4);
        let mut ras = RasterizerScanlineAa::new();
        let mut sl = ScanlineU8::new();
        let n = render_scanlines(
            &mut ras,
            &mut sl,
            &mut dst,
            &mut Filler::Solid(RED),
            &BlendMode::Normal,
            1.0,
        );
        assert_eq!(n, 0);
        assert!(dst.data().iter().all(|c| *c == Argb::TRANSPARENT));
    }

    #[test]
    fn test_blend_span_weights() {
        let mut dst = [Argb::TRANSPARENT; 4];
        let src = [RED; 4];
        blend_span(&BlendMode::Normal, &mut dst, &src, &[255, 255, 0, 51], 0.5);
        assert_eq!(dst[0], RED * 0.5);
        assert_eq!(dst[2], Argb::TRANSPARENT);
        assert!((dst[3].a - 0.1).abs() < 1e-6, "{:?}", dst[3]);
    }

    #[test]
    fn test_blend_span_full_coverage_is_idempotent() {
        let mut dst = [Argb::TRANSPARENT; 3];
        blend_span(&BlendMode::Normal, &mut dst, &[BLUE; 3], &[255; 3], 1.0);
        assert_eq!(dst, [BLUE; 3]);
    }

    #[test]
    fn test_paste_image_intersection() {
        let mut dst: Bitmap<Argb> = Bitmap::new(4, 4);
        let mut src: Bitmap<Argb> = Bitmap::new(3, 3);
        src.fill(RED);
        let r = paste_image(&mut dst, &src, PointI::new(2, -1), &BlendMode::Normal, 1.0);
        assert_eq!(r, Some(RectI::new(2, 0, 3, 1)));
        assert_eq!(dst.pixel(2, 0), Some(RED));
        assert_eq!(dst.pixel(3, 1), Some(RED));
        assert_eq!(dst.pixel(1, 0), Some(Argb::TRANSPARENT));
        assert_eq!(dst.pixel(2, 2), Some(Argb::TRANSPARENT));
    }

    #[test]
    fn test_paste_image_with_opacity() {
        let mut dst: Bitmap<Argb> = Bitmap::new(2, 1);
        let mut src: Bitmap<Argb> = Bitmap::new(2, 1);
        src.fill(RED);
        paste_image(&mut dst, &src, PointI::new(0, 0), &BlendMode::Normal, 0.25);
        assert_eq!(dst.pixel(0, 0), Some(RED * 0.25));
    }

    #[test]
    fn test_paste_image_disjoint() {
        let mut dst: Bitmap<Argb> = Bitmap::new(2, 2);
        let src: Bitmap<Argb> = Bitmap::new(2, 2);
        assert_eq!(
            paste_image(&mut dst, &src, PointI::new(5, 5), &BlendMode::Normal, 1.0),
            None
        );
    }
}
