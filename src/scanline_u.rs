//! Unpacked coverage scanline (ScanlineU8).
//!
//! Stores one coverage byte per pixel in a flat array, with
//! [`CoverageSpan`]s referencing into it. The rasterizer fills one of these
//! per row and the compositor consumes it exactly once.

use crate::basics::CoverType;
use crate::rasterizer_scanline_aa::Scanline;

// ============================================================================
// CoverageSpan
// ============================================================================

/// A horizontal run of pixels within a scanline.
///
/// `len` is always positive; `cover_offset` indexes into
/// [`ScanlineU8::covers`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageSpan {
    pub x: i32,
    pub len: i32,
    pub cover_offset: usize,
}

impl CoverageSpan {
    /// One past the last pixel of the span.
    #[inline]
    pub fn x_end(&self) -> i32 {
        self.x + self.len
    }
}

// ============================================================================
// ScanlineU8
// ============================================================================

/// Unpacked scanline container with per-pixel `u8` coverage.
///
/// Usage protocol:
/// 1. `reset(min_x, max_x)` sizes the coverage array for the row range
/// 2. `add_cell()` / `add_span()` accumulate coverage, `x` increasing
/// 3. `finalize(y)` sets the row
/// 4. `spans()` and `span_covers()` are read by the compositor
/// 5. `reset_spans()` prepares the next row
#[derive(Debug, Clone)]
pub struct ScanlineU8 {
    min_x: i32,
    last_x: i32,
    y_val: i32,
    covers: Vec<CoverType>,
    spans: Vec<CoverageSpan>,
}

const NO_LAST_X: i32 = 0x7FFF_FFF0;

impl ScanlineU8 {
    pub fn new() -> Self {
        Self {
            min_x: 0,
            last_x: NO_LAST_X,
            y_val: 0,
            covers: Vec::new(),
            spans: Vec::new(),
        }
    }

    /// Prepare for a new sweep covering columns `min_x..=max_x`.
    pub fn reset(&mut self, min_x: i32, max_x: i32) {
        let max_len = (max_x as i64 - min_x as i64 + 2).max(0) as usize;
        if max_len > self.covers.len() {
            self.covers.resize(max_len, 0);
        }
        self.last_x = NO_LAST_X;
        self.min_x = min_x;
        self.spans.clear();
    }

    /// Active spans of the current row, in increasing `x`.
    pub fn spans(&self) -> &[CoverageSpan] {
        &self.spans
    }

    /// The full coverage array; spans reference into it via `cover_offset`.
    pub fn covers(&self) -> &[CoverType] {
        &self.covers
    }

    /// Coverage values of one span.
    pub fn span_covers(&self, span: &CoverageSpan) -> &[CoverType] {
        let end = (span.cover_offset + span.len as usize).min(self.covers.len());
        &self.covers[span.cover_offset.min(end)..end]
    }

    fn push(&mut self, x: i32, xi: usize, len: i32) {
        match self.spans.last_mut() {
            Some(span) if xi as i32 == self.last_x + 1 => span.len += len,
            _ => self.spans.push(CoverageSpan {
                x,
                len,
                cover_offset: xi,
            }),
        }
        self.last_x = xi as i32 + len - 1;
    }
}

impl Scanline for ScanlineU8 {
    fn reset_spans(&mut self) {
        self.last_x = NO_LAST_X;
        self.spans.clear();
    }

    fn add_cell(&mut self, x: i32, cover: CoverType) {
        let xi = (x - self.min_x) as usize;
        let Some(c) = self.covers.get_mut(xi) else {
            return;
        };
        *c = cover;
        self.push(x, xi, 1);
    }

    fn add_span(&mut self, x: i32, len: u32, cover: CoverType) {
        let xi = (x - self.min_x) as usize;
        let end = (xi + len as usize).min(self.covers.len());
        if xi >= end {
            return;
        }
        self.covers[xi..end].fill(cover);
        self.push(x, xi, (end - xi) as i32);
    }

    fn finalize(&mut self, y: i32) {
        self.y_val = y;
    }

    fn num_spans(&self) -> u32 {
        self.spans.len() as u32
    }

    fn y(&self) -> i32 {
        self.y_val
    }
}

impl Default for ScanlineU8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let sl = ScanlineU8::new();
        assert_eq!(sl.num_spans(), 0);
        assert_eq!(sl.y(), 0);
    }

    #[test]
    fn test_reset_and_add_cell() {
        let mut sl = ScanlineU8::new();
        sl.reset(0, 100);
        sl.add_cell(10, 128);
        assert_eq!(sl.num_spans(), 1);
        let span = sl.spans()[0];
        assert_eq!(span.x, 10);
        assert_eq!(span.len, 1);
        assert_eq!(sl.span_covers(&span), &[128]);
    }

    #[test]
    fn test_adjacent_cells_merge() {
        let mut sl = ScanlineU8::new();
        sl.reset(0, 100);
        sl.add_cell(10, 100);
        sl.add_cell(11, 200);
        sl.add_cell(12, 150);
        assert_eq!(sl.num_spans(), 1);
        let span = sl.spans()[0];
        assert_eq!(span.x, 10);
        assert_eq!(span.x_end(), 13);
        assert_eq!(sl.span_covers(&span), &[100, 200, 150]);
    }

    #[test]
    fn test_non_adjacent_cells_separate_spans() {
        let mut sl = ScanlineU8::new();
        sl.reset(0, 100);
        sl.add_cell(10, 100);
        sl.add_cell(20, 200);
        assert_eq!(sl.num_spans(), 2);
        assert_eq!(sl.spans()[0].x, 10);
        assert_eq!(sl.spans()[1].x, 20);
    }

    #[test]
    fn test_span_then_adjacent_cell() {
        let mut sl = ScanlineU8::new();
        sl.reset(0, 100);
        sl.add_span(5, 3, 200);
        sl.add_cell(8, 100);
        assert_eq!(sl.num_spans(), 1);
        let span = sl.spans()[0];
        assert_eq!(span.len, 4);
        assert_eq!(sl.span_covers(&span), &[200, 200, 200, 100]);
    }

    #[test]
    fn test_with_min_x_offset() {
        let mut sl = ScanlineU8::new();
        sl.reset(50, 150);
        sl.add_cell(60, 128);
        sl.add_cell(61, 64);
        let span = sl.spans()[0];
        assert_eq!(span.x, 60);
        assert_eq!(span.cover_offset, 10);
        assert_eq!(sl.span_covers(&span), &[128, 64]);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut sl = ScanlineU8::new();
        sl.reset(0, 3);
        sl.add_span(2, 10, 255);
        assert_eq!(sl.spans()[0].len, 3);
        sl.add_cell(40, 255);
        assert_eq!(sl.num_spans(), 1);
    }

    #[test]
    fn test_reset_spans_and_finalize() {
        let mut sl = ScanlineU8::new();
        sl.reset(0, 100);
        sl.add_cell(10, 128);
        sl.finalize(42);
        assert_eq!(sl.y(), 42);
        sl.reset_spans();
        assert_eq!(sl.num_spans(), 0);
    }
}
