//! Image pixel access with spread-mode boundary handling.
//!
//! Every tap a filler or resampling generator reads goes through an
//! [`ImageAccessor`], which maps out-of-bounds coordinates back into the
//! source according to a [`SpreadType`]:
//!
//! - `Pad` clamps to the nearest edge pixel.
//! - `Repeat` tiles the image.
//! - `Reflect` mirrors the image at every edge, repeating the edge pixel.

use crate::color::Argb;
use crate::gradient_lut::SpreadType;
use crate::rendering_buffer::Bitmap;

// ============================================================================
// Index wrapping
// ============================================================================

/// Map coordinate `v` into `0..size` for the given spread. `size` must be
/// non-zero.
#[inline]
pub fn wrap_index(spread: SpreadType, v: i64, size: u32) -> usize {
    let n = size as i64;
    let i = match spread {
        SpreadType::Pad => v.clamp(0, n - 1),
        SpreadType::Repeat => v.rem_euclid(n),
        SpreadType::Reflect => {
            let m = v.rem_euclid(2 * n);
            if m >= n {
                2 * n - 1 - m
            } else {
                m
            }
        }
    };
    i as usize
}

// ============================================================================
// ImageAccessor
// ============================================================================

/// Read-only view of a non-empty bitmap that never fails on coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ImageAccessor<'a> {
    bitmap: &'a Bitmap<Argb>,
    spread: SpreadType,
}

impl<'a> ImageAccessor<'a> {
    /// Returns `None` for an empty bitmap.
    pub fn new(bitmap: &'a Bitmap<Argb>, spread: SpreadType) -> Option<Self> {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return None;
        }
        Some(Self { bitmap, spread })
    }

    pub fn spread(&self) -> SpreadType {
        self.spread
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Pixel at `(x, y)` after wrapping both coordinates.
    #[inline]
    pub fn pixel(&self, x: i64, y: i64) -> Argb {
        let xi = wrap_index(self.spread, x, self.bitmap.width());
        let yi = wrap_index(self.spread, y, self.bitmap.height());
        self.bitmap.pixel_unchecked(xi, yi)
    }

    /// Fill `span` with the pixels of row `y` starting at column `x`.
    pub fn row_span(&self, x: i64, y: i64, span: &mut [Argb]) {
        let yi = wrap_index(self.spread, y, self.bitmap.height());
        let row = self.bitmap.row(yi as u32);
        let w = self.bitmap.width();
        for (i, out) in span.iter_mut().enumerate() {
            *out = row[wrap_index(self.spread, x + i as i64, w)];
        }
    }
}
