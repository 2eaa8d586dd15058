//! Rendering buffer: row-oriented pixel storage.
//!
//! [`Bitmap`] is a fixed-stride, row-addressable buffer of pixels. [`Image`]
//! wraps a `Bitmap<Argb>` in a reference-counted copy-on-write handle so
//! images can be passed around by value (inside brushes, for example)
//! without copying pixels until one side writes.

use std::sync::Arc;

use crate::basics::{PointI, RectI};
use crate::color::Argb;

// ============================================================================
// Bitmap
// ============================================================================

/// Owned row-major pixel buffer with stride equal to the width.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy + Default> Bitmap<T> {
    /// Allocate a `width x height` bitmap filled with `T::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width as usize * height as usize],
        }
    }
}

impl<T: Copy> Bitmap<T> {
    /// Wrap existing row-major pixel data. Returns `None` if the length does
    /// not match the size.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rectangle covering the whole bitmap, with its origin at `(0, 0)`.
    pub fn rect(&self) -> RectI {
        RectI::from_origin_size(PointI::new(0, 0), self.width as i32, self.height as i32)
    }

    /// Read-only pixel row.
    ///
    /// # Panics
    /// If `y` is out of bounds.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Mutable pixel row.
    ///
    /// # Panics
    /// If `y` is out of bounds.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        let start = y as usize * self.width as usize;
        &mut self.data[start..start + self.width as usize]
    }

    /// Pixel at `(x, y)`, or `None` when outside the bitmap.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<T> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Pixel at in-bounds coordinates. Callers wrap indices first.
    #[inline]
    pub(crate) fn pixel_unchecked(&self, x: usize, y: usize) -> T {
        self.data[y * self.width as usize + x]
    }

    pub fn fill(&mut self, c: T) {
        self.data.fill(c);
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}

// ============================================================================
// Image
// ============================================================================

/// Shared copy-on-write ARGB image.
///
/// Cloning is cheap: both clones point at the same pixels until one of them
/// is mutated. An image with an empty size is "null" and holds no storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    data: Option<Arc<Bitmap<Argb>>>,
}

impl Image {
    /// A transparent `width x height` image; null if either side is zero.
    pub fn new(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        Self {
            data: Some(Arc::new(Bitmap::new(width, height))),
        }
    }

    pub fn from_bitmap(bitmap: Bitmap<Argb>) -> Self {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Self::default();
        }
        Self {
            data: Some(Arc::new(bitmap)),
        }
    }

    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    pub fn width(&self) -> u32 {
        self.data.as_ref().map_or(0, |b| b.width())
    }

    pub fn height(&self) -> u32 {
        self.data.as_ref().map_or(0, |b| b.height())
    }

    pub fn rect(&self) -> RectI {
        RectI::from_origin_size(PointI::new(0, 0), self.width() as i32, self.height() as i32)
    }

    pub fn bitmap(&self) -> Option<&Bitmap<Argb>> {
        self.data.as_deref()
    }

    /// Mutable access to the pixels, detaching from other clones first.
    pub fn bitmap_mut(&mut self) -> Option<&mut Bitmap<Argb>> {
        self.data.as_mut().map(Arc::make_mut)
    }

    /// `true` if both handles share the same pixel storage.
    pub fn shares_data_with(&self, other: &Image) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Pixel at `(x, y)`; transparent outside the image.
    pub fn pixel(&self, x: i32, y: i32) -> Argb {
        self.bitmap()
            .and_then(|b| b.pixel(x, y))
            .unwrap_or(Argb::TRANSPARENT)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, c: Argb) {
        if let Some(b) = self.bitmap_mut() {
            if b.rect().contains(PointI::new(x, y)) {
                b.row_mut(y as u32)[x as usize] = c;
            }
        }
    }

    pub fn fill(&mut self, c: Argb) {
        if let Some(b) = self.bitmap_mut() {
            b.fill(c);
        }
    }

    /// Fill with transparent pixels.
    pub fn clear(&mut self) {
        self.fill(Argb::TRANSPARENT);
    }

    /// `true` if every pixel is fully transparent (or the image is null).
    pub fn is_blank(&self) -> bool {
        self.bitmap()
            .map_or(true, |b| b.data().iter().all(|c| c.a == 0.0))
    }

    /// Copy `src` into this image with its top-left corner at `point`,
    /// replacing pixels over the intersection of both rectangles.
    pub fn paste(&mut self, src: &Image, point: PointI) {
        let Some(sb) = src.bitmap() else {
            return;
        };
        let r = self
            .rect()
            .intersect(&RectI::from_origin_size(point, sb.width() as i32, sb.height() as i32));
        if !r.is_valid() {
            return;
        }
        let Some(db) = self.bitmap_mut() else {
            return;
        };
        let sx = (r.x1 - point.x) as usize;
        let len = r.width() as usize;
        for y in r.y1..=r.y2 {
            let src_row = &sb.row((y - point.y) as u32)[sx..sx + len];
            db.row_mut(y as u32)[r.x1 as usize..r.x1 as usize + len].copy_from_slice(src_row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_rows() {
        let mut b: Bitmap<u8> = Bitmap::new(3, 2);
        b.row_mut(1)[2] = 7;
        assert_eq!(b.row(1), &[0, 0, 7]);
        assert_eq!(b.pixel(2, 1), Some(7));
        assert_eq!(b.pixel(3, 1), None);
        assert_eq!(b.pixel(-1, 0), None);
    }

    #[test]
    fn test_bitmap_from_vec_size_mismatch() {
        assert!(Bitmap::from_vec(2, 2, vec![0u8; 3]).is_none());
        assert!(Bitmap::from_vec(2, 2, vec![0u8; 4]).is_some());
    }

    #[test]
    fn test_null_image() {
        let img = Image::new(0, 5);
        assert!(img.is_null());
        assert_eq!(img.width(), 0);
        assert!(img.is_blank());
        assert_eq!(img.pixel(0, 0), Argb::TRANSPARENT);
    }

    #[test]
    fn test_copy_on_write() {
        let mut a = Image::new(2, 2);
        let b = a.clone();
        assert!(a.shares_data_with(&b));

        a.set_pixel(0, 0, Argb::WHITE);
        assert!(!a.shares_data_with(&b));
        assert_eq!(a.pixel(0, 0), Argb::WHITE);
        assert_eq!(b.pixel(0, 0), Argb::TRANSPARENT);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut img = Image::new(3, 3);
        assert!(img.is_blank());
        img.fill(Argb::BLACK);
        assert!(!img.is_blank());
        assert_eq!(img.pixel(2, 2), Argb::BLACK);
        img.clear();
        assert!(img.is_blank());
    }

    #[test]
    fn test_paste_clips_to_intersection() {
        let mut dst = Image::new(4, 4);
        let mut src = Image::new(3, 3);
        src.fill(Argb::WHITE);
        dst.paste(&src, PointI::new(2, -1));

        assert_eq!(dst.pixel(2, 0), Argb::WHITE);
        assert_eq!(dst.pixel(3, 1), Argb::WHITE);
        assert_eq!(dst.pixel(1, 0), Argb::TRANSPARENT);
        assert_eq!(dst.pixel(2, 2), Argb::TRANSPARENT);
    }

    #[test]
    fn test_paste_disjoint_is_noop() {
        let mut dst = Image::new(2, 2);
        let mut src = Image::new(2, 2);
        src.fill(Argb::WHITE);
        dst.paste(&src, PointI::new(5, 5));
        assert!(dst.is_blank());
    }
}
