//! Foundation types, constants, and the vertex source contract.
//!
//! Everything else in the crate depends on these: coverage constants,
//! integer points and rectangles, path commands, and the pull-based
//! `VertexSource` interface the rasterizer consumes.

use crate::vec2::Vec2D;

pub const PI: f64 = std::f64::consts::PI;

// ============================================================================
// Cover (anti-aliasing) constants
// ============================================================================

/// The type used for anti-aliasing coverage values.
pub type CoverType = u8;

pub const COVER_FULL: CoverType = 255;

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillingRule {
    #[default]
    NonZero,
    EvenOdd,
}

// ============================================================================
// Point and Rect
// ============================================================================

/// A 2D point with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointI {
    pub x: i32,
    pub y: i32,
}

impl PointI {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl core::ops::Sub for PointI {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An integer rectangle with inclusive corners `(x1, y1)` and `(x2, y2)`.
///
/// Matches the inclusive convention of a `QRect`: a rectangle at `(0, 0)`
/// with size `4 x 4` spans `x1 = 0 ..= x2 = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectI {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RectI {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle with its top-left corner at `origin` and the given size.
    ///
    /// Far corners past `i32::MAX` are clamped, so a rectangle near the
    /// coordinate limit is truncated rather than wrapped.
    pub fn from_origin_size(origin: PointI, width: i32, height: i32) -> Self {
        let far = |o: i32, len: i32| {
            (o as i64 + len as i64 - 1).clamp(i32::MIN as i64, i32::MAX as i64) as i32
        };
        Self::new(origin.x, origin.y, far(origin.x, width), far(origin.y, height))
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    /// Returns `true` if the rectangle is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Intersection of two rectangles; may be invalid if they do not overlap.
    pub fn intersect(&self, r: &Self) -> Self {
        Self {
            x1: self.x1.max(r.x1),
            y1: self.y1.max(r.y1),
            x2: self.x2.min(r.x2),
            y2: self.y2.min(r.y2),
        }
    }

    pub fn contains(&self, p: PointI) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }
}

// ============================================================================
// Path commands
// ============================================================================

/// Command of a flattened vertex stream.
///
/// Curves never reach the rasterizer: they are replaced by runs of
/// `LineTo` before leaving the path vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCmd {
    Stop,
    MoveTo,
    LineTo,
}

/// A vertex with coordinates and a path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub cmd: PathCmd,
    pub point: Vec2D,
}

impl Vertex {
    pub const STOP: Self = Self {
        cmd: PathCmd::Stop,
        point: Vec2D::ZERO,
    };

    pub fn move_to(point: Vec2D) -> Self {
        Self {
            cmd: PathCmd::MoveTo,
            point,
        }
    }

    pub fn line_to(point: Vec2D) -> Self {
        Self {
            cmd: PathCmd::LineTo,
            point,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.cmd == PathCmd::Stop
    }
}

// ============================================================================
// VertexSource trait
// ============================================================================

/// Pull-based vertex producer consumed by the rasterizer.
///
/// A source yields `MoveTo`/`LineTo` vertices and then `Stop` forever.
/// `rewind` restarts the sequence from the beginning, so a rasterizer can
/// take several passes over the same geometry.
pub trait VertexSource {
    /// Reset the source to its first vertex.
    fn rewind(&mut self);

    /// Return the next vertex, or a `Stop` vertex once exhausted.
    fn vertex(&mut self) -> Vertex;
}

/// Blanket implementation so pipeline stages can borrow their source.
impl<T: VertexSource + ?Sized> VertexSource for &mut T {
    fn rewind(&mut self) {
        (**self).rewind();
    }

    fn vertex(&mut self) -> Vertex {
        (**self).vertex()
    }
}

// ============================================================================
// Tests
// ============================================================================
