//! Path storage: the command container fed to the rendering pipeline.
//!
//! A `Path` is an ordered list of move/line/cubic/close commands, the shape
//! of a painter path. Curves stay unflattened here; flattening happens
//! lazily in [`crate::conv_curve::PathVertexStream`].

use crate::trans_affine::TransAffine;
use crate::vec2::Vec2D;

/// Control-point distance for approximating a quarter circle with a cubic.
pub const ELLIPSE_KAPPA: f64 = 0.5522847498;

/// A single path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2D),
    LineTo(Vec2D),
    /// Cubic Bezier from the current point: two control points and the end.
    CurveTo(Vec2D, Vec2D, Vec2D),
    /// Close the current sub-path back to its starting point.
    Close,
}

/// An ordered sequence of path commands with sub-path tracking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
    start: Vec2D,
    current: Option<Vec2D>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all commands (keeps allocated memory).
    pub fn clear(&mut self) {
        self.commands.clear();
        self.start = Vec2D::ZERO;
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// The end point of the last command, if any.
    pub fn current_point(&self) -> Option<Vec2D> {
        self.current
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    /// Begin a new sub-path at `p`.
    pub fn move_to(&mut self, p: Vec2D) {
        self.commands.push(PathCommand::MoveTo(p));
        self.start = p;
        self.current = Some(p);
    }

    /// Straight segment to `p`. Starts a sub-path at the origin if there is
    /// no current point.
    pub fn line_to(&mut self, p: Vec2D) {
        self.ensure_current();
        self.commands.push(PathCommand::LineTo(p));
        self.current = Some(p);
    }

    /// Cubic Bezier segment from the current point.
    pub fn curve_to(&mut self, c1: Vec2D, c2: Vec2D, to: Vec2D) {
        self.ensure_current();
        self.commands.push(PathCommand::CurveTo(c1, c2, to));
        self.current = Some(to);
    }

    /// Quadratic Bezier segment, stored as the equivalent cubic.
    pub fn quad_to(&mut self, c: Vec2D, to: Vec2D) {
        let from = self.ensure_current();
        let c1 = from + (c - from) * (2.0 / 3.0);
        let c2 = to + (c - to) * (2.0 / 3.0);
        self.curve_to(c1, c2, to);
    }

    /// Close the current sub-path. Does nothing on an empty path.
    pub fn close(&mut self) {
        if self.current.is_none() {
            return;
        }
        if !matches!(self.commands.last(), Some(PathCommand::Close)) {
            self.commands.push(PathCommand::Close);
        }
        self.current = Some(self.start);
    }

    fn ensure_current(&mut self) -> Vec2D {
        match self.current {
            Some(p) => p,
            None => {
                self.move_to(Vec2D::ZERO);
                Vec2D::ZERO
            }
        }
    }

    // ---------------------------------------------------------------
    // Shapes
    // ---------------------------------------------------------------

    /// Closed polygon through `points`. Fewer than two points add nothing.
    pub fn add_polygon(&mut self, points: &[Vec2D]) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        self.close();
    }

    /// Closed axis-aligned rectangle.
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.add_polygon(&[
            Vec2D::new(x, y),
            Vec2D::new(x + w, y),
            Vec2D::new(x + w, y + h),
            Vec2D::new(x, y + h),
        ]);
    }

    /// Closed ellipse made of four cubic arcs, starting at the rightmost
    /// point and running clockwise in y-down coordinates.
    pub fn add_ellipse(&mut self, center: Vec2D, rx: f64, ry: f64) {
        let kx = rx * ELLIPSE_KAPPA;
        let ky = ry * ELLIPSE_KAPPA;
        let (cx, cy) = (center.x, center.y);

        self.move_to(Vec2D::new(cx + rx, cy));
        self.curve_to(
            Vec2D::new(cx + rx, cy + ky),
            Vec2D::new(cx + kx, cy + ry),
            Vec2D::new(cx, cy + ry),
        );
        self.curve_to(
            Vec2D::new(cx - kx, cy + ry),
            Vec2D::new(cx - rx, cy + ky),
            Vec2D::new(cx - rx, cy),
        );
        self.curve_to(
            Vec2D::new(cx - rx, cy - ky),
            Vec2D::new(cx - kx, cy - ry),
            Vec2D::new(cx, cy - ry),
        );
        self.curve_to(
            Vec2D::new(cx + kx, cy - ry),
            Vec2D::new(cx + rx, cy - ky),
            Vec2D::new(cx + rx, cy),
        );
        self.close();
    }

    // ---------------------------------------------------------------
    // Transformation
    // ---------------------------------------------------------------

    /// Map every point through `mtx` in place.
    pub fn transform(&mut self, mtx: &TransAffine) {
        for cmd in &mut self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p = mtx.transform(*p),
                PathCommand::CurveTo(c1, c2, to) => {
                    *c1 = mtx.transform(*c1);
                    *c2 = mtx.transform(*c2);
                    *to = mtx.transform(*to);
                }
                PathCommand::Close => {}
            }
        }
        self.start = mtx.transform(self.start);
        self.current = self.current.map(|p| mtx.transform(p));
    }

    /// A copy of this path mapped through `mtx`.
    pub fn transformed(&self, mtx: &TransAffine) -> Path {
        let mut p = self.clone();
        p.transform(mtx);
        p
    }
}
