//! Path vertex stream.
//!
//! Turns a [`Path`] into the flat `MoveTo`/`LineTo`/`Stop` stream the
//! rasterizer understands, flattening each cubic segment on demand and
//! inlining its interior points as `line_to` vertices.

use crate::basics::{Vertex, VertexSource};
use crate::curves::{Curve4Div, FlattenConfig};
use crate::path_storage::{Path, PathCommand};
use crate::vec2::Vec2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    /// Emitting the cached polyline; `next` indexes the next point to emit.
    EmittingFlattenedCurve { next: usize },
}

// ============================================================================
// PathVertexStream
// ============================================================================

/// Rewindable vertex source over a borrowed path.
///
/// `Close` commands come out as a `LineTo` back to the sub-path start.
pub struct PathVertexStream<'a> {
    path: &'a Path,
    index: usize,
    state: State,
    curve: Curve4Div,
    start: Vec2D,
    last: Vec2D,
}

impl<'a> PathVertexStream<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self::with_config(path, FlattenConfig::default())
    }

    pub fn with_config(path: &'a Path, config: FlattenConfig) -> Self {
        Self {
            path,
            index: 0,
            state: State::Idle,
            curve: Curve4Div::with_config(config),
            start: Vec2D::ZERO,
            last: Vec2D::ZERO,
        }
    }

    pub fn config(&self) -> &FlattenConfig {
        self.curve.config()
    }

    /// Set the approximation scale used for every curve in the path.
    pub fn set_approximation_scale(&mut self, s: f64) {
        self.curve.config_mut().set_approximation_scale(s);
    }

    pub fn set_angle_tolerance(&mut self, a: f64) {
        self.curve.config_mut().set_angle_tolerance(a);
    }

    pub fn set_cusp_limit(&mut self, v: f64) {
        self.curve.config_mut().set_cusp_limit(v);
    }
}

impl VertexSource for PathVertexStream<'_> {
    fn rewind(&mut self) {
        self.index = 0;
        self.state = State::Idle;
        self.curve.reset();
        self.start = Vec2D::ZERO;
        self.last = Vec2D::ZERO;
    }

    fn vertex(&mut self) -> Vertex {
        loop {
            if let State::EmittingFlattenedCurve { next } = self.state {
                // The first polyline point is the anchor, already emitted.
                match self.curve.points().get(next) {
                    Some(&p) => {
                        self.state = State::EmittingFlattenedCurve { next: next + 1 };
                        self.last = p;
                        return Vertex::line_to(p);
                    }
                    None => {
                        self.state = State::Idle;
                        continue;
                    }
                }
            }

            let Some(&cmd) = self.path.commands().get(self.index) else {
                return Vertex::STOP;
            };
            self.index += 1;

            match cmd {
                PathCommand::MoveTo(p) => {
                    self.start = p;
                    self.last = p;
                    return Vertex::move_to(p);
                }
                PathCommand::LineTo(p) => {
                    self.last = p;
                    return Vertex::line_to(p);
                }
                PathCommand::CurveTo(c1, c2, to) => {
                    self.curve.init(self.last, c1, c2, to);
                    self.state = State::EmittingFlattenedCurve { next: 1 };
                }
                PathCommand::Close => {
                    self.last = self.start;
                    return Vertex::line_to(self.start);
                }
            }
        }
    }
}
