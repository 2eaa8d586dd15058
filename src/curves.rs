//! Adaptive cubic Bezier flattening.
//!
//! Recursive de Casteljau subdivision that stops as soon as a sub-curve is
//! flat enough for the configured approximation scale, optionally also
//! bounding the turning angle between emitted segments and short-cutting
//! sharp cusps.
//!
//! The output polyline always starts at `p1` and ends at `p4`.

use crate::basics::{Vertex, VertexSource, PI};
use crate::vec2::Vec2D;

// ============================================================================
// Constants
// ============================================================================

const CURVE_COLLINEARITY_EPSILON: f64 = 1e-30;
const CURVE_ANGLE_TOLERANCE_EPSILON: f64 = 0.01;
const CURVE_RECURSION_LIMIT: u32 = 32;

/// Ordered point sequence produced by a flatten call.
pub type Polyline = Vec<Vec2D>;

// ============================================================================
// FlattenConfig
// ============================================================================

/// Tolerances for curve flattening.
///
/// The cusp limit is stored as `PI - v` so that zero means "disabled"; the
/// accessors convert back and forth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenConfig {
    approximation_scale: f64,
    angle_tolerance: f64,
    cusp_limit: f64,
}

impl FlattenConfig {
    pub const fn new() -> Self {
        Self {
            approximation_scale: 1.0,
            angle_tolerance: 0.0,
            cusp_limit: 0.0,
        }
    }

    /// Scale between path units and device pixels. Larger values produce
    /// more points. Must be positive.
    pub fn set_approximation_scale(&mut self, s: f64) {
        self.approximation_scale = s;
    }

    pub fn approximation_scale(&self) -> f64 {
        self.approximation_scale
    }

    /// Maximum turning angle in radians between consecutive segments.
    /// Values below `0.01` disable the angle check.
    pub fn set_angle_tolerance(&mut self, a: f64) {
        self.angle_tolerance = a;
    }

    pub fn angle_tolerance(&self) -> f64 {
        self.angle_tolerance
    }

    /// Cusp limit in radians; `0.0` disables cusp detection.
    pub fn set_cusp_limit(&mut self, v: f64) {
        self.cusp_limit = if v == 0.0 { 0.0 } else { PI - v };
    }

    pub fn cusp_limit(&self) -> f64 {
        if self.cusp_limit == 0.0 {
            0.0
        } else {
            PI - self.cusp_limit
        }
    }

    pub fn with_approximation_scale(mut self, s: f64) -> Self {
        self.set_approximation_scale(s);
        self
    }

    pub fn with_angle_tolerance(mut self, a: f64) -> Self {
        self.set_angle_tolerance(a);
        self
    }

    pub fn with_cusp_limit(mut self, v: f64) -> Self {
        self.set_cusp_limit(v);
        self
    }

    /// Squared distance tolerance: `(0.5 / approximation_scale)^2`.
    #[inline]
    pub fn distance_tolerance_square(&self) -> f64 {
        let d = 0.5 / self.approximation_scale;
        d * d
    }
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Curve4Div
// ============================================================================

/// Recursive subdivision cubic Bezier flattener.
///
/// After [`Curve4Div::init`] the flattened points are available through
/// [`Curve4Div::points`] or by pulling them as a [`VertexSource`].
#[derive(Debug, Clone, Default)]
pub struct Curve4Div {
    config: FlattenConfig,
    distance_tolerance_square: f64,
    count: usize,
    points: Polyline,
}

impl Curve4Div {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FlattenConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut FlattenConfig {
        &mut self.config
    }

    pub fn reset(&mut self) {
        self.points.clear();
        self.count = 0;
    }

    /// Flatten the curve `p1, p2, p3, p4`, replacing any previous output.
    pub fn init(&mut self, p1: Vec2D, p2: Vec2D, p3: Vec2D, p4: Vec2D) {
        self.points.clear();
        self.distance_tolerance_square = self.config.distance_tolerance_square();
        self.points.push(p1);
        self.recursive_bezier(p1, p2, p3, p4, 0);
        self.points.push(p4);
        self.count = 0;
        log::trace!("flattened cubic into {} points", self.points.len());
    }

    pub fn points(&self) -> &[Vec2D] {
        &self.points
    }

    pub fn into_points(self) -> Polyline {
        self.points
    }

    fn recursive_bezier(&mut self, p1: Vec2D, p2: Vec2D, p3: Vec2D, p4: Vec2D, level: u32) {
        if level > CURVE_RECURSION_LIMIT {
            return;
        }

        // Calculate all the mid-points of the line segments
        let p12 = p1.midpoint(p2);
        let p23 = p2.midpoint(p3);
        let p34 = p3.midpoint(p4);
        let p123 = p12.midpoint(p23);
        let p234 = p23.midpoint(p34);
        let p1234 = p123.midpoint(p234);

        // Try to approximate the full cubic curve by a single straight line
        let d = p4 - p1;

        let mut d2 = (p2 - p4).cross(d).abs();
        let mut d3 = (p3 - p4).cross(d).abs();

        let case = ((d2 > CURVE_COLLINEARITY_EPSILON) as u32) << 1
            | (d3 > CURVE_COLLINEARITY_EPSILON) as u32;

        match case {
            0 => {
                // All collinear OR p1==p4
                let k = d.sq_length();
                if k == 0.0 {
                    d2 = (p2 - p1).sq_length();
                    d3 = (p3 - p4).sq_length();
                } else {
                    let k = 1.0 / k;
                    let t2 = k * (p2 - p1).dot(d);
                    let t3 = k * (p3 - p1).dot(d);
                    if t2 > 0.0 && t2 < 1.0 && t3 > 0.0 && t3 < 1.0 {
                        // Simple collinear case, 1---2---3---4
                        return;
                    }
                    d2 = sq_distance_to_chord(p2, p1, p4, t2);
                    d3 = sq_distance_to_chord(p3, p1, p4, t3);
                }
                if d2 > d3 {
                    if d2 < self.distance_tolerance_square {
                        self.points.push(p2);
                        return;
                    }
                } else if d3 < self.distance_tolerance_square {
                    self.points.push(p3);
                    return;
                }
            }

            1 => {
                // p1,p2,p4 are collinear, p3 is significant
                if d3 * d3 <= self.distance_tolerance_square * d.sq_length() {
                    if self.config.angle_tolerance < CURVE_ANGLE_TOLERANCE_EPSILON {
                        self.points.push(p23);
                        return;
                    }

                    // Angle Condition
                    let da1 = turn_angle(p3 - p2, p4 - p3);

                    if da1 < self.config.angle_tolerance {
                        self.points.push(p2);
                        self.points.push(p3);
                        return;
                    }

                    if self.config.cusp_limit != 0.0 && da1 > self.config.cusp_limit {
                        self.points.push(p3);
                        return;
                    }
                }
            }

            2 => {
                // p1,p3,p4 are collinear, p2 is significant
                if d2 * d2 <= self.distance_tolerance_square * d.sq_length() {
                    if self.config.angle_tolerance < CURVE_ANGLE_TOLERANCE_EPSILON {
                        self.points.push(p23);
                        return;
                    }

                    // Angle Condition
                    let da1 = turn_angle(p2 - p1, p3 - p2);

                    if da1 < self.config.angle_tolerance {
                        self.points.push(p2);
                        self.points.push(p3);
                        return;
                    }

                    if self.config.cusp_limit != 0.0 && da1 > self.config.cusp_limit {
                        self.points.push(p2);
                        return;
                    }
                }
            }

            _ => {
                // Regular case
                if (d2 + d3) * (d2 + d3) <= self.distance_tolerance_square * d.sq_length() {
                    if self.config.angle_tolerance < CURVE_ANGLE_TOLERANCE_EPSILON {
                        self.points.push(p23);
                        return;
                    }

                    // Angle & Cusp Condition
                    let da1 = turn_angle(p2 - p1, p3 - p2);
                    let da2 = turn_angle(p3 - p2, p4 - p3);

                    if da1 + da2 < self.config.angle_tolerance {
                        self.points.push(p23);
                        return;
                    }

                    if self.config.cusp_limit != 0.0 {
                        if da1 > self.config.cusp_limit {
                            self.points.push(p2);
                            return;
                        }

                        if da2 > self.config.cusp_limit {
                            self.points.push(p3);
                            return;
                        }
                    }
                }
            }
        }

        // Continue subdivision
        self.recursive_bezier(p1, p12, p123, p1234, level + 1);
        self.recursive_bezier(p1234, p234, p34, p4, level + 1);
    }
}

/// Squared distance from `p` to the chord `a -> b`, given `p`'s parametric
/// projection `t` onto it.
#[inline]
fn sq_distance_to_chord(p: Vec2D, a: Vec2D, b: Vec2D, t: f64) -> f64 {
    if t <= 0.0 {
        (p - a).sq_length()
    } else if t >= 1.0 {
        (p - b).sq_length()
    } else {
        (p - (a + (b - a) * t)).sq_length()
    }
}

/// Absolute turning angle from direction `a` to direction `b`, in `[0, PI]`.
#[inline]
fn turn_angle(a: Vec2D, b: Vec2D) -> f64 {
    let mut da = (b.angle() - a.angle()).abs();
    if da >= PI {
        da = 2.0 * PI - da;
    }
    da
}

impl VertexSource for Curve4Div {
    fn rewind(&mut self) {
        self.count = 0;
    }

    fn vertex(&mut self) -> Vertex {
        let Some(&p) = self.points.get(self.count) else {
            return Vertex::STOP;
        };
        self.count += 1;
        if self.count == 1 {
            Vertex::move_to(p)
        } else {
            Vertex::line_to(p)
        }
    }
}

// ============================================================================
// Free function
// ============================================================================

/// Flatten a cubic Bezier into a polyline starting at `p1` and ending at `p4`.
pub fn flatten(p1: Vec2D, p2: Vec2D, p3: Vec2D, p4: Vec2D, config: &FlattenConfig) -> Polyline {
    let mut curve = Curve4Div::with_config(*config);
    curve.init(p1, p2, p3, p4);
    curve.into_points()
}
