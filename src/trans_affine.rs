//! Affine transformation matrix.
//!
//! 2D affine transforms used for world/brush transforms: composition,
//! inversion, point mapping, and the classification tests the fill
//! strategy selector relies on (identity, integer translation, "similar").

use crate::basics::PointI;
use crate::vec2::Vec2D;

/// Epsilon for affine matrix comparisons.
pub const AFFINE_EPSILON: f64 = 1e-14;

#[inline]
fn is_equal_eps(v1: f64, v2: f64, epsilon: f64) -> bool {
    (v1 - v2).abs() <= epsilon
}

/// 2D affine transformation matrix.
///
/// Stores six components: `[sx, shy, shx, sy, tx, ty]` representing the
/// matrix:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
///
/// Composition follows row-vector order: `a.multiply(&b)` yields the
/// transform that applies `a` first and then `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub const fn new() -> Self {
        Self {
            sx: 1.0,
            shy: 0.0,
            shx: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Custom matrix from six components.
    pub const fn new_custom(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Rotation matrix, angle in radians.
    pub fn new_rotation(a: f64) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    pub const fn new_scaling(x: f64, y: f64) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    pub const fn new_scaling_uniform(s: f64) -> Self {
        Self::new_scaling(s, s)
    }

    pub const fn new_translation(x: f64, y: f64) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    // ====================================================================
    // Operations (mutate self)
    // ====================================================================

    /// Translate after the current transform.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.tx += x;
        self.ty += y;
        self
    }

    /// Rotate by angle `a` (radians) after the current transform.
    pub fn rotate(&mut self, a: f64) -> &mut Self {
        let (sa, ca) = a.sin_cos();
        let t0 = self.sx * ca - self.shy * sa;
        let t2 = self.shx * ca - self.sy * sa;
        let t4 = self.tx * ca - self.ty * sa;
        self.shy = self.sx * sa + self.shy * ca;
        self.sy = self.shx * sa + self.sy * ca;
        self.ty = self.tx * sa + self.ty * ca;
        self.sx = t0;
        self.shx = t2;
        self.tx = t4;
        self
    }

    /// Non-uniform scale after the current transform.
    pub fn scale(&mut self, x: f64, y: f64) -> &mut Self {
        self.sx *= x;
        self.shx *= x;
        self.tx *= x;
        self.shy *= y;
        self.sy *= y;
        self.ty *= y;
        self
    }

    /// Post-multiply: `self` then `m`.
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        let t0 = self.sx * m.sx + self.shy * m.shx;
        let t2 = self.shx * m.sx + self.sy * m.shx;
        let t4 = self.tx * m.sx + self.ty * m.shx + m.tx;
        self.shy = self.sx * m.shy + self.shy * m.sy;
        self.sy = self.shx * m.shy + self.sy * m.sy;
        self.ty = self.tx * m.shy + self.ty * m.sy + m.ty;
        self.sx = t0;
        self.shx = t2;
        self.tx = t4;
        self
    }

    /// Pre-multiply: `m` then `self`.
    pub fn premultiply(&mut self, m: &TransAffine) -> &mut Self {
        let mut t = *m;
        t.multiply(self);
        *self = t;
        self
    }

    /// Returns `a` followed by `b` as a new matrix.
    pub fn then(&self, b: &TransAffine) -> TransAffine {
        let mut t = *self;
        t.multiply(b);
        t
    }

    /// The inverse matrix, or `None` if the matrix is singular or
    /// non-finite.
    pub fn inverted(&self) -> Option<TransAffine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let d = 1.0 / det;
        let sx = self.sy * d;
        let sy = self.sx * d;
        let shy = -self.shy * d;
        let shx = -self.shx * d;
        let tx = -self.tx * sx - self.ty * shx;
        let ty = -self.tx * shy - self.ty * sy;
        Some(Self::new_custom(sx, shy, shx, sy, tx, ty))
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    /// Forward transform of a point.
    #[inline]
    pub fn transform(&self, p: Vec2D) -> Vec2D {
        Vec2D::new(
            p.x * self.sx + p.y * self.shx + self.tx,
            p.x * self.shy + p.y * self.sy + self.ty,
        )
    }

    /// Forward transform without translation, for direction vectors.
    #[inline]
    pub fn transform_2x2(&self, v: Vec2D) -> Vec2D {
        Vec2D::new(v.x * self.sx + v.y * self.shx, v.x * self.shy + v.y * self.sy)
    }

    // ====================================================================
    // Auxiliary
    // ====================================================================

    /// Determinant of the 2x2 portion.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Average scale factor (useful for approximation_scale on curves).
    pub fn get_scale(&self) -> f64 {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let x = s * self.sx + s * self.shx;
        let y = s * self.shy + s * self.sy;
        (x * x + y * y).sqrt()
    }

    pub fn translation(&self) -> Vec2D {
        Vec2D::new(self.tx, self.ty)
    }

    /// Check if this is an identity matrix.
    pub fn is_identity(&self, epsilon: f64) -> bool {
        is_equal_eps(self.sx, 1.0, epsilon)
            && is_equal_eps(self.shy, 0.0, epsilon)
            && is_equal_eps(self.shx, 0.0, epsilon)
            && is_equal_eps(self.sy, 1.0, epsilon)
            && is_equal_eps(self.tx, 0.0, epsilon)
            && is_equal_eps(self.ty, 0.0, epsilon)
    }

    /// The integer offset if this is a pure translation by whole pixels.
    ///
    /// Comparison is exact: a scale of `1.0000001` or an offset of `0.5`
    /// yields `None`.
    pub fn integer_translation(&self) -> Option<PointI> {
        if self.sx != 1.0 || self.shy != 0.0 || self.shx != 0.0 || self.sy != 1.0 {
            return None;
        }
        let x = self.tx.trunc();
        let y = self.ty.trunc();
        if x != self.tx || y != self.ty {
            return None;
        }
        if x.abs() > i32::MAX as f64 || y.abs() > i32::MAX as f64 {
            return None;
        }
        Some(PointI::new(x as i32, y as i32))
    }

    /// Identity, or no shear with equal horizontal and vertical scale.
    ///
    /// A rotation is similarity-preserving too but is not detected here;
    /// rotated transforms take the general inverse-transform path.
    pub fn is_similar(&self) -> bool {
        self.is_identity(0.0) || (self.shy == 0.0 && self.shx == 0.0 && self.sx == self.sy)
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}
