//! Anti-aliasing polygon scanline rasterizer.
//!
//! Accepts contours from a [`VertexSource`] (move-to / line-to / stop),
//! accumulates signed area and cover per pixel cell, and sweeps the cells
//! row by row into a [`Scanline`] with 8-bit coverage.
//!
//! Each edge is split at every pixel boundary it crosses. For a piece
//! inside cell `(x, y)` entering at fractional column `fx0` and leaving at
//! `fx1` with signed height `dy`, the cell gains `cover += dy` and
//! `area += (fx0 + fx1) * dy`. Sweeping a row left to right with the running
//! cover `c`, the pixel under a cell gets winding `c - area / 2` and the
//! pixels between cells get `c`.

use crate::basics::{CoverType, FillingRule, PathCmd, RectI, VertexSource};
use crate::vec2::Vec2D;

// ============================================================================
// Scanline trait
// ============================================================================

/// Scanline containers that accumulate coverage data from a sweep.
pub trait Scanline {
    /// Prepare for a new scanline, clearing all span data.
    fn reset_spans(&mut self);

    /// Add a single cell at position `x` with coverage `cover`.
    fn add_cell(&mut self, x: i32, cover: CoverType);

    /// Add a horizontal span of `len` pixels starting at `x`, all with `cover`.
    fn add_span(&mut self, x: i32, len: u32, cover: CoverType);

    /// Finalize the scanline at the given Y coordinate.
    fn finalize(&mut self, y: i32);

    /// Number of spans in this scanline (0 means empty).
    fn num_spans(&self) -> u32;

    /// The Y coordinate of this scanline.
    fn y(&self) -> i32;
}

// ============================================================================
// Cells
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Cell {
    x: i32,
    y: i32,
    cover: f64,
    area: f64,
}

/// Clip rectangle in continuous coordinates, `x1 <= x < x2`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClipBox {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    MoveTo,
    LineTo,
    Closed,
}

// ============================================================================
// RasterizerScanlineAa
// ============================================================================

/// Polygon rasterizer with anti-aliased output.
///
/// Usage:
/// 1. Optionally set `filling_rule()` and `clip_box()`
/// 2. Define contours with `move_to()` / `line_to()` or `add_path()`
/// 3. Call `rewind_scanlines()` then repeatedly `sweep_scanline()`
///
/// Contours are closed implicitly on the next `move_to` and before the
/// sweep.
#[derive(Debug, Clone)]
pub struct RasterizerScanlineAa {
    cells: Vec<Cell>,
    sorted: bool,
    cursor: usize,
    filling_rule: FillingRule,
    clip: Option<ClipBox>,
    start: Vec2D,
    current: Vec2D,
    status: Status,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl RasterizerScanlineAa {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            sorted: false,
            cursor: 0,
            filling_rule: FillingRule::NonZero,
            clip: None,
            start: Vec2D::ZERO,
            current: Vec2D::ZERO,
            status: Status::Initial,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        }
    }

    /// Reset the rasterizer, discarding all polygon data.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.sorted = false;
        self.cursor = 0;
        self.status = Status::Initial;
        self.min_x = i32::MAX;
        self.min_y = i32::MAX;
        self.max_x = i32::MIN;
        self.max_y = i32::MIN;
    }

    /// Set the filling rule (non-zero winding or even-odd).
    pub fn filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }

    pub fn get_filling_rule(&self) -> FillingRule {
        self.filling_rule
    }

    /// Restrict output to the pixels of `rect` (inclusive corners).
    pub fn clip_box(&mut self, rect: &RectI) {
        self.reset();
        self.clip = Some(ClipBox {
            x1: rect.x1 as f64,
            y1: rect.y1 as f64,
            x2: rect.x2 as f64 + 1.0,
            y2: rect.y2 as f64 + 1.0,
        });
    }

    /// Disable clipping.
    pub fn reset_clipping(&mut self) {
        self.reset();
        self.clip = None;
    }

    // ========================================================================
    // Path building
    // ========================================================================

    /// Close the current contour back to its start point.
    pub fn close_polygon(&mut self) {
        if self.status == Status::LineTo {
            self.line(self.current, self.start);
            self.status = Status::Closed;
        }
    }

    pub fn move_to(&mut self, p: Vec2D) {
        if self.sorted {
            self.reset();
        }
        self.close_polygon();
        self.start = p;
        self.current = p;
        self.status = Status::MoveTo;
    }

    pub fn line_to(&mut self, p: Vec2D) {
        if self.status == Status::Initial {
            self.move_to(p);
            return;
        }
        self.line(self.current, p);
        self.current = p;
        self.status = Status::LineTo;
    }

    /// Add all vertices from a vertex source, dropping non-finite ones.
    pub fn add_path<VS: VertexSource + ?Sized>(&mut self, vs: &mut VS) {
        vs.rewind();
        if self.sorted {
            self.reset();
        }
        let mut dropped = 0usize;
        loop {
            let v = vs.vertex();
            if v.is_stop() {
                break;
            }
            if !v.point.is_finite() {
                dropped += 1;
                continue;
            }
            match v.cmd {
                PathCmd::MoveTo => self.move_to(v.point),
                PathCmd::LineTo => self.line_to(v.point),
                PathCmd::Stop => break,
            }
        }
        if dropped > 0 {
            log::warn!("dropped {dropped} non-finite vertices while rasterizing path");
        }
    }

    // ========================================================================
    // Edge accumulation
    // ========================================================================

    fn line(&mut self, p0: Vec2D, p1: Vec2D) {
        match self.clip {
            None => self.render_line(p0, p1),
            Some(c) => self.clip_line(c, p0, p1),
        }
    }

    /// Drop the parts of an edge above or below the clip box, then split
    /// at the vertical clip edges and clamp the outside pieces onto them.
    /// A piece clamped to `x1` still carries its cover into the visible row.
    fn clip_line(&mut self, c: ClipBox, p0: Vec2D, p1: Vec2D) {
        let dy = p1.y - p0.y;
        if dy == 0.0 {
            return;
        }
        if (p0.y <= c.y1 && p1.y <= c.y1) || (p0.y >= c.y2 && p1.y >= c.y2) {
            return;
        }
        let x_at = |y: f64| p0.x + (y - p0.y) * (p1.x - p0.x) / dy;
        let clamp_y = |p: Vec2D| {
            if p.y < c.y1 {
                Vec2D::new(x_at(c.y1), c.y1)
            } else if p.y > c.y2 {
                Vec2D::new(x_at(c.y2), c.y2)
            } else {
                p
            }
        };
        let a = clamp_y(p0);
        let b = clamp_y(p1);

        let dx = b.x - a.x;
        let mut splits = [f64::NAN; 2];
        if dx != 0.0 {
            for (slot, edge) in splits.iter_mut().zip([c.x1, c.x2]) {
                let t = (edge - a.x) / dx;
                if t > 0.0 && t < 1.0 {
                    *slot = t;
                }
            }
        }
        if splits[0] > splits[1] {
            splits.swap(0, 1);
        }

        let clamp_x = |p: Vec2D| Vec2D::new(p.x.clamp(c.x1, c.x2), p.y);
        let mut from = a;
        for t in splits.into_iter().filter(|t| !t.is_nan()) {
            let to = a + (b - a) * t;
            self.render_line(clamp_x(from), clamp_x(to));
            from = to;
        }
        self.render_line(clamp_x(from), clamp_x(b));
    }

    /// Walk an edge row by row.
    fn render_line(&mut self, p0: Vec2D, p1: Vec2D) {
        let (y0, y1) = (p0.y, p1.y);
        if y0 == y1 {
            return;
        }
        let dxdy = (p1.x - p0.x) / (y1 - y0);
        let down = y1 > y0;
        let mut row = if down { y0.floor() } else { y0.ceil() - 1.0 };
        let mut x = p0.x;
        let mut y = y0;
        loop {
            let y_next = if down { (row + 1.0).min(y1) } else { row.max(y1) };
            let done = y_next == y1;
            let x_next = if done { p1.x } else { p0.x + (y_next - y0) * dxdy };
            self.render_row(row as i32, x, y, x_next, y_next);
            if done {
                break;
            }
            x = x_next;
            y = y_next;
            row += if down { 1.0 } else { -1.0 };
        }
    }

    /// Walk a piece of an edge that stays within one row, cell by cell.
    fn render_row(&mut self, row: i32, xa: f64, ya: f64, xb: f64, yb: f64) {
        let right = xb >= xa;
        let mut ix = if right { xa.floor() } else { xa.ceil() - 1.0 };
        let mut x = xa;
        let mut y = ya;
        loop {
            let x_end = if right { xb.min(ix + 1.0) } else { xb.max(ix) };
            let done = x_end == xb;
            let y_end = if done {
                yb
            } else {
                ya + (x_end - xa) * (yb - ya) / (xb - xa)
            };
            self.add_piece(ix as i32, row, x - ix, x_end - ix, y_end - y);
            if done {
                break;
            }
            x = x_end;
            y = y_end;
            ix += if right { 1.0 } else { -1.0 };
        }
    }

    #[inline]
    fn add_piece(&mut self, x: i32, y: i32, fx0: f64, fx1: f64, dy: f64) {
        if dy == 0.0 {
            return;
        }
        let area = (fx0 + fx1) * dy;
        match self.cells.last_mut() {
            Some(cell) if cell.x == x && cell.y == y => {
                cell.cover += dy;
                cell.area += area;
            }
            _ => self.cells.push(Cell {
                x,
                y,
                cover: dy,
                area,
            }),
        }
    }

    // ========================================================================
    // Bounding box
    // ========================================================================

    pub fn min_x(&self) -> i32 {
        self.min_x
    }
    pub fn min_y(&self) -> i32 {
        self.min_y
    }
    pub fn max_x(&self) -> i32 {
        self.max_x
    }
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    // ========================================================================
    // Scanline sweeping
    // ========================================================================

    fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.cells.sort_unstable_by_key(|c| (c.y, c.x));
        self.cells.dedup_by(|next, kept| {
            if next.x == kept.x && next.y == kept.y {
                kept.cover += next.cover;
                kept.area += next.area;
                true
            } else {
                false
            }
        });
        self.sorted = true;

        let (mut min_x, mut max_x) = (i32::MAX, i32::MIN);
        for c in &self.cells {
            min_x = min_x.min(c.x);
            max_x = max_x.max(c.x);
        }
        let mut min_y = self.cells.first().map_or(i32::MAX, |c| c.y);
        let mut max_y = self.cells.last().map_or(i32::MIN, |c| c.y);
        if let Some(c) = self.clip {
            min_x = min_x.max(c.x1.floor() as i32);
            max_x = max_x.min(c.x2.ceil() as i32 - 1);
            min_y = min_y.max(c.y1.floor() as i32);
            max_y = max_y.min(c.y2.ceil() as i32 - 1);
        }
        self.min_x = min_x;
        self.max_x = max_x;
        self.min_y = min_y;
        self.max_y = max_y;
    }

    /// Close open contours, sort cells and prepare for sweeping.
    /// Returns `false` if there is nothing to render.
    pub fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.sort_cells();
        self.cursor = 0;
        !self.cells.is_empty() && self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Coverage for a signed winding value.
    #[inline]
    pub fn calculate_alpha(&self, winding: f64) -> CoverType {
        let mut a = winding.abs();
        if self.filling_rule == FillingRule::EvenOdd {
            a %= 2.0;
            if a > 1.0 {
                a = 2.0 - a;
            }
        }
        (a.min(1.0) * 255.0 + 0.5) as CoverType
    }

    /// Extract the next non-empty row of coverage into `sl`.
    ///
    /// Returns `false` when all rows have been consumed.
    pub fn sweep_scanline<SL: Scanline>(&mut self, sl: &mut SL) -> bool {
        let n = self.cells.len();
        while self.cursor < n {
            let y = self.cells[self.cursor].y;
            sl.reset_spans();
            let mut cover = 0.0;
            let mut i = self.cursor;
            while i < n && self.cells[i].y == y {
                let cell = self.cells[i];
                i += 1;
                cover += cell.cover;

                let span_start = if cell.area != 0.0 {
                    if cell.x >= self.min_x && cell.x <= self.max_x {
                        let alpha = self.calculate_alpha(cover - cell.area * 0.5);
                        if alpha != 0 {
                            sl.add_cell(cell.x, alpha);
                        }
                    }
                    cell.x + 1
                } else {
                    cell.x
                };
                let span_end = if i < n && self.cells[i].y == y {
                    self.cells[i].x
                } else {
                    span_start
                };
                let s = span_start.max(self.min_x);
                let e = span_end.min(self.max_x.saturating_add(1));
                if e > s {
                    let alpha = self.calculate_alpha(cover);
                    if alpha != 0 {
                        sl.add_span(s, (e - s) as u32, alpha);
                    }
                }
            }
            self.cursor = i;
            if sl.num_spans() > 0 {
                sl.finalize(y);
                return true;
            }
        }
        false
    }
}

impl Default for RasterizerScanlineAa {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::Vertex;

    /// Scanline sink that records the coverage of a single column.
    struct ColumnSink {
        x: i32,
        hit: CoverType,
        y: i32,
    }

    impl Scanline for ColumnSink {
        fn reset_spans(&mut self) {
            self.hit = 0;
        }
        fn add_cell(&mut self, x: i32, cover: CoverType) {
            if x == self.x {
                self.hit = cover;
            }
        }
        fn add_span(&mut self, x: i32, len: u32, cover: CoverType) {
            if self.x >= x && (self.x as i64) < x as i64 + len as i64 {
                self.hit = cover;
            }
        }
        fn finalize(&mut self, y: i32) {
            self.y = y;
        }
        fn num_spans(&self) -> u32 {
            1
        }
        fn y(&self) -> i32 {
            self.y
        }
    }

    /// Coverage of pixel `(x, y)` for the accumulated polygon.
    fn coverage_at(ras: &mut RasterizerScanlineAa, x: i32, y: i32) -> CoverType {
        if !ras.rewind_scanlines() {
            return 0;
        }
        let mut sink = ColumnSink { x, hit: 0, y: 0 };
        while ras.sweep_scanline(&mut sink) {
            if sink.y >= y {
                break;
            }
        }
        if sink.y == y {
            sink.hit
        } else {
            0
        }
    }

    /// Collects `(y, x, cover)` triples.
    #[derive(Default)]
    struct TestScanline {
        spans: Vec<(i32, u32, CoverType)>,
        y_val: i32,
    }

    impl Scanline for TestScanline {
        fn reset_spans(&mut self) {
            self.spans.clear();
        }
        fn add_cell(&mut self, x: i32, cover: CoverType) {
            self.spans.push((x, 1, cover));
        }
        fn add_span(&mut self, x: i32, len: u32, cover: CoverType) {
            self.spans.push((x, len, cover));
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

    fn v(x: f64, y: f64) -> Vec2D {
        Vec2D::new(x, y)
    }

    fn polygon(ras: &mut RasterizerScanlineAa, pts: &[(f64, f64)]) {
        ras.move_to(v(pts[0].0, pts[0].1));
        for &(x, y) in &pts[1..] {
            ras.line_to(v(x, y));
        }
        ras.close_polygon();
    }

    /// Sweep everything into a `w x h` coverage grid.
    fn coverage_grid(ras: &mut RasterizerScanlineAa, w: usize, h: usize) -> Vec<Vec<u8>> {
        let mut grid = vec![vec![0u8; w]; h];
        if !ras.rewind_scanlines() {
            return grid;
        }
        let mut sl = TestScanline::default();
        while ras.sweep_scanline(&mut sl) {
            for &(x, len, cover) in &sl.spans {
                for i in 0..len as i32 {
                    let px = (x + i) as usize;
                    if px < w && (sl.y() as usize) < h {
                        grid[sl.y() as usize][px] = cover;
                    }
                }
            }
        }
        grid
    }

    #[test]
    fn test_new_rasterizer() {
        let mut ras = RasterizerScanlineAa::new();
        assert_eq!(ras.min_x(), i32::MAX);
        assert_eq!(ras.get_filling_rule(), FillingRule::NonZero);
        assert!(!ras.rewind_scanlines());
    }

    #[test]
    fn test_calculate_alpha() {
        let mut ras = RasterizerScanlineAa::new();
        assert_eq!(ras.calculate_alpha(1.0), 255);
        assert_eq!(ras.calculate_alpha(-1.0), 255);
        assert_eq!(ras.calculate_alpha(0.5), 128);
        assert_eq!(ras.calculate_alpha(2.0), 255);
        ras.filling_rule(FillingRule::EvenOdd);
        assert_eq!(ras.calculate_alpha(2.0), 0);
        assert_eq!(ras.calculate_alpha(1.5), 128);
    }

    #[test]
    fn test_unit_square_covers_one_pixel() {
        let mut ras = RasterizerScanlineAa::new();
        polygon(&mut ras, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let grid = coverage_grid(&mut ras, 2, 2);
        assert_eq!(grid, vec![vec![255, 0], vec![0, 0]]);
    }

    #[test]
    fn test_rect_interior_and_edges() {
        let mut ras = RasterizerScanlineAa::new();
        polygon(&mut ras, &[(1.5, 1.0), (4.5, 1.0), (4.5, 3.0), (1.5, 3.0)]);
        let grid = coverage_grid(&mut ras, 6, 4);
        assert_eq!(grid[1], vec![0, 128, 255, 255, 128, 0]);
        assert_eq!(grid[2], grid[1]);
        assert_eq!(grid[0], vec![0; 6]);
        assert_eq!(grid[3], vec![0; 6]);
    }

    #[test]
    fn test_triangle_diagonal_half_cover() {
        let mut ras = RasterizerScanlineAa::new();
        // Lower-left half of the pixel at (0, 0).
        polygon(&mut ras, &[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let grid = coverage_grid(&mut ras, 1, 1);
        assert_eq!(grid[0][0], 128);
    }

    #[test]
    fn test_orientation_does_not_matter() {
        let mut cw = RasterizerScanlineAa::new();
        polygon(&mut cw, &[(0.5, 0.5), (3.2, 0.7), (2.0, 3.9)]);
        let mut ccw = RasterizerScanlineAa::new();
        polygon(&mut ccw, &[(0.5, 0.5), (2.0, 3.9), (3.2, 0.7)]);
        let a = coverage_grid(&mut cw, 4, 4);
        let b = coverage_grid(&mut ccw, 4, 4);
        for (ra, rb) in a.iter().zip(&b) {
            for (ca, cb) in ra.iter().zip(rb) {
                assert!((*ca as i32 - *cb as i32).abs() <= 1, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_nonzero_vs_even_odd_overlap() {
        let square = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        let mut ras = RasterizerScanlineAa::new();
        polygon(&mut ras, &square);
        polygon(&mut ras, &square);
        assert_eq!(coverage_grid(&mut ras, 2, 2)[0][0], 255);

        let mut ras = RasterizerScanlineAa::new();
        ras.filling_rule(FillingRule::EvenOdd);
        polygon(&mut ras, &square);
        polygon(&mut ras, &square);
        assert_eq!(coverage_grid(&mut ras, 2, 2)[0][0], 0);
    }

    #[test]
    fn test_clip_box_keeps_cover_from_the_left() {
        let mut ras = RasterizerScanlineAa::new();
        ras.clip_box(&RectI::new(0, 0, 3, 3));
        polygon(&mut ras, &[(-10.0, -5.0), (2.0, -5.0), (2.0, 10.0), (-10.0, 10.0)]);
        assert!(ras.rewind_scanlines());
        assert_eq!(ras.min_x(), 0);
        assert_eq!(ras.max_y(), 3);
        let grid = coverage_grid(&mut ras, 4, 4);
        for row in grid {
            assert_eq!(row, vec![255, 255, 0, 0]);
        }
    }

    #[test]
    fn test_clip_box_sloped_edge() {
        let mut clipped = RasterizerScanlineAa::new();
        clipped.clip_box(&RectI::new(0, 0, 3, 3));
        let tri = [(-4.0, 0.0), (4.0, 0.0), (-4.0, 4.0)];
        polygon(&mut clipped, &tri);
        let mut free = RasterizerScanlineAa::new();
        polygon(&mut free, &tri);
        assert_eq!(coverage_grid(&mut clipped, 4, 4), coverage_grid(&mut free, 4, 4));
    }

    #[test]
    fn test_add_path_drops_non_finite() {
        struct Src {
            i: usize,
            pts: Vec<Vertex>,
        }
        impl VertexSource for Src {
            fn rewind(&mut self) {
                self.i = 0;
            }
            fn vertex(&mut self) -> Vertex {
                let v = self.pts.get(self.i).copied().unwrap_or(Vertex::STOP);
                self.i += 1;
                v
            }
        }
        let mut src = Src {
            i: 0,
            pts: vec![
                Vertex::move_to(v(0.0, 0.0)),
                Vertex::line_to(v(1.0, 0.0)),
                Vertex::line_to(v(f64::NAN, 5.0)),
                Vertex::line_to(v(1.0, 1.0)),
                Vertex::line_to(v(0.0, 1.0)),
            ],
        };
        let mut ras = RasterizerScanlineAa::new();
        ras.add_path(&mut src);
        assert_eq!(coverage_grid(&mut ras, 2, 2), vec![vec![255, 0], vec![0, 0]]);
    }

    #[test]
    fn test_coverage_at() {
        let mut ras = RasterizerScanlineAa::new();
        polygon(&mut ras, &[(10.0, 10.0), (30.0, 10.0), (20.0, 30.0)]);
        assert_eq!(coverage_at(&mut ras, 20, 15), 255);
        assert_eq!(coverage_at(&mut ras, 0, 0), 0);
        assert_eq!(coverage_at(&mut ras, 100, 100), 0);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ras = RasterizerScanlineAa::new();
        polygon(&mut ras, &[(10.0, 10.0), (20.0, 10.0), (15.0, 20.0)]);
        ras.reset();
        assert!(!ras.rewind_scanlines());
    }
}
