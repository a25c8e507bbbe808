//! Pixel-space primitives shared by the marker locator, the route scorer and
//! the label renderer.

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate. May lie outside the image it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = (i64::from(other.x) - i64::from(self.x)) as f64;
        let dy = (i64::from(other.y) - i64::from(self.y)) as f64;
        dx.hypot(dy)
    }

    /// Shifted point, saturating at the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Linear interpolation towards `other`, rounded to the nearest pixel.
    pub fn lerp_rounded(self, other: Point, t: f64) -> (f64, f64) {
        let (x, y) = self.lerp(other, t);
        (x.round(), y.round())
    }

    pub fn lerp(self, other: Point, t: f64) -> (f64, f64) {
        let (x0, y0) = (f64::from(self.x), f64::from(self.y));
        (
            x0 + (f64::from(other.x) - x0) * t,
            y0 + (f64::from(other.y) - y0) * t,
        )
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Label rectangle. `right` and `bottom` are `left + width` and `top + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl LabelBox {
    /// Box of `width` x `height` whose center is `center` (rounded down for odd sizes).
    ///
    /// Edges saturate at the `i32` range, so a box near the limits may come
    /// out smaller than asked.
    pub fn centered_on(center: Point, width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let left = center.x.saturating_sub(width / 2);
        let top = center.y.saturating_sub(height / 2);
        Self {
            left,
            top,
            right: left.saturating_add(width),
            bottom: top.saturating_add(height),
        }
    }

    pub fn width(&self) -> u32 {
        span(self.left, self.right)
    }

    pub fn height(&self) -> u32 {
        span(self.top, self.bottom)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn center(&self) -> Point {
        Point::new(
            midpoint(self.left, self.width()),
            midpoint(self.top, self.height()),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.left..self.right).contains(&point.x) && (self.top..self.bottom).contains(&point.y)
    }

    /// Whether any part of the box lies on a `width` x `height` canvas.
    pub fn overlaps_canvas(&self, width: u32, height: u32) -> bool {
        i64::from(self.right) > 0
            && i64::from(self.bottom) > 0
            && i64::from(self.left) < i64::from(width)
            && i64::from(self.top) < i64::from(height)
    }
}

fn span(lo: i32, hi: i32) -> u32 {
    (i64::from(hi) - i64::from(lo)).clamp(0, i64::from(u32::MAX)) as u32
}

fn midpoint(lo: i32, len: u32) -> i32 {
    (i64::from(lo) + i64::from(len / 2)).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Parameter range `[t0, t1]` of the segment `a -> b` lying inside the
/// rectangle `min..=max`, or `None` when the segment misses it.
pub fn clip_segment(a: Point, b: Point, min: (f64, f64), max: (f64, f64)) -> Option<(f64, f64)> {
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (dx, dy) = (f64::from(b.x) - ax, f64::from(b.y) - ay);
    let (mut t0, mut t1) = (0f64, 1f64);
    for (p, q) in [
        (-dx, ax - min.0),
        (dx, max.0 - ax),
        (-dy, ay - min.1),
        (dy, max.1 - ay),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}
