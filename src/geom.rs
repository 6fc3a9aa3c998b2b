//! Geometric primitives: points, rectangles, and the handful of exact
//! predicates that the sweep relies on.
//!
//! Integer coordinates are assumed to satisfy `|c| <= MAX_COORD`. Inside that
//! range every coordinate difference fits in an `i64` and every product of two
//! differences fits in an `i128`, which is what makes [`products_are_equal`]
//! (and therefore [`is_collinear`]) exact.

use std::ops::{Add, Neg, Sub};

/// The largest coordinate magnitude the integer engine supports.
///
/// Exceeding it is a precondition violation; results are unspecified.
pub const MAX_COORD: i64 = i64::MAX / 4;

/// Two floating-point values closer than this are considered equal.
pub const FLOATING_POINT_TOLERANCE: f64 = 1e-12;

/// A point with integer coordinates.
///
/// As in most raster conventions, `y` grows downwards: the sweep starts at the
/// largest `y` (the "bottom") and moves towards smaller `y` (the "top").
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point64 {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate, increasing downwards.
    pub y: i64,
}

impl std::fmt::Debug for Point64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::fmt::Display for Point64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{} ", self.x, self.y)
    }
}

impl Point64 {
    /// Create a new point.
    pub const fn new(x: i64, y: i64) -> Self {
        Point64 { x, y }
    }

    /// Create a point from floating-point coordinates, rounding half away from zero.
    pub fn from_f64(x: f64, y: f64) -> Self {
        Point64 {
            x: round_half_away(x),
            y: round_half_away(y),
        }
    }

    /// Create a point from scaled floating-point coordinates.
    pub fn from_scaled(pt: PointD, scale: f64) -> Self {
        Point64::from_f64(pt.x * scale, pt.y * scale)
    }
}

impl Add for Point64 {
    type Output = Point64;

    fn add(self, rhs: Point64) -> Point64 {
        Point64::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point64 {
    type Output = Point64;

    fn sub(self, rhs: Point64) -> Point64 {
        Point64::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point64 {
    type Output = Point64;

    fn neg(self) -> Point64 {
        Point64::new(-self.x, -self.y)
    }
}

impl From<(i64, i64)> for Point64 {
    fn from((x, y): (i64, i64)) -> Self {
        Point64 { x, y }
    }
}

impl From<PointD> for Point64 {
    fn from(pt: PointD) -> Self {
        Point64::from_f64(pt.x, pt.y)
    }
}

/// A point with floating-point coordinates.
///
/// Equality is approximate: two points are equal when both coordinates differ
/// by at most [`FLOATING_POINT_TOLERANCE`].
#[derive(Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct PointD {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, increasing downwards.
    pub y: f64,
}

impl std::fmt::Debug for PointD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl PartialEq for PointD {
    fn eq(&self, other: &Self) -> bool {
        is_almost_zero(self.x - other.x) && is_almost_zero(self.y - other.y)
    }
}

impl PointD {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        PointD { x, y }
    }

    /// Convert an integer point, multiplying both coordinates by `scale`.
    pub fn from_scaled(pt: Point64, scale: f64) -> Self {
        PointD::new(pt.x as f64 * scale, pt.y as f64 * scale)
    }

    /// Swap the sign of both coordinates.
    pub fn negate(self) -> Self {
        PointD::new(-self.x, -self.y)
    }

    /// The euclidean length of this point, considered as a vector.
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub(crate) fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl Add for PointD {
    type Output = PointD;

    fn add(self, rhs: PointD) -> PointD {
        PointD::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PointD {
    type Output = PointD;

    fn sub(self, rhs: PointD) -> PointD {
        PointD::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<Point64> for PointD {
    fn from(pt: Point64) -> Self {
        PointD::new(pt.x as f64, pt.y as f64)
    }
}

impl From<(f64, f64)> for PointD {
    fn from((x, y): (f64, f64)) -> Self {
        PointD { x, y }
    }
}

impl From<kurbo::Point> for PointD {
    fn from(p: kurbo::Point) -> Self {
        PointD::new(p.x, p.y)
    }
}

impl From<PointD> for kurbo::Point {
    fn from(p: PointD) -> Self {
        p.to_kurbo()
    }
}

/// An axis-aligned rectangle with integer coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect64 {
    /// Smallest `x`.
    pub left: i64,
    /// Smallest `y`.
    pub top: i64,
    /// Largest `x`.
    pub right: i64,
    /// Largest `y`.
    pub bottom: i64,
}

impl Rect64 {
    /// A rectangle that contains nothing and that any point will expand.
    ///
    /// Used as the starting accumulator when computing bounds.
    pub const INVALID: Rect64 = Rect64 {
        left: i64::MAX,
        top: i64::MAX,
        right: i64::MIN,
        bottom: i64::MIN,
    };

    /// Create a rectangle from its four edges.
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Rect64 {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Is this rectangle degenerate (zero or negative width or height)?
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    /// Has this rectangle been expanded by at least one point?
    pub fn is_valid(&self) -> bool {
        self.left != i64::MAX
    }

    /// The center, rounded towards zero.
    pub fn mid_point(&self) -> Point64 {
        Point64::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    /// Is `pt` strictly inside this rectangle?
    pub fn contains_point(&self, pt: Point64) -> bool {
        pt.x > self.left && pt.x < self.right && pt.y > self.top && pt.y < self.bottom
    }

    /// Is `rec` inside this rectangle (edges may touch)?
    pub fn contains_rect(&self, rec: &Rect64) -> bool {
        rec.left >= self.left
            && rec.right <= self.right
            && rec.top >= self.top
            && rec.bottom <= self.bottom
    }

    /// Do the two rectangles overlap (touching counts)?
    pub fn intersects(&self, rec: &Rect64) -> bool {
        self.left.max(rec.left) <= self.right.min(rec.right)
            && self.top.max(rec.top) <= self.bottom.min(rec.bottom)
    }

    /// The four corners, clockwise on screen starting at the top-left.
    pub fn as_path(&self) -> Vec<Point64> {
        vec![
            Point64::new(self.left, self.top),
            Point64::new(self.right, self.top),
            Point64::new(self.right, self.bottom),
            Point64::new(self.left, self.bottom),
        ]
    }

    /// Scale every edge, rounding half away from zero.
    pub fn scaled(&self, scale: f64) -> Rect64 {
        Rect64 {
            left: round_half_away(self.left as f64 * scale),
            top: round_half_away(self.top as f64 * scale),
            right: round_half_away(self.right as f64 * scale),
            bottom: round_half_away(self.bottom as f64 * scale),
        }
    }
}

/// An axis-aligned rectangle with floating-point coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectD {
    /// Smallest `x`.
    pub left: f64,
    /// Smallest `y`.
    pub top: f64,
    /// Largest `x`.
    pub right: f64,
    /// Largest `y`.
    pub bottom: f64,
}

impl RectD {
    /// A rectangle that contains nothing and that any point will expand.
    pub const INVALID: RectD = RectD {
        left: f64::MAX,
        top: f64::MAX,
        right: -f64::MAX,
        bottom: -f64::MAX,
    };

    /// Create a rectangle from its four edges.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        RectD {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Is this rectangle degenerate (zero or negative width or height)?
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    /// The center.
    pub fn mid_point(&self) -> PointD {
        PointD::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Is `pt` strictly inside this rectangle?
    pub fn contains_point(&self, pt: PointD) -> bool {
        pt.x > self.left && pt.x < self.right && pt.y > self.top && pt.y < self.bottom
    }

    /// Is `rec` inside this rectangle (edges may touch)?
    pub fn contains_rect(&self, rec: &RectD) -> bool {
        rec.left >= self.left
            && rec.right <= self.right
            && rec.top >= self.top
            && rec.bottom <= self.bottom
    }

    /// Do the two rectangles overlap (touching counts)?
    pub fn intersects(&self, rec: &RectD) -> bool {
        self.left.max(rec.left) <= self.right.min(rec.right)
            && self.top.max(rec.top) <= self.bottom.min(rec.bottom)
    }

    /// The four corners, clockwise on screen starting at the top-left.
    pub fn as_path(&self) -> Vec<PointD> {
        vec![
            PointD::new(self.left, self.top),
            PointD::new(self.right, self.top),
            PointD::new(self.right, self.bottom),
            PointD::new(self.left, self.bottom),
        ]
    }
}

impl From<kurbo::Rect> for RectD {
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        RectD::new(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<RectD> for kurbo::Rect {
    fn from(r: RectD) -> Self {
        kurbo::Rect::new(r.left, r.top, r.right, r.bottom)
    }
}

/// Where a point lies relative to a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PointInPolygonResult {
    /// On the boundary.
    IsOn,
    /// Strictly inside.
    IsInside,
    /// Strictly outside.
    IsOutside,
}

pub(crate) fn is_almost_zero(value: f64) -> bool {
    value.abs() <= FLOATING_POINT_TOLERANCE
}

/// Round to the nearest integer, with ties going away from zero.
///
/// This is the rounding used whenever floating-point coordinates become
/// integer coordinates.
pub fn round_half_away(val: f64) -> i64 {
    val.round() as i64
}

/// The z-component of `(pt2 - pt1) x (pt3 - pt2)`.
///
/// Coordinate differences are exact; only the final products are rounded,
/// so the sign is reliable whenever the magnitude is below 2^53.
pub fn cross_product(pt1: Point64, pt2: Point64, pt3: Point64) -> f64 {
    (pt2.x - pt1.x) as f64 * (pt3.y - pt2.y) as f64
        - (pt2.y - pt1.y) as f64 * (pt3.x - pt2.x) as f64
}

/// The exact sign of [`cross_product`].
pub fn cross_product_sign(pt1: Point64, pt2: Point64, pt3: Point64) -> i32 {
    let a = (pt2.x - pt1.x) as i128 * (pt3.y - pt2.y) as i128;
    let b = (pt2.y - pt1.y) as i128 * (pt3.x - pt2.x) as i128;
    match a.cmp(&b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

/// The z-component of the cross product of two vectors.
pub fn cross_product_d(vec1: PointD, vec2: PointD) -> f64 {
    vec1.y * vec2.x - vec2.y * vec1.x
}

/// The dot product of `pt2 - pt1` and `pt3 - pt2`.
pub fn dot_product(pt1: Point64, pt2: Point64, pt3: Point64) -> f64 {
    (pt2.x - pt1.x) as f64 * (pt3.x - pt2.x) as f64
        + (pt2.y - pt1.y) as f64 * (pt3.y - pt2.y) as f64
}

/// The dot product of two vectors.
pub fn dot_product_d(vec1: PointD, vec2: PointD) -> f64 {
    vec1.x * vec2.x + vec1.y * vec2.y
}

/// Is `a * b == c * d`, computed without overflow?
pub fn products_are_equal(a: i64, b: i64, c: i64, d: i64) -> bool {
    (a as i128) * (b as i128) == (c as i128) * (d as i128)
}

/// Do `pt1`, `shared_pt` and `pt2` lie on a common line?
///
/// Exact for all coordinates within [`MAX_COORD`].
pub fn is_collinear(pt1: Point64, shared_pt: Point64, pt2: Point64) -> bool {
    let a = shared_pt.x - pt1.x;
    let b = pt2.y - shared_pt.y;
    let c = shared_pt.y - pt1.y;
    let d = pt2.x - shared_pt.x;
    products_are_equal(a, b, c, d)
}

/// The intersection point of the lines through `ln1a-ln1b` and `ln2a-ln2b`,
/// clamped onto the first segment.
///
/// Returns `None` for parallel lines. When the crossing lies beyond either end
/// of the first segment, that endpoint is returned instead.
pub fn segment_intersect_point(
    ln1a: Point64,
    ln1b: Point64,
    ln2a: Point64,
    ln2b: Point64,
) -> Option<Point64> {
    let dy1 = (ln1b.y - ln1a.y) as f64;
    let dx1 = (ln1b.x - ln1a.x) as f64;
    let dy2 = (ln2b.y - ln2a.y) as f64;
    let dx2 = (ln2b.x - ln2a.x) as f64;
    let det = dy1 * dx2 - dy2 * dx1;
    if det == 0.0 {
        return None;
    }
    let t = ((ln1a.x - ln2a.x) as f64 * dy2 - (ln1a.y - ln2a.y) as f64 * dx2) / det;
    if t <= 0.0 {
        Some(ln1a)
    } else if t >= 1.0 {
        Some(ln1b)
    } else {
        Some(Point64::new(
            (ln1a.x as f64 + t * dx1) as i64,
            (ln1a.y as f64 + t * dy1) as i64,
        ))
    }
}

/// Do two segments intersect?
///
/// With `inclusive`, touching (including at endpoints) counts, but two
/// collinear segments never intersect.
pub fn segments_intersect(
    seg1a: Point64,
    seg1b: Point64,
    seg2a: Point64,
    seg2b: Point64,
    inclusive: bool,
) -> bool {
    if !inclusive {
        return cross_product(seg1a, seg2a, seg2b) * cross_product(seg1b, seg2a, seg2b) < 0.0
            && cross_product(seg2a, seg1a, seg1b) * cross_product(seg2b, seg1a, seg1b) < 0.0;
    }
    let res1 = cross_product(seg1a, seg2a, seg2b);
    let res2 = cross_product(seg1b, seg2a, seg2b);
    if res1 * res2 > 0.0 {
        return false;
    }
    let res3 = cross_product(seg2a, seg1a, seg1b);
    let res4 = cross_product(seg2b, seg1a, seg1b);
    if res3 * res4 > 0.0 {
        return false;
    }
    res1 != 0.0 || res2 != 0.0 || res3 != 0.0 || res4 != 0.0
}

/// The point of the segment `seg1-seg2` closest to `off_pt`.
///
/// Coordinates are rounded half to even.
pub fn closest_point_on_segment(off_pt: Point64, seg1: Point64, seg2: Point64) -> Point64 {
    if seg1 == seg2 {
        return seg1;
    }
    let dx = (seg2.x - seg1.x) as f64;
    let dy = (seg2.y - seg1.y) as f64;
    let q = ((off_pt.x - seg1.x) as f64 * dx + (off_pt.y - seg1.y) as f64 * dy)
        / (dx * dx + dy * dy);
    let q = q.clamp(0.0, 1.0);
    Point64::new(
        seg1.x + (q * dx).round_ties_even() as i64,
        seg1.y + (q * dy).round_ties_even() as i64,
    )
}

/// The squared distance from `pt` to the infinite line through `line1` and `line2`.
pub fn perpendic_dist_from_line_sqr(pt: Point64, line1: Point64, line2: Point64) -> f64 {
    let a = pt.x as f64 - line1.x as f64;
    let b = pt.y as f64 - line1.y as f64;
    let c = line2.x as f64 - line1.x as f64;
    let d = line2.y as f64 - line1.y as f64;
    if c == 0.0 && d == 0.0 {
        return 0.0;
    }
    let cross = a * d - c * b;
    cross * cross / (c * c + d * d)
}

/// Like [`perpendic_dist_from_line_sqr`], for floating-point points.
pub fn perpendic_dist_from_line_sqr_d(pt: PointD, line1: PointD, line2: PointD) -> f64 {
    let a = pt.x - line1.x;
    let b = pt.y - line1.y;
    let c = line2.x - line1.x;
    let d = line2.y - line1.y;
    if c == 0.0 && d == 0.0 {
        return 0.0;
    }
    let cross = a * d - c * b;
    cross * cross / (c * c + d * d)
}

/// Classify `pt` against a closed polygon, using winding crossings.
///
/// Polygons with fewer than three vertices contain nothing.
pub fn point_in_polygon(pt: Point64, polygon: &[Point64]) -> PointInPolygonResult {
    let len = polygon.len();
    if len < 3 {
        return PointInPolygonResult::IsOutside;
    }
    let mut start = 0;
    while start < len && polygon[start].y == pt.y {
        start += 1;
    }
    if start == len {
        return PointInPolygonResult::IsOutside;
    }

    let mut is_above = polygon[start].y < pt.y;
    let starting_above = is_above;
    let mut val = 0;
    let mut i = start + 1;
    let mut end = len;
    loop {
        if i == end {
            if end == start || start == 0 {
                break;
            }
            end = start;
            i = 0;
        }

        if is_above {
            while i < end && polygon[i].y < pt.y {
                i += 1;
            }
        } else {
            while i < end && polygon[i].y > pt.y {
                i += 1;
            }
        }
        if i == end {
            continue;
        }

        let curr = polygon[i];
        let prev = if i > 0 { polygon[i - 1] } else { polygon[len - 1] };

        if curr.y == pt.y {
            if curr.x == pt.x || (curr.y == prev.y && ((pt.x < prev.x) != (pt.x < curr.x))) {
                return PointInPolygonResult::IsOn;
            }
            i += 1;
            if i == start {
                break;
            }
            continue;
        }

        if pt.x < curr.x && pt.x < prev.x {
            // Only crossings to the left of `pt` count.
        } else if pt.x > prev.x && pt.x > curr.x {
            val = 1 - val;
        } else {
            let d = cross_product(prev, curr, pt);
            if d == 0.0 {
                return PointInPolygonResult::IsOn;
            }
            if (d < 0.0) == is_above {
                val = 1 - val;
            }
        }
        is_above = !is_above;
        i += 1;
    }

    if is_above != starting_above {
        if i == len {
            i = 0;
        }
        let d = if i == 0 {
            cross_product(polygon[len - 1], polygon[0], pt)
        } else {
            cross_product(polygon[i - 1], polygon[i], pt)
        };
        if d == 0.0 {
            return PointInPolygonResult::IsOn;
        }
        if (d < 0.0) == is_above {
            val = 1 - val;
        }
    }

    if val == 0 {
        PointInPolygonResult::IsOutside
    } else {
        PointInPolygonResult::IsInside
    }
}

/// Does `path2` contain `path1`?
///
/// Vertices lying on `path2`'s boundary are inconclusive; if every vertex is
/// inconclusive, the midpoint of `path1`'s bounds decides.
pub fn path2_contains_path1(path1: &[Point64], path2: &[Point64]) -> bool {
    let mut pip = PointInPolygonResult::IsOn;
    for &pt in path1 {
        match point_in_polygon(pt, path2) {
            PointInPolygonResult::IsOutside => {
                if pip == PointInPolygonResult::IsOutside {
                    return false;
                }
                pip = PointInPolygonResult::IsOutside;
            }
            PointInPolygonResult::IsInside => {
                if pip == PointInPolygonResult::IsInside {
                    return true;
                }
                pip = PointInPolygonResult::IsInside;
            }
            PointInPolygonResult::IsOn => {}
        }
    }
    let mp = crate::paths::bounds(path1).mid_point();
    point_in_polygon(mp, path2) != PointInPolygonResult::IsOutside
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Vec<Point64> {
        vec![
            Point64::new(0, 0),
            Point64::new(100, 0),
            Point64::new(100, 100),
            Point64::new(0, 100),
        ]
    }

    #[test]
    fn rounding_conventions() {
        assert_eq!(round_half_away(2.5), 3);
        assert_eq!(round_half_away(-2.5), -3);
        assert_eq!(round_half_away(-2.4), -2);
        assert_eq!(Point64::from_f64(0.5, -0.5), Point64::new(1, -1));

        // Ties go to even when projecting onto a segment.
        let p = closest_point_on_segment(Point64::new(1, 5), Point64::new(0, 0), Point64::new(5, 0));
        assert_eq!(p, Point64::new(1, 0));
        let p = closest_point_on_segment(Point64::new(0, 3), Point64::new(0, 0), Point64::new(0, 5));
        assert_eq!(p, Point64::new(0, 3));
        let p = closest_point_on_segment(Point64::new(9, 9), Point64::new(0, 0), Point64::new(5, 0));
        assert_eq!(p, Point64::new(5, 0));
    }

    #[test]
    fn collinearity_is_exact_for_large_coordinates() {
        let big = MAX_COORD / 2;
        let a = Point64::new(-big, -big);
        let b = Point64::new(0, 0);
        let c = Point64::new(big, big);
        assert!(is_collinear(a, b, c));
        assert!(!is_collinear(a, b, Point64::new(big, big - 1)));
        // An f64 cross product can't tell these apart.
        assert_eq!(cross_product(a, b, Point64::new(big, big - 1)), 0.0);
        assert_ne!(cross_product_sign(a, b, Point64::new(big, big - 1)), 0);
    }

    #[test]
    fn point_in_square() {
        let sq = square();
        assert_eq!(point_in_polygon(Point64::new(50, 50), &sq), PointInPolygonResult::IsInside);
        assert_eq!(point_in_polygon(Point64::new(150, 50), &sq), PointInPolygonResult::IsOutside);
        assert_eq!(point_in_polygon(Point64::new(100, 50), &sq), PointInPolygonResult::IsOn);
        assert_eq!(point_in_polygon(Point64::new(0, 0), &sq), PointInPolygonResult::IsOn);
        assert_eq!(point_in_polygon(Point64::new(50, 0), &sq), PointInPolygonResult::IsOn);
        assert_eq!(point_in_polygon(Point64::new(-1, 0), &sq), PointInPolygonResult::IsOutside);
        assert_eq!(
            point_in_polygon(Point64::new(50, 50), &sq[..2]),
            PointInPolygonResult::IsOutside
        );
    }

    #[test]
    fn containment() {
        let outer = square();
        let inner = vec![Point64::new(10, 10), Point64::new(20, 10), Point64::new(20, 20)];
        assert!(path2_contains_path1(&inner, &outer));
        assert!(!path2_contains_path1(&outer, &inner));
    }

    #[test]
    fn segment_intersections() {
        let p = segment_intersect_point(
            Point64::new(0, 0),
            Point64::new(10, 10),
            Point64::new(0, 10),
            Point64::new(10, 0),
        );
        assert_eq!(p, Some(Point64::new(5, 5)));
        assert_eq!(
            segment_intersect_point(
                Point64::new(0, 0),
                Point64::new(10, 0),
                Point64::new(0, 1),
                Point64::new(10, 1)
            ),
            None
        );
        assert!(segments_intersect(
            Point64::new(0, 0),
            Point64::new(10, 10),
            Point64::new(0, 10),
            Point64::new(10, 0),
            false
        ));
        // Touching at an endpoint only counts when inclusive.
        let (a, b, c, d) = (
            Point64::new(0, 0),
            Point64::new(10, 0),
            Point64::new(10, 0),
            Point64::new(10, 10),
        );
        assert!(!segments_intersect(a, b, c, d, false));
        assert!(segments_intersect(a, b, c, d, true));
    }

    #[test]
    fn float_points_compare_with_tolerance() {
        assert_eq!(PointD::new(1.0, 2.0), PointD::new(1.0 + 1e-13, 2.0));
        assert_ne!(PointD::new(1.0, 2.0), PointD::new(1.0 + 1e-9, 2.0));
    }

    proptest! {
        #[test]
        fn products_match_wide_arithmetic(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000,
                                          c in -1_000_000i64..1_000_000, d in -1_000_000i64..1_000_000) {
            prop_assert_eq!(products_are_equal(a, b, c, d), a * b == c * d);
        }

        #[test]
        fn cross_sign_matches_float_for_small_coords(
            x1 in -10_000i64..10_000, y1 in -10_000i64..10_000,
            x2 in -10_000i64..10_000, y2 in -10_000i64..10_000,
            x3 in -10_000i64..10_000, y3 in -10_000i64..10_000,
        ) {
            let (p1, p2, p3) = (Point64::new(x1, y1), Point64::new(x2, y2), Point64::new(x3, y3));
            let cp = cross_product(p1, p2, p3);
            prop_assert_eq!(cross_product_sign(p1, p2, p3), cp.partial_cmp(&0.0).unwrap() as i32);
            prop_assert_eq!(is_collinear(p1, p2, p3), cp == 0.0);
        }
    }
}
