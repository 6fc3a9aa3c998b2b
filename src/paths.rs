//! Path-level utilities: area, bounds, scaling and a few constructors.

use kurbo::{BezPath, PathEl};

use crate::geom::{Point64, PointD, Rect64, RectD};
use crate::Error;

/// A polygon or polyline with integer coordinates.
pub type Path64 = Vec<Point64>;
/// A collection of integer paths.
pub type Paths64 = Vec<Path64>;
/// A polygon or polyline with floating-point coordinates.
pub type PathD = Vec<PointD>;
/// A collection of floating-point paths.
pub type PathsD = Vec<PathD>;

/// The largest supported decimal precision of the floating-point drivers.
pub const MAX_PRECISION: i32 = 8;

/// Checks that `precision` is within `[-8, 8]`.
pub fn check_precision(precision: i32) -> Result<(), Error> {
    if (-MAX_PRECISION..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(Error::PrecisionOutOfRange { precision })
    }
}

/// The signed area of a closed path.
///
/// With `y` growing downwards, paths that wind clockwise on screen have
/// positive area. Paths with fewer than three points have zero area.
pub fn area(path: &[Point64]) -> f64 {
    let Some(&last) = path.last() else {
        return 0.0;
    };
    if path.len() < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    let mut prev = last;
    for &pt in path {
        a += (prev.y + pt.y) as f64 * (prev.x - pt.x) as f64;
        prev = pt;
    }
    a * 0.5
}

/// The total signed area of a set of closed paths.
pub fn area_paths(paths: &[Path64]) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

/// The signed area of a closed floating-point path.
pub fn area_d(path: &[PointD]) -> f64 {
    let Some(&last) = path.last() else {
        return 0.0;
    };
    if path.len() < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    let mut prev = last;
    for &pt in path {
        a += (prev.y + pt.y) * (prev.x - pt.x);
        prev = pt;
    }
    a * 0.5
}

/// The total signed area of a set of closed floating-point paths.
pub fn area_paths_d(paths: &[PathD]) -> f64 {
    paths.iter().map(|p| area_d(p)).sum()
}

/// Does this path have non-negative area?
pub fn is_positive(path: &[Point64]) -> bool {
    area(path) >= 0.0
}

/// Does this floating-point path have non-negative area?
pub fn is_positive_d(path: &[PointD]) -> bool {
    area_d(path) >= 0.0
}

/// The bounding box of a path; an empty path gives an all-zero rectangle.
pub fn bounds(path: &[Point64]) -> Rect64 {
    let mut r = Rect64::INVALID;
    for pt in path {
        r.left = r.left.min(pt.x);
        r.right = r.right.max(pt.x);
        r.top = r.top.min(pt.y);
        r.bottom = r.bottom.max(pt.y);
    }
    if r.is_valid() {
        r
    } else {
        Rect64::default()
    }
}

/// The bounding box of several paths.
pub fn bounds_paths(paths: &[Path64]) -> Rect64 {
    let mut r = Rect64::INVALID;
    for pt in paths.iter().flatten() {
        r.left = r.left.min(pt.x);
        r.right = r.right.max(pt.x);
        r.top = r.top.min(pt.y);
        r.bottom = r.bottom.max(pt.y);
    }
    if r.is_valid() {
        r
    } else {
        Rect64::default()
    }
}

/// The bounding box of a floating-point path.
pub fn bounds_d(path: &[PointD]) -> RectD {
    bounds_iter_d(path.iter())
}

/// The bounding box of several floating-point paths.
pub fn bounds_paths_d(paths: &[PathD]) -> RectD {
    bounds_iter_d(paths.iter().flatten())
}

fn bounds_iter_d<'a>(pts: impl Iterator<Item = &'a PointD>) -> RectD {
    let mut r = RectD::INVALID;
    for pt in pts {
        r.left = r.left.min(pt.x);
        r.right = r.right.max(pt.x);
        r.top = r.top.min(pt.y);
        r.bottom = r.bottom.max(pt.y);
    }
    if r.left == f64::MAX {
        RectD::default()
    } else {
        r
    }
}

/// Reverses a path in place.
pub fn reverse_path<T>(path: &mut [T]) {
    path.reverse();
}

/// Reverses every path in place.
pub fn reverse_paths<T>(paths: &mut [Vec<T>]) {
    for p in paths {
        p.reverse();
    }
}

/// Removes consecutive duplicate points.
///
/// For closed paths the final point is also dropped if it repeats the first.
pub fn strip_duplicates(path: &[Point64], is_closed: bool) -> Path64 {
    let mut result: Path64 = Vec::with_capacity(path.len());
    for &pt in path {
        if result.last() != Some(&pt) {
            result.push(pt);
        }
    }
    if is_closed && result.len() > 1 && result.last() == result.first() {
        result.pop();
    }
    result
}

fn check_scale(scale: f64) -> Result<(), Error> {
    if scale == 0.0 || !scale.is_finite() {
        Err(Error::InvalidScale { scale })
    } else {
        Ok(())
    }
}

/// Converts a floating-point path to integers, multiplying by `scale` and
/// rounding half away from zero.
pub fn scale_path64(path: &[PointD], scale: f64) -> Result<Path64, Error> {
    check_scale(scale)?;
    Ok(path.iter().map(|&p| Point64::from_scaled(p, scale)).collect())
}

/// Converts floating-point paths to integers. See [`scale_path64`].
pub fn scale_paths64(paths: &[PathD], scale: f64) -> Result<Paths64, Error> {
    check_scale(scale)?;
    Ok(paths
        .iter()
        .map(|path| path.iter().map(|&p| Point64::from_scaled(p, scale)).collect())
        .collect())
}

/// Converts an integer path to floating point, multiplying by `scale`.
pub fn scale_path_d(path: &[Point64], scale: f64) -> Result<PathD, Error> {
    check_scale(scale)?;
    Ok(path.iter().map(|&p| PointD::from_scaled(p, scale)).collect())
}

/// Converts integer paths to floating point. See [`scale_path_d`].
pub fn scale_paths_d(paths: &[Path64], scale: f64) -> Result<PathsD, Error> {
    check_scale(scale)?;
    Ok(paths
        .iter()
        .map(|path| path.iter().map(|&p| PointD::from_scaled(p, scale)).collect())
        .collect())
}

/// Shifts every point by `(dx, dy)`.
pub fn translate_path(path: &[Point64], dx: i64, dy: i64) -> Path64 {
    path.iter().map(|p| Point64::new(p.x + dx, p.y + dy)).collect()
}

/// Shifts every path by `(dx, dy)`.
pub fn translate_paths(paths: &[Path64], dx: i64, dy: i64) -> Paths64 {
    paths.iter().map(|p| translate_path(p, dx, dy)).collect()
}

/// Builds a path from a flat `[x0, y0, x1, y1, ...]` list.
///
/// A trailing odd coordinate is ignored.
pub fn make_path64(coords: &[i64]) -> Path64 {
    coords
        .chunks_exact(2)
        .map(|c| Point64::new(c[0], c[1]))
        .collect()
}

/// Builds a floating-point path from a flat `[x0, y0, x1, y1, ...]` list.
pub fn make_path_d(coords: &[f64]) -> PathD {
    coords
        .chunks_exact(2)
        .map(|c| PointD::new(c[0], c[1]))
        .collect()
}

fn ellipse_steps(radius_x: f64, radius_y: f64, steps: usize) -> usize {
    if steps <= 2 {
        (std::f64::consts::PI * ((radius_x + radius_y) / 2.0).sqrt()).ceil() as usize
    } else {
        steps
    }
}

/// Approximates an ellipse with `steps` vertices.
///
/// A non-positive `radius_y` means a circle. If `steps` is at most 2, a
/// step count is chosen from the radii.
pub fn ellipse_d(center: PointD, radius_x: f64, radius_y: f64, steps: usize) -> PathD {
    if radius_x <= 0.0 {
        return Vec::new();
    }
    let radius_y = if radius_y <= 0.0 { radius_x } else { radius_y };
    let steps = ellipse_steps(radius_x, radius_y, steps);
    let (si, co) = (2.0 * std::f64::consts::PI / steps as f64).sin_cos();
    let (mut dx, mut dy) = (co, si);
    let mut result = Vec::with_capacity(steps);
    result.push(PointD::new(center.x + radius_x, center.y));
    for _ in 1..steps {
        result.push(PointD::new(center.x + radius_x * dx, center.y + radius_y * dy));
        let x = dx * co - dy * si;
        dy = dy * co + dx * si;
        dx = x;
    }
    result
}

/// Like [`ellipse_d`], rounding each vertex half away from zero.
pub fn ellipse64(center: Point64, radius_x: f64, radius_y: f64, steps: usize) -> Path64 {
    ellipse_d(PointD::from(center), radius_x, radius_y, steps)
        .into_iter()
        .map(Point64::from)
        .collect()
}

/// Converts paths to a [`kurbo::BezPath`], closing each subpath if `closed`.
pub fn paths_to_bez_path(paths: &[PathD], closed: bool) -> BezPath {
    let mut ret = BezPath::new();
    for path in paths {
        let mut pts = path.iter();
        let Some(first) = pts.next() else {
            continue;
        };
        ret.move_to(first.to_kurbo());
        for p in pts {
            ret.line_to(p.to_kurbo());
        }
        if closed {
            ret.close_path();
        }
    }
    ret
}

/// Flattens a [`kurbo::BezPath`] into polylines.
///
/// Curved segments are approximated to within `tolerance`. Each subpath
/// becomes one output path; an explicit closing point equal to the start is
/// dropped.
pub fn bez_path_to_paths_d(path: &BezPath, tolerance: f64) -> PathsD {
    let mut ret: PathsD = Vec::new();
    let mut current: PathD = Vec::new();
    fn finish(current: &mut PathD, ret: &mut PathsD) {
        if current.len() > 1 && current.first() == current.last() {
            current.pop();
        }
        if !current.is_empty() {
            ret.push(std::mem::take(current));
        }
    }
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            finish(&mut current, &mut ret);
            current.push(p.into());
        }
        PathEl::LineTo(p) => current.push(p.into()),
        PathEl::ClosePath => finish(&mut current, &mut ret),
        // `flatten` only emits lines.
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    finish(&mut current, &mut ret);
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn square_area_is_positive() {
        let sq = make_path64(&[0, 0, 100, 0, 100, 100, 0, 100]);
        assert_eq!(area(&sq), 10000.0);
        let mut rev = sq.clone();
        reverse_path(&mut rev);
        assert_eq!(area(&rev), -10000.0);
        assert!(is_positive(&sq));
        assert_eq!(area(&sq[..2]), 0.0);
    }

    #[test]
    fn duplicates() {
        let p = make_path64(&[0, 0, 0, 0, 10, 0, 10, 0, 10, 10, 0, 0]);
        assert_eq!(strip_duplicates(&p, false).len(), 4);
        assert_eq!(strip_duplicates(&p, true), make_path64(&[0, 0, 10, 0, 10, 10]));
        assert!(strip_duplicates(&[], true).is_empty());
    }

    #[test]
    fn bounds_of_nothing() {
        assert_eq!(bounds(&[]), Rect64::default());
        let p = make_path64(&[5, -3, -2, 8]);
        assert_eq!(bounds(&p), Rect64::new(-2, -3, 5, 8));
    }

    #[test]
    fn scaling() {
        let p = make_path_d(&[0.125, -0.125, 1.5, 2.0]);
        let scaled = scale_path64(&p, 100.0).unwrap();
        assert_eq!(scaled, make_path64(&[13, -13, 150, 200]));
        assert_matches!(scale_path64(&p, 0.0), Err(Error::InvalidScale { .. }));
        assert_matches!(scale_paths_d(&[scaled], f64::NAN), Err(Error::InvalidScale { .. }));
    }

    #[test]
    fn precision_range() {
        assert!(check_precision(8).is_ok());
        assert!(check_precision(-8).is_ok());
        assert_matches!(
            check_precision(9),
            Err(Error::PrecisionOutOfRange { precision: 9 })
        );
    }

    #[test]
    fn ellipse_is_roughly_round() {
        let e = ellipse64(Point64::new(100, 100), 30.0, 0.0, 0);
        assert!(e.len() > 8);
        assert_eq!(e[0], Point64::new(130, 100));
        let a = area(&e);
        let circle = std::f64::consts::PI * 900.0;
        assert!((a - circle).abs() / circle < 0.05, "area {a}");
        assert!(ellipse64(Point64::new(0, 0), 0.0, 5.0, 0).is_empty());
    }

    #[test]
    fn bez_path_round_trip() {
        let paths = vec![make_path_d(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0])];
        let bez = paths_to_bez_path(&paths, true);
        assert_eq!(bez_path_to_paths_d(&bez, 0.1), paths);
    }
}
