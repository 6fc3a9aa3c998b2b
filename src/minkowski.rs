//! Minkowski sums and differences.
//!
//! The pattern is placed at every vertex of the path, and consecutive copies
//! are joined by quadrilaterals, one for each pattern edge. The union of all
//! those quads is the region swept out as the pattern slides along the path.

use crate::paths::{check_precision, is_positive, scale_path64, scale_paths_d, Path64, Paths64, PathsD};
use crate::{union_subjects, Error, FillRule, Point64, PointD};

/// The quads swept out by `pattern` travelling along `path`.
fn sweep_quads(pattern: &[Point64], path: &[Point64], is_sum: bool, is_closed: bool) -> Paths64 {
    if pattern.is_empty() || path.is_empty() {
        return Vec::new();
    }
    let placed: Vec<Path64> = path
        .iter()
        .map(|&p| {
            pattern
                .iter()
                .map(|&q| if is_sum { p + q } else { p - q })
                .collect()
        })
        .collect();

    let first = if is_closed { 0 } else { 1 };
    let mut quads = Vec::with_capacity(path.len().saturating_sub(first) * pattern.len());
    let mut g = if is_closed { path.len() - 1 } else { 0 };
    for i in first..path.len() {
        let mut h = pattern.len() - 1;
        for j in 0..pattern.len() {
            let mut quad = vec![placed[g][h], placed[i][h], placed[i][j], placed[g][j]];
            if !is_positive(&quad) {
                quad.reverse();
            }
            quads.push(quad);
            h = j;
        }
        g = i;
    }
    quads
}

/// The Minkowski sum of `pattern` and `path`.
///
/// If `is_closed`, the path's last point is joined back to its first. The
/// result covers the path's outline, not its interior.
pub fn minkowski_sum(pattern: &[Point64], path: &[Point64], is_closed: bool) -> Result<Paths64, Error> {
    union_subjects(&sweep_quads(pattern, path, true, is_closed), FillRule::NonZero)
}

/// The Minkowski difference of `pattern` and `path`: like
/// [`minkowski_sum`], with the pattern reflected through the origin.
pub fn minkowski_diff(pattern: &[Point64], path: &[Point64], is_closed: bool) -> Result<Paths64, Error> {
    union_subjects(&sweep_quads(pattern, path, false, is_closed), FillRule::NonZero)
}

fn minkowski_d(pattern: &[PointD], path: &[PointD], is_sum: bool, is_closed: bool, precision: i32) -> Result<PathsD, Error> {
    check_precision(precision)?;
    let scale = 10f64.powi(precision);
    let pattern = scale_path64(pattern, scale)?;
    let path = scale_path64(path, scale)?;
    let out = union_subjects(&sweep_quads(&pattern, &path, is_sum, is_closed), FillRule::NonZero)?;
    scale_paths_d(&out, 1.0 / scale)
}

/// Floating-point [`minkowski_sum`], keeping `precision` decimal digits.
pub fn minkowski_sum_d(pattern: &[PointD], path: &[PointD], is_closed: bool, precision: i32) -> Result<PathsD, Error> {
    minkowski_d(pattern, path, true, is_closed, precision)
}

/// Floating-point [`minkowski_diff`], keeping `precision` decimal digits.
pub fn minkowski_diff_d(pattern: &[PointD], path: &[PointD], is_closed: bool, precision: i32) -> Result<PathsD, Error> {
    minkowski_d(pattern, path, false, is_closed, precision)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::paths::{area_paths, area_paths_d, bounds_paths, ellipse64, make_path64, make_path_d};
    use crate::Rect64;

    fn square_pattern() -> Path64 {
        make_path64(&[-10, -10, 10, -10, 10, 10, -10, 10])
    }

    #[test]
    fn closed_outline() {
        let path = make_path64(&[0, 0, 100, 0, 100, 100, 0, 100]);
        let out = minkowski_sum(&square_pattern(), &path, true).unwrap();
        // A 120x120 frame with an 80x80 hole.
        assert_eq!(out.len(), 2);
        assert_eq!(area_paths(&out), 14400.0 - 6400.0);
        assert_eq!(bounds_paths(&out), Rect64::new(-10, -10, 110, 110));
    }

    #[test]
    fn open_segment() {
        let path = make_path64(&[0, 0, 100, 0]);
        let out = minkowski_sum(&square_pattern(), &path, false).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area_paths(&out), 120.0 * 20.0);
    }

    #[test]
    fn difference_reflects_the_pattern() {
        let pattern = make_path64(&[0, 0, 10, 0, 10, 10, 0, 10]);
        let path = make_path64(&[0, 0, 100, 0]);
        let out = minkowski_diff(&pattern, &path, false).unwrap();
        assert_eq!(area_paths(&out), 110.0 * 10.0);
        assert_eq!(bounds_paths(&out), Rect64::new(-10, -10, 100, 0));

        let sum = minkowski_sum(&pattern, &path, false).unwrap();
        assert_eq!(bounds_paths(&sum), Rect64::new(0, 0, 110, 10));
    }

    #[test]
    fn circle_around_a_square() {
        let pattern = ellipse64(Point64::new(0, 0), 30.0, 30.0, 16);
        let path = make_path64(&[0, 0, 200, 0, 200, 200, 0, 200, 0, 0]);
        let out = minkowski_sum(&pattern, &path, false).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(bounds_paths(&out), Rect64::new(-30, -30, 230, 230));
    }

    #[test]
    fn empty_inputs() {
        assert!(minkowski_sum(&[], &square_pattern(), true).unwrap().is_empty());
        assert!(minkowski_sum(&square_pattern(), &[], true).unwrap().is_empty());
    }

    #[test]
    fn floating_point() {
        let pattern = make_path_d(&[-0.1, -0.1, 0.1, -0.1, 0.1, 0.1, -0.1, 0.1]);
        let path = make_path_d(&[0.0, 0.0, 1.0, 0.0]);
        let out = minkowski_sum_d(&pattern, &path, false, 2).unwrap();
        assert!((area_paths_d(&out) - 1.2 * 0.2).abs() < 1e-9);
        let out = minkowski_diff_d(&pattern, &path, false, 2).unwrap();
        assert!((area_paths_d(&out) - 1.2 * 0.2).abs() < 1e-9);
        assert_matches!(
            minkowski_sum_d(&pattern, &path, false, -9),
            Err(Error::PrecisionOutOfRange { precision: -9 })
        );
    }
}
