//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::{ClipType, FillRule, JoinType, EndType, Path64, Paths64, Point64};

/// Generate an arbitrary coordinate in `start..=end`.
pub fn coord_in_range(start: i64, end: i64, u: &mut Unstructured<'_>) -> Result<i64, arbitrary::Error> {
    u.int_in_range(start..=end)
}

/// Generate a coordinate with a chance of repeating `orig`.
///
/// Repeated coordinates give horizontal and vertical edges, collinear runs
/// and coincident vertices, which is where the sweep has most of its special
/// cases.
fn another_coord_in_range(
    orig: i64,
    start: i64,
    end: i64,
    u: &mut Unstructured<'_>,
) -> Result<i64, arbitrary::Error> {
    let close: bool = u.arbitrary()?;
    if close {
        let delta: i64 = u.int_in_range(-1..=1)?;
        Ok((orig + delta).clamp(start, end))
    } else {
        coord_in_range(start, end, u)
    }
}

/// Generate an arbitrary point with both coordinates in `-size..=size`.
pub fn point64(size: i64, u: &mut Unstructured<'_>) -> Result<Point64, arbitrary::Error> {
    Ok(Point64::new(
        coord_in_range(-size, size, u)?,
        coord_in_range(-size, size, u)?,
    ))
}

/// Generate an arbitrary path with between 3 and `max_len` points (inclusive).
///
/// Successive points are biased towards sharing a coordinate with their
/// predecessor.
pub fn path64(size: i64, max_len: usize, u: &mut Unstructured<'_>) -> Result<Path64, arbitrary::Error> {
    let len = u.int_in_range(3..=max_len.max(3))?;
    let mut ret = Vec::with_capacity(len);
    let mut prev = point64(size, u)?;
    ret.push(prev);
    for _ in 1..len {
        prev = Point64::new(
            another_coord_in_range(prev.x, -size, size, u)?,
            another_coord_in_range(prev.y, -size, size, u)?,
        );
        ret.push(prev);
    }
    Ok(ret)
}

/// Generate an arbitrary set of at most `max_paths` paths.
pub fn paths64(
    size: i64,
    max_paths: usize,
    max_len: usize,
    u: &mut Unstructured<'_>,
) -> Result<Paths64, arbitrary::Error> {
    let count = u.int_in_range(1..=max_paths.max(1))?;
    (0..count).map(|_| path64(size, max_len, u)).collect()
}

/// Generate an arbitrary Boolean operation (never [`ClipType::NoClip`]).
pub fn clip_type(u: &mut Unstructured<'_>) -> Result<ClipType, arbitrary::Error> {
    Ok(*u.choose(&[
        ClipType::Intersection,
        ClipType::Union,
        ClipType::Difference,
        ClipType::Xor,
    ])?)
}

/// Generate an arbitrary fill rule.
pub fn fill_rule(u: &mut Unstructured<'_>) -> Result<FillRule, arbitrary::Error> {
    Ok(*u.choose(&[
        FillRule::EvenOdd,
        FillRule::NonZero,
        FillRule::Positive,
        FillRule::Negative,
    ])?)
}

/// Generate an arbitrary join type.
pub fn join_type(u: &mut Unstructured<'_>) -> Result<JoinType, arbitrary::Error> {
    Ok(*u.choose(&[JoinType::Square, JoinType::Bevel, JoinType::Round, JoinType::Miter])?)
}

/// Generate an arbitrary end type.
pub fn end_type(u: &mut Unstructured<'_>) -> Result<EndType, arbitrary::Error> {
    Ok(*u.choose(&[
        EndType::Polygon,
        EndType::Joined,
        EndType::Butt,
        EndType::Square,
        EndType::Round,
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{boolean_op, Error};

    #[test]
    fn boolean_ops_never_panic() {
        arbtest::arbtest(|u| {
            let subjects = paths64(50, 4, 8, u)?;
            let clips = paths64(50, 4, 8, u)?;
            let op = clip_type(u)?;
            let rule = fill_rule(u)?;
            match boolean_op(op, &subjects, &clips, rule) {
                Ok(out) => assert!(out.iter().all(|p| p.len() >= 3)),
                Err(e) => assert_eq!(e, Error::SweepFailed),
            }
            Ok(())
        })
        .budget_ms(500);
    }

    #[test]
    fn paths_have_enough_points() {
        arbtest::arbtest(|u| {
            let path = path64(10, 6, u)?;
            assert!((3..=6).contains(&path.len()));
            assert!(path.iter().all(|p| p.x.abs() <= 10 && p.y.abs() <= 10));
            Ok(())
        });
    }
}
