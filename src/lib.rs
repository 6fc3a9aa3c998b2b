#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod clipper;
pub mod geom;
pub mod minkowski;
pub mod offset;
pub mod paths;
pub mod poly_tree;
pub mod rect_clip;
mod sweep;
mod vertex;

#[cfg(feature = "generators")]
pub mod generators;

#[cfg(feature = "debug-svg")]
pub mod svg;

pub use clipper::{ClipperConfig, Clipper64, ClipperD, Solution64, SolutionD};
pub use geom::{Point64, PointD, PointInPolygonResult, Rect64, RectD};
pub use minkowski::{minkowski_diff, minkowski_diff_d, minkowski_sum, minkowski_sum_d};
pub use offset::{inflate_paths, inflate_paths_d, ClipperOffset, EndType, JoinType, OffsetConfig};
pub use paths::{area, area_d, make_path64, make_path_d, Path64, PathD, Paths64, PathsD};
pub use poly_tree::{polytree_to_paths, PolyPathIdx, PolyTree, PolyTree64, PolyTreeD};
pub use rect_clip::{rect_clip, rect_clip_d, rect_clip_lines, rect_clip_lines_d, RectClip64, RectClipLines64};
pub use vertex::ReusableData;

/// The Boolean operation to perform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ClipType {
    /// Produce nothing.
    NoClip,
    /// Regions covered by both the subject and the clip.
    Intersection,
    /// Regions covered by either the subject or the clip.
    Union,
    /// Regions covered by the subject but not the clip.
    Difference,
    /// Regions covered by exactly one of the subject and the clip.
    Xor,
}

/// A fill rule tells us how to decide whether a point is "inside" a set of
/// paths, given its winding number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FillRule {
    /// The point is "inside" if its winding number is odd.
    EvenOdd,
    /// The point is "inside" if its winding number is non-zero.
    NonZero,
    /// The point is "inside" if its winding number is positive.
    Positive,
    /// The point is "inside" if its winding number is negative.
    Negative,
}

/// Which operand of a Boolean operation a path belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PathType {
    /// The first operand.
    Subject,
    /// The second operand.
    Clip,
}

/// Things that can go wrong.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The decimal precision of a floating-point operation was outside
    /// `[-8, 8]`.
    #[error("precision {precision} is outside the supported range [-8, 8]")]
    PrecisionOutOfRange {
        /// The rejected precision.
        precision: i32,
    },
    /// The sweep reached a state it couldn't recover from, so its output
    /// was discarded.
    #[error("the sweep failed and produced no output")]
    SweepFailed,
    /// A scale factor was zero, infinite or NaN.
    #[error("invalid scale factor {scale}")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },
}

/// Runs a Boolean operation on closed integer paths.
pub fn boolean_op(
    clip_type: ClipType,
    subjects: &[Path64],
    clips: &[Path64],
    fill_rule: FillRule,
) -> Result<Paths64, Error> {
    let mut c = Clipper64::new();
    c.add_subject(subjects);
    c.add_clip(clips);
    Ok(c.execute(clip_type, fill_rule)?.closed)
}

/// The regions covered by both `subjects` and `clips`.
pub fn intersect(subjects: &[Path64], clips: &[Path64], fill_rule: FillRule) -> Result<Paths64, Error> {
    boolean_op(ClipType::Intersection, subjects, clips, fill_rule)
}

/// The regions covered by either `subjects` or `clips`.
pub fn union(subjects: &[Path64], clips: &[Path64], fill_rule: FillRule) -> Result<Paths64, Error> {
    boolean_op(ClipType::Union, subjects, clips, fill_rule)
}

/// Merges a single set of paths, resolving self-overlaps according to
/// `fill_rule`.
pub fn union_subjects(subjects: &[Path64], fill_rule: FillRule) -> Result<Paths64, Error> {
    boolean_op(ClipType::Union, subjects, &[], fill_rule)
}

/// The regions covered by `subjects` but not `clips`.
pub fn difference(subjects: &[Path64], clips: &[Path64], fill_rule: FillRule) -> Result<Paths64, Error> {
    boolean_op(ClipType::Difference, subjects, clips, fill_rule)
}

/// The regions covered by exactly one of `subjects` and `clips`.
pub fn xor(subjects: &[Path64], clips: &[Path64], fill_rule: FillRule) -> Result<Paths64, Error> {
    boolean_op(ClipType::Xor, subjects, clips, fill_rule)
}

/// Runs a Boolean operation on closed floating-point paths, keeping
/// `precision` decimal digits.
pub fn boolean_op_d(
    clip_type: ClipType,
    subjects: &[PathD],
    clips: &[PathD],
    fill_rule: FillRule,
    precision: i32,
) -> Result<PathsD, Error> {
    let mut c = ClipperD::new(precision)?;
    c.add_subject(subjects);
    c.add_clip(clips);
    Ok(c.execute(clip_type, fill_rule)?.closed)
}

/// Floating-point [`intersect`].
pub fn intersect_d(
    subjects: &[PathD],
    clips: &[PathD],
    fill_rule: FillRule,
    precision: i32,
) -> Result<PathsD, Error> {
    boolean_op_d(ClipType::Intersection, subjects, clips, fill_rule, precision)
}

/// Floating-point [`union`].
pub fn union_d(
    subjects: &[PathD],
    clips: &[PathD],
    fill_rule: FillRule,
    precision: i32,
) -> Result<PathsD, Error> {
    boolean_op_d(ClipType::Union, subjects, clips, fill_rule, precision)
}

/// Floating-point [`difference`].
pub fn difference_d(
    subjects: &[PathD],
    clips: &[PathD],
    fill_rule: FillRule,
    precision: i32,
) -> Result<PathsD, Error> {
    boolean_op_d(ClipType::Difference, subjects, clips, fill_rule, precision)
}

/// Floating-point [`xor`].
pub fn xor_d(
    subjects: &[PathD],
    clips: &[PathD],
    fill_rule: FillRule,
    precision: i32,
) -> Result<PathsD, Error> {
    boolean_op_d(ClipType::Xor, subjects, clips, fill_rule, precision)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::paths::{area_paths, translate_paths};

    fn square(x: i64, y: i64, size: i64) -> Path64 {
        make_path64(&[x, y, x + size, y, x + size, y + size, x, y + size])
    }

    #[test]
    fn free_functions() {
        let a = vec![square(0, 0, 100)];
        let b = vec![square(50, 50, 100)];
        assert_eq!(area_paths(&union(&a, &b, FillRule::NonZero).unwrap()), 17500.0);
        assert_eq!(area_paths(&intersect(&a, &b, FillRule::NonZero).unwrap()), 2500.0);
        assert_eq!(area_paths(&difference(&a, &b, FillRule::NonZero).unwrap()), 7500.0);
        assert_eq!(area_paths(&xor(&a, &b, FillRule::NonZero).unwrap()), 15000.0);
    }

    #[test]
    fn union_subjects_merges_overlaps() {
        let subjects = vec![square(0, 0, 100), square(100, 0, 100), square(50, 50, 100)];
        let out = union_subjects(&subjects, FillRule::NonZero).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area_paths(&out), 20000.0 + 5000.0);
    }

    #[test]
    fn float_free_functions() {
        let a = vec![make_path_d(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])];
        let b = vec![make_path_d(&[0.5, 0.5, 1.5, 0.5, 1.5, 1.5, 0.5, 1.5])];
        let out = intersect_d(&a, &b, FillRule::NonZero, 4).unwrap();
        assert!((paths::area_paths_d(&out) - 0.25).abs() < 1e-9);
        assert_matches!(
            union_d(&a, &b, FillRule::NonZero, 12),
            Err(Error::PrecisionOutOfRange { precision: 12 })
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            Error::PrecisionOutOfRange { precision: 9 }.to_string(),
            "precision 9 is outside the supported range [-8, 8]"
        );
        assert_eq!(Error::SweepFailed.to_string(), "the sweep failed and produced no output");
    }

    fn arb_square() -> impl Strategy<Value = Path64> {
        (-50i64..50, -50i64..50, 1i64..40).prop_map(|(x, y, s)| square(x, y, s))
    }

    fn arb_polygon() -> impl Strategy<Value = Path64> {
        prop::collection::vec((-100i64..100, -100i64..100), 3..12)
            .prop_map(|pts| pts.into_iter().map(Point64::from).collect())
    }

    /// Rectilinear paths on a small grid, with plenty of repeated points and
    /// doubled-back edges.
    fn arb_rectilinear() -> impl Strategy<Value = Path64> {
        (0i64..8, 0i64..8, prop::collection::vec((any::<bool>(), 0i64..8), 2..12)).prop_map(
            |(x0, y0, steps)| {
                let mut p = Point64::new(x0, y0);
                let mut path = vec![p];
                for (horizontal, v) in steps {
                    if horizontal {
                        p.x = v;
                    } else {
                        p.y = v;
                    }
                    path.push(p);
                }
                path
            },
        )
    }

    fn same_ring(a: &[Point64], b: &[Point64]) -> bool {
        a.len() == b.len()
            && (0..b.len()).any(|shift| a.iter().enumerate().all(|(i, p)| b[(i + shift) % b.len()] == *p))
    }

    proptest! {
        #[test]
        fn union_is_idempotent(squares in prop::collection::vec(arb_square(), 1..8)) {
            let once = union_subjects(&squares, FillRule::NonZero).unwrap();
            let twice = union_subjects(&once, FillRule::NonZero).unwrap();
            prop_assert_eq!(area_paths(&once), area_paths(&twice));
        }

        #[test]
        fn areas_add_up(a in prop::collection::vec(arb_square(), 1..5), b in prop::collection::vec(arb_square(), 1..5)) {
            let a = union_subjects(&a, FillRule::NonZero).unwrap();
            let b = union_subjects(&b, FillRule::NonZero).unwrap();
            let u = area_paths(&union(&a, &b, FillRule::NonZero).unwrap());
            let i = area_paths(&intersect(&a, &b, FillRule::NonZero).unwrap());
            let x = area_paths(&xor(&a, &b, FillRule::NonZero).unwrap());
            prop_assert_eq!(u, area_paths(&a) + area_paths(&b) - i);
            prop_assert_eq!(x, u - i);
        }

        #[test]
        fn deterministic(a in prop::collection::vec(arb_polygon(), 1..4), b in prop::collection::vec(arb_polygon(), 1..4)) {
            let first = boolean_op(ClipType::Xor, &a, &b, FillRule::EvenOdd);
            let second = boolean_op(ClipType::Xor, &a, &b, FillRule::EvenOdd);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn never_panics(a in prop::collection::vec(arb_polygon(), 1..4), b in prop::collection::vec(arb_polygon(), 1..4)) {
            for clip_type in [ClipType::Intersection, ClipType::Union, ClipType::Difference, ClipType::Xor] {
                for fill_rule in [FillRule::EvenOdd, FillRule::NonZero, FillRule::Positive, FillRule::Negative] {
                    match boolean_op(clip_type, &a, &b, fill_rule) {
                        Ok(paths) => prop_assert!(paths.iter().all(|p| p.len() >= 3)),
                        Err(e) => prop_assert_eq!(e, Error::SweepFailed),
                    }
                }
            }
        }

        #[test]
        fn tree_matches_flat_output(
            a in prop::collection::vec(arb_rectilinear(), 1..5),
            b in prop::collection::vec(arb_rectilinear(), 0..3),
        ) {
            for clip_type in [ClipType::Union, ClipType::Intersection, ClipType::Difference, ClipType::Xor] {
                for fill_rule in [FillRule::EvenOdd, FillRule::NonZero] {
                    let mut c = Clipper64::new();
                    c.add_subject(&a);
                    c.add_clip(&b);
                    let flat = c.execute(clip_type, fill_rule);
                    let tree = c.execute_tree(clip_type, fill_rule);
                    let (flat, (tree, _)) = match (flat, tree) {
                        (Ok(flat), Ok(tree)) => (flat.closed, tree),
                        (flat, tree) => {
                            prop_assert_eq!(flat.err(), Some(Error::SweepFailed));
                            prop_assert_eq!(tree.err(), Some(Error::SweepFailed));
                            continue;
                        }
                    };
                    let nested = tree.to_paths();
                    prop_assert_eq!(nested.len(), flat.len(), "{:?} {:?}", clip_type, fill_rule);
                    prop_assert_eq!(area_paths(&nested), area_paths(&flat));
                    for (i, p) in nested.iter().enumerate() {
                        for q in &nested[i + 1..] {
                            prop_assert!(!same_ring(p, q), "ring {:?} appears twice", p);
                        }
                    }
                }
            }
        }

        #[test]
        fn collinear_cleanup_is_idempotent(a in prop::collection::vec(arb_square(), 1..6)) {
            let config = ClipperConfig { preserve_collinear: false, ..ClipperConfig::default() };
            let run = |paths: &[Path64]| {
                let mut c = Clipper64::with_config(config);
                c.add_subject(paths);
                c.execute(ClipType::Union, FillRule::NonZero).unwrap().closed
            };
            let once = run(&a);
            let twice = run(&once);
            prop_assert_eq!(area_paths(&once), area_paths(&twice));
            prop_assert_eq!(
                once.iter().map(Vec::len).sum::<usize>(),
                twice.iter().map(Vec::len).sum::<usize>()
            );
        }

        #[test]
        fn translation_commutes(a in prop::collection::vec(arb_square(), 1..4), dx in -1000i64..1000, dy in -1000i64..1000) {
            let moved = translate_paths(&a, dx, dy);
            let u1 = union_subjects(&a, FillRule::NonZero).unwrap();
            let u2 = union_subjects(&moved, FillRule::NonZero).unwrap();
            prop_assert_eq!(area_paths(&u1), area_paths(&u2));
        }
    }
}
