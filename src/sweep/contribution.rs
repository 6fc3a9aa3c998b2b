//! Decision tables: does an edge bound the output region?
//!
//! An edge "contributes" when the region on one side of it is in the result
//! and the region on the other side is not. For closed paths this depends on
//! two winding counts: `wind_count` (same path type as the edge) and
//! `wind_count2` (the other path type). The rules are finite, so they live in
//! lookup tables indexed by clip type, fill rule and path type.

use crate::{ClipType, FillRule, PathType};

/// A predicate on a winding count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WindTest {
    Never,
    Always,
    Zero,
    NonZero,
    Positive,
    Negative,
    NonPositive,
    NonNegative,
    PlusOne,
    MinusOne,
    AbsOne,
}

impl WindTest {
    pub fn test(self, w: i32) -> bool {
        match self {
            WindTest::Never => false,
            WindTest::Always => true,
            WindTest::Zero => w == 0,
            WindTest::NonZero => w != 0,
            WindTest::Positive => w > 0,
            WindTest::Negative => w < 0,
            WindTest::NonPositive => w <= 0,
            WindTest::NonNegative => w >= 0,
            WindTest::PlusOne => w == 1,
            WindTest::MinusOne => w == -1,
            WindTest::AbsOne => w.abs() == 1,
        }
    }
}

use WindTest::*;

fn clip_idx(ct: ClipType) -> usize {
    match ct {
        ClipType::NoClip => 0,
        ClipType::Intersection => 1,
        ClipType::Union => 2,
        ClipType::Difference => 3,
        ClipType::Xor => 4,
    }
}

fn fill_idx(fr: FillRule) -> usize {
    match fr {
        FillRule::EvenOdd => 0,
        FillRule::NonZero => 1,
        FillRule::Positive => 2,
        FillRule::Negative => 3,
    }
}

fn path_idx(pt: PathType) -> usize {
    match pt {
        PathType::Subject => 0,
        PathType::Clip => 1,
    }
}

/// The test on an edge's own winding count: is it on the boundary of its own
/// path type's filled region?
const CLOSED_WIND: [WindTest; 4] = [Always, AbsOne, PlusOne, MinusOne];

/// The test on the other path type's winding count, indexed by
/// `[clip type][fill rule][path type]`.
const CLOSED_WIND2: [[[WindTest; 2]; 4]; 5] = [
    // NoClip
    [[Never; 2]; 4],
    // Intersection
    [
        [NonZero, NonZero],
        [NonZero, NonZero],
        [Positive, Positive],
        [Negative, Negative],
    ],
    // Union
    [
        [Zero, Zero],
        [Zero, Zero],
        [NonPositive, NonPositive],
        [NonNegative, NonNegative],
    ],
    // Difference: clip edges contribute exactly where subject edges don't.
    [
        [Zero, NonZero],
        [Zero, NonZero],
        [NonPositive, Positive],
        [NonNegative, Negative],
    ],
    // Xor
    [[Always; 2]; 4],
];

/// Is a winding count "inside" under each fill rule?
const INSIDE: [WindTest; 4] = [NonZero, NonZero, Positive, Negative];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpenRule {
    InsideClip,
    OutsideBoth,
    OutsideClip,
}

/// Open paths are kept where they pass through the region selected here,
/// indexed by clip type.
const OPEN: [OpenRule; 5] = [
    OpenRule::OutsideClip,
    OpenRule::InsideClip,
    OpenRule::OutsideBoth,
    OpenRule::OutsideClip,
    OpenRule::OutsideClip,
];

/// How the two edges' tests combine when two cold edges of the same path
/// type cross.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Both {
    All,
    Any,
}

/// When two cold edges of the same path type cross, does a new output ring
/// start there? Tested on each edge's oriented `wind_count2`, indexed by
/// `[clip type][path type]`.
const CROSSING_MIN: [[(WindTest, Both); 2]; 5] = [
    // NoClip
    [(Never, Both::All); 2],
    // Intersection
    [(Positive, Both::All); 2],
    // Union
    [(NonPositive, Both::Any); 2],
    // Difference
    [(NonPositive, Both::All), (Positive, Both::All)],
    // Xor
    [(Always, Both::All); 2],
];

/// Do two cold, same-type closed edges crossing with these oriented
/// `wind_count2` values start a new output ring?
pub(crate) fn is_crossing_min(
    clip_type: ClipType,
    polytype: PathType,
    e1_wc2: i32,
    e2_wc2: i32,
) -> bool {
    let (test, both) = CROSSING_MIN[clip_idx(clip_type)][path_idx(polytype)];
    match both {
        Both::All => test.test(e1_wc2) && test.test(e2_wc2),
        Both::Any => test.test(e1_wc2) || test.test(e2_wc2),
    }
}

/// Does a closed edge with these winding counts bound the output?
pub(crate) fn is_contributing_closed(
    clip_type: ClipType,
    fill_rule: FillRule,
    polytype: PathType,
    wind_count: i32,
    wind_count2: i32,
) -> bool {
    CLOSED_WIND[fill_idx(fill_rule)].test(wind_count)
        && CLOSED_WIND2[clip_idx(clip_type)][fill_idx(fill_rule)][path_idx(polytype)]
            .test(wind_count2)
}

/// Does an open edge with these winding counts lie in the output?
///
/// For open edges, `wind_count` counts closed subject edges to the left and
/// `wind_count2` counts clip edges.
pub(crate) fn is_contributing_open(
    clip_type: ClipType,
    fill_rule: FillRule,
    wind_count: i32,
    wind_count2: i32,
) -> bool {
    let inside = INSIDE[fill_idx(fill_rule)];
    let in_subj = inside.test(wind_count);
    let in_clip = inside.test(wind_count2);
    match OPEN[clip_idx(clip_type)] {
        OpenRule::InsideClip => in_clip,
        OpenRule::OutsideBoth => !in_subj && !in_clip,
        OpenRule::OutsideClip => !in_clip,
    }
}

/// Maps a winding count onto the scale where `0` and `1` are the boundary
/// values for `fill_rule`.
pub(crate) fn oriented_count(fill_rule: FillRule, count: i32) -> i32 {
    match fill_rule {
        FillRule::Positive => count,
        FillRule::Negative => -count,
        FillRule::EvenOdd | FillRule::NonZero => count.abs(),
    }
}

/// Is this closed-edge winding count exactly on the filled side's boundary?
///
/// Used when an open path crosses a closed edge.
pub(crate) fn is_unit_wind_count(fill_rule: FillRule, count: i32) -> bool {
    match fill_rule {
        FillRule::Positive => count == 1,
        FillRule::Negative => count == -1,
        FillRule::EvenOdd | FillRule::NonZero => count.abs() == 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIP_TYPES: [ClipType; 5] = [
        ClipType::NoClip,
        ClipType::Intersection,
        ClipType::Union,
        ClipType::Difference,
        ClipType::Xor,
    ];
    const FILL_RULES: [FillRule; 4] = [
        FillRule::EvenOdd,
        FillRule::NonZero,
        FillRule::Positive,
        FillRule::Negative,
    ];
    const PATH_TYPES: [PathType; 2] = [PathType::Subject, PathType::Clip];

    // The rules written out as nested conditionals.
    fn closed_reference(ct: ClipType, fr: FillRule, pt: PathType, wc: i32, wc2: i32) -> bool {
        match fr {
            FillRule::Positive if wc != 1 => return false,
            FillRule::Negative if wc != -1 => return false,
            FillRule::NonZero if wc.abs() != 1 => return false,
            _ => {}
        }
        let outside_other = match fr {
            FillRule::Positive => wc2 <= 0,
            FillRule::Negative => wc2 >= 0,
            _ => wc2 == 0,
        };
        match ct {
            ClipType::Intersection => match fr {
                FillRule::Positive => wc2 > 0,
                FillRule::Negative => wc2 < 0,
                _ => wc2 != 0,
            },
            ClipType::Union => outside_other,
            ClipType::Difference => (pt == PathType::Subject) == outside_other,
            ClipType::Xor => true,
            ClipType::NoClip => false,
        }
    }

    fn open_reference(ct: ClipType, fr: FillRule, wc: i32, wc2: i32) -> bool {
        let (in_subj, in_clip) = match fr {
            FillRule::Positive => (wc > 0, wc2 > 0),
            FillRule::Negative => (wc < 0, wc2 < 0),
            _ => (wc != 0, wc2 != 0),
        };
        match ct {
            ClipType::Intersection => in_clip,
            ClipType::Union => !in_subj && !in_clip,
            _ => !in_clip,
        }
    }

    fn crossing_min_reference(ct: ClipType, pt: PathType, e1_wc2: i32, e2_wc2: i32) -> bool {
        match ct {
            ClipType::Union => e1_wc2 <= 0 || e2_wc2 <= 0,
            ClipType::Difference => match pt {
                PathType::Clip => e1_wc2 > 0 && e2_wc2 > 0,
                PathType::Subject => e1_wc2 <= 0 && e2_wc2 <= 0,
            },
            ClipType::Xor => true,
            ClipType::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
            ClipType::NoClip => false,
        }
    }

    #[test]
    fn tables_match_reference_rules() {
        let counts = [-3, -2, -1, 0, 1, 2, 3];
        for ct in CLIP_TYPES {
            for fr in FILL_RULES {
                for wc in counts {
                    for wc2 in counts {
                        for pt in PATH_TYPES {
                            assert_eq!(
                                is_contributing_closed(ct, fr, pt, wc, wc2),
                                closed_reference(ct, fr, pt, wc, wc2),
                                "{ct:?} {fr:?} {pt:?} wc={wc} wc2={wc2}"
                            );
                        }
                        for pt in PATH_TYPES {
                            assert_eq!(
                                is_crossing_min(ct, pt, wc, wc2),
                                crossing_min_reference(ct, pt, wc, wc2),
                                "{ct:?} {pt:?} crossing e1_wc2={wc} e2_wc2={wc2}"
                            );
                        }
                        assert_eq!(
                            is_contributing_open(ct, fr, wc, wc2),
                            open_reference(ct, fr, wc, wc2),
                            "{ct:?} {fr:?} open wc={wc} wc2={wc2}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn hand_picked_closed() {
        use ClipType::*;
        use FillRule::*;
        use PathType::*;

        // Outer edge of a lone subject square.
        assert!(is_contributing_closed(Union, NonZero, Subject, 1, 0));
        assert!(!is_contributing_closed(Intersection, NonZero, Subject, 1, 0));
        assert!(is_contributing_closed(Difference, NonZero, Subject, 1, 0));
        assert!(is_contributing_closed(Xor, NonZero, Subject, 1, 0));

        // A subject edge inside the clip.
        assert!(!is_contributing_closed(Union, NonZero, Subject, 1, 1));
        assert!(is_contributing_closed(Intersection, NonZero, Subject, 1, 1));
        assert!(!is_contributing_closed(Difference, NonZero, Subject, 1, 1));
        assert!(is_contributing_closed(Difference, NonZero, Clip, 1, 1));
        assert!(!is_contributing_closed(Difference, NonZero, Clip, 1, 0));

        // Nested subject edges aren't boundaries under NonZero, but are
        // under EvenOdd.
        assert!(!is_contributing_closed(Union, NonZero, Subject, 2, 0));
        assert!(is_contributing_closed(Union, EvenOdd, Subject, 2, 0));

        // Orientation matters for Positive and Negative.
        assert!(is_contributing_closed(Union, Positive, Subject, 1, -1));
        assert!(!is_contributing_closed(Union, Positive, Subject, -1, 0));
        assert!(is_contributing_closed(Union, Negative, Subject, -1, 1));
        assert!(!is_contributing_closed(Intersection, Negative, Clip, -1, 1));

        for fr in FILL_RULES {
            for pt in PATH_TYPES {
                assert!(!is_contributing_closed(NoClip, fr, pt, 1, 0));
            }
        }
    }

    #[test]
    fn hand_picked_open() {
        use ClipType::*;
        use FillRule::*;

        assert!(is_contributing_open(Intersection, NonZero, 0, 1));
        assert!(!is_contributing_open(Intersection, NonZero, 1, 0));
        assert!(is_contributing_open(Union, NonZero, 0, 0));
        assert!(!is_contributing_open(Union, NonZero, 1, 0));
        assert!(is_contributing_open(Difference, EvenOdd, 1, 0));
        assert!(!is_contributing_open(Difference, Positive, 0, 2));
        assert!(is_contributing_open(Difference, Positive, 0, -2));
    }

    #[test]
    fn oriented_counts() {
        assert_eq!(oriented_count(FillRule::Positive, -2), -2);
        assert_eq!(oriented_count(FillRule::Negative, -2), 2);
        assert_eq!(oriented_count(FillRule::NonZero, -2), 2);
        assert!(is_unit_wind_count(FillRule::EvenOdd, -1));
        assert!(!is_unit_wind_count(FillRule::Positive, -1));
    }
}
