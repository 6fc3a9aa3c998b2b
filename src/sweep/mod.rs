//! The Vatti sweep.
//!
//! The sweep line moves from the largest `y` towards the smallest, stopping at
//! every "scanline": the `y` coordinate of a local minimum or of the top of an
//! edge. Between two scanlines (a "scanbeam") the set of edges crossing the
//! sweep line only changes through intersections, which are found and
//! processed in bulk at the top of each scanbeam.
//!
//! All of the mutable state lives in [`SweepState`]. Edges, output points and
//! output records are stored in arenas and link to each other by index.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::geom::Point64;
use crate::vertex::{LocalMinima, Vertex, VertexFlags, VertexIdx, VertexVec};
use crate::{ClipType, FillRule};

pub(crate) mod active;
pub(crate) mod build;
pub(crate) mod contribution;
pub(crate) mod horizontal;
pub(crate) mod intersect;
pub(crate) mod output;

/// An index into an [`ActiveVec`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct ActiveIdx(pub usize);

/// The arena of active edges.
pub(crate) struct ActiveVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(ActiveVec, ActiveIdx, "ae");

/// An index into an [`OutPtVec`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct OutPtIdx(pub usize);

/// The arena of output points.
pub(crate) struct OutPtVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(OutPtVec, OutPtIdx, "op");

/// An index into an [`OutRecVec`].
///
/// Output records are numbered in creation order, and that order is used to
/// decide which of two records survives a join.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct OutRecIdx(pub usize);

/// The arena of output records.
pub(crate) struct OutRecVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(OutRecVec, OutRecIdx, "or");

/// Whether an edge has been provisionally merged with a neighbor.
///
/// When two hot edges become collinear and touch, their output records are
/// joined immediately; the edges remember the join so that it can be undone
/// (by splitting off a new output record) if they diverge again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum JoinWith {
    #[default]
    None,
    Left,
    Right,
}

/// An edge crossing the sweep line.
#[derive(Clone, Debug)]
pub(crate) struct Active {
    pub bot: Point64,
    pub top: Point64,
    /// The `x` coordinate at the current scanline.
    pub cur_x: i64,
    /// Horizontal change per unit of `y` (infinite for horizontal edges).
    pub dx: f64,
    /// `1` if the edge follows its path forwards, `-1` otherwise.
    pub wind_dx: i32,
    pub wind_count: i32,
    pub wind_count2: i32,
    pub outrec: Option<OutRecIdx>,
    pub prev_in_ael: Option<ActiveIdx>,
    pub next_in_ael: Option<ActiveIdx>,
    pub prev_in_sel: Option<ActiveIdx>,
    pub next_in_sel: Option<ActiveIdx>,
    pub jump: Option<ActiveIdx>,
    pub vertex_top: VertexIdx,
    pub local_min: LocalMinima,
    pub is_left_bound: bool,
    pub join_with: JoinWith,
}

impl Active {
    fn new(vertices: &VertexVec<Vertex>, local_min: LocalMinima, wind_dx: i32) -> Active {
        let v = &vertices[local_min.vertex];
        let vertex_top = if wind_dx > 0 { v.next } else { v.prev };
        let mut ae = Active {
            bot: v.pt,
            top: vertices[vertex_top].pt,
            cur_x: v.pt.x,
            dx: 0.0,
            wind_dx,
            wind_count: 0,
            wind_count2: 0,
            outrec: None,
            prev_in_ael: None,
            next_in_ael: None,
            prev_in_sel: None,
            next_in_sel: None,
            jump: None,
            vertex_top,
            local_min,
            is_left_bound: false,
            join_with: JoinWith::None,
        };
        ae.set_dx();
        ae
    }
}

/// A point in an output ring.
#[derive(Clone, Debug)]
pub(crate) struct OutPt {
    pub pt: Point64,
    pub next: OutPtIdx,
    pub prev: OutPtIdx,
    pub outrec: OutRecIdx,
    /// Is this point already the left end of a pending horizontal segment?
    pub horz: bool,
}

/// An output contour under construction.
///
/// A record with no points is "dead": its contour was merged into another
/// record, which can be found by following `owner` links.
#[derive(Clone, Debug, Default)]
pub(crate) struct OutRec {
    pub owner: Option<OutRecIdx>,
    pub front_edge: Option<ActiveIdx>,
    pub back_edge: Option<ActiveIdx>,
    pub pts: Option<OutPtIdx>,
    pub polypath: Option<crate::poly_tree::PolyPathIdx>,
    pub bounds: crate::geom::Rect64,
    pub path: crate::paths::Path64,
    pub is_open: bool,
    pub splits: Vec<OutRecIdx>,
    pub recursive_split: Option<OutRecIdx>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct IntersectNode {
    pub pt: Point64,
    pub edge1: ActiveIdx,
    pub edge2: ActiveIdx,
}

/// A horizontal run of output points, waiting to be matched against other
/// runs at the same `y`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HorzSegment {
    pub left_op: OutPtIdx,
    pub right_op: Option<OutPtIdx>,
    pub left_to_right: bool,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct HorzJoin {
    pub op1: OutPtIdx,
    pub op2: OutPtIdx,
}

/// Options that affect how output is built.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SweepOptions {
    pub preserve_collinear: bool,
    pub reverse_solution: bool,
    pub has_open_paths: bool,
    pub using_polytree: bool,
}

/// Everything that changes while sweeping.
pub(crate) struct SweepState<'a> {
    vertices: &'a VertexVec<Vertex>,
    /// Sorted by decreasing `y`.
    minima: &'a [LocalMinima],
    current_loc_min: usize,
    pub(crate) opts: SweepOptions,
    clip_type: ClipType,
    fill_rule: FillRule,
    pub(crate) succeeded: bool,

    actives: ActiveVec<Active>,
    /// The leftmost edge in the active edge list.
    ael_head: Option<ActiveIdx>,
    /// The head of the sorted edge list, which doubles as the queue of
    /// horizontal edges waiting to be processed.
    sel: Option<ActiveIdx>,
    scanlines: BTreeSet<i64>,
    current_bot_y: i64,
    intersect_list: Vec<IntersectNode>,

    pub(crate) outpts: OutPtVec<OutPt>,
    pub(crate) outrecs: OutRecVec<OutRec>,
    horz_seg_list: Vec<HorzSegment>,
    horz_join_list: Vec<HorzJoin>,
}

impl<'a> SweepState<'a> {
    pub fn new(
        vertices: &'a VertexVec<Vertex>,
        minima: &'a [LocalMinima],
        opts: SweepOptions,
    ) -> Self {
        SweepState {
            vertices,
            minima,
            current_loc_min: 0,
            opts,
            clip_type: ClipType::NoClip,
            fill_rule: FillRule::EvenOdd,
            succeeded: true,
            actives: ActiveVec::with_capacity(minima.len() * 2),
            ael_head: None,
            sel: None,
            scanlines: BTreeSet::new(),
            current_bot_y: 0,
            intersect_list: Vec::new(),
            outpts: OutPtVec::default(),
            outrecs: OutRecVec::default(),
            horz_seg_list: Vec::new(),
            horz_join_list: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.scanlines = self
            .minima
            .iter()
            .map(|lm| self.vertices[lm.vertex].pt.y)
            .collect();
        self.current_bot_y = 0;
        self.current_loc_min = 0;
        self.ael_head = None;
        self.sel = None;
        self.succeeded = true;
    }

    fn insert_scanline(&mut self, y: i64) {
        self.scanlines.insert(y);
    }

    /// The next scanline, in order of decreasing `y`.
    fn pop_scanline(&mut self) -> Option<i64> {
        self.scanlines.pop_last()
    }

    fn has_loc_min_at_y(&self, y: i64) -> bool {
        self.minima
            .get(self.current_loc_min)
            .is_some_and(|lm| self.vertices[lm.vertex].pt.y == y)
    }

    fn push_horz(&mut self, ae: ActiveIdx) {
        self.actives[ae].next_in_sel = self.sel;
        self.sel = Some(ae);
    }

    fn pop_horz(&mut self) -> Option<ActiveIdx> {
        let ae = self.sel?;
        self.sel = self.actives[ae].next_in_sel;
        Some(ae)
    }

    /// Runs the sweep to completion.
    ///
    /// On return, `succeeded` tells whether the output records can be trusted.
    pub fn execute_internal(&mut self, clip_type: ClipType, fill_rule: FillRule) {
        if clip_type == ClipType::NoClip {
            return;
        }
        self.clip_type = clip_type;
        self.fill_rule = fill_rule;
        self.reset();
        debug!(
            ?clip_type,
            ?fill_rule,
            minima = self.minima.len(),
            scanlines = self.scanlines.len(),
            "starting sweep"
        );

        let Some(mut y) = self.pop_scanline() else {
            return;
        };
        while self.succeeded {
            trace!(y, "scanline");
            self.insert_local_minima_into_ael(y);
            while let Some(ae) = self.pop_horz() {
                self.do_horizontal(ae);
            }
            if !self.horz_seg_list.is_empty() {
                self.convert_horz_segs_to_joins();
                self.horz_seg_list.clear();
            }
            self.current_bot_y = y;
            let Some(next_y) = self.pop_scanline() else {
                break;
            };
            y = next_y;
            self.do_intersections(y);
            self.do_top_of_scanbeam(y);
            while let Some(ae) = self.pop_horz() {
                self.do_horizontal(ae);
            }
            #[cfg(feature = "slow-asserts")]
            self.check_invariants();
        }

        if self.succeeded {
            self.process_horz_joins();
            debug!(outrecs = self.outrecs.len(), "sweep finished");
        } else {
            warn!(y, "sweep aborted: two front edges met at a local maximum");
        }
    }

    fn insert_local_minima_into_ael(&mut self, bot_y: i64) {
        while self.has_loc_min_at_y(bot_y) {
            let local_min = self.minima[self.current_loc_min];
            self.current_loc_min += 1;
            let flags = self.vertices[local_min.vertex].flags;

            let left = (!flags.contains(VertexFlags::OPEN_START))
                .then(|| Active::new(self.vertices, local_min, -1));
            let right = (!flags.contains(VertexFlags::OPEN_END))
                .then(|| Active::new(self.vertices, local_min, 1));

            // The left bound must really be on the left.
            let (mut left_bound, right_bound) = match (left, right) {
                (Some(l), Some(r)) => {
                    let swap = if l.is_horizontal() {
                        l.is_heading_right_horz()
                    } else if r.is_horizontal() {
                        r.is_heading_left_horz()
                    } else {
                        l.dx < r.dx
                    };
                    if swap {
                        (r, Some(l))
                    } else {
                        (l, Some(r))
                    }
                }
                (Some(l), None) => (l, None),
                (None, Some(r)) => (r, None),
                (None, None) => continue,
            };

            left_bound.is_left_bound = true;
            let left_bound = self.actives.push(left_bound);
            self.insert_left_edge(left_bound);

            let contributing = if self.actives[left_bound].local_min.is_open {
                self.set_wind_count_for_open_path_edge(left_bound);
                let ae = &self.actives[left_bound];
                contribution::is_contributing_open(
                    self.clip_type,
                    self.fill_rule,
                    ae.wind_count,
                    ae.wind_count2,
                )
            } else {
                self.set_wind_count_for_closed_path_edge(left_bound);
                self.is_contributing_closed(left_bound)
            };

            if let Some(mut right_bound) = right_bound {
                right_bound.wind_count = self.actives[left_bound].wind_count;
                right_bound.wind_count2 = self.actives[left_bound].wind_count2;
                let right_bound = self.actives.push(right_bound);
                self.insert_right_edge(left_bound, right_bound);

                if contributing {
                    let bot = self.actives[left_bound].bot;
                    self.add_local_min_poly(left_bound, right_bound, bot, true);
                    if !self.actives[left_bound].is_horizontal() {
                        self.check_join_left(left_bound, bot, false);
                    }
                }

                while let Some(next) = self.actives[right_bound].next_in_ael {
                    if !self.is_valid_ael_order(next, right_bound) {
                        break;
                    }
                    let bot = self.actives[right_bound].bot;
                    self.intersect_edges(right_bound, next, bot);
                    self.swap_positions_in_ael(right_bound, next);
                }

                if self.actives[right_bound].is_horizontal() {
                    self.push_horz(right_bound);
                } else {
                    let bot = self.actives[right_bound].bot;
                    self.check_join_right(right_bound, bot, false);
                    self.insert_scanline(self.actives[right_bound].top.y);
                }
            } else if contributing {
                let bot = self.actives[left_bound].bot;
                self.start_open_path(left_bound, bot);
            }

            if self.actives[left_bound].is_horizontal() {
                self.push_horz(left_bound);
            } else {
                self.insert_scanline(self.actives[left_bound].top.y);
            }
        }
    }

    fn is_contributing_closed(&self, ae: ActiveIdx) -> bool {
        let ae = &self.actives[ae];
        contribution::is_contributing_closed(
            self.clip_type,
            self.fill_rule,
            ae.local_min.polytype,
            ae.wind_count,
            ae.wind_count2,
        )
    }

    fn do_top_of_scanbeam(&mut self, y: i64) {
        // The SEL is reused as the queue of horizontals.
        self.sel = None;
        let mut ae = self.ael_head;
        while let Some(e) = ae {
            // `e` is never horizontal here.
            if self.actives[e].top.y == y {
                self.actives[e].cur_x = self.actives[e].top.x;
                if self.is_maxima(e) {
                    ae = self.do_maxima(e);
                    continue;
                }
                // An intermediate vertex.
                if self.is_hot(e) {
                    let top = self.actives[e].top;
                    self.add_out_pt(e, top);
                }
                self.update_edge_into_ael(e);
                if self.actives[e].is_horizontal() {
                    self.push_horz(e);
                }
            } else {
                self.actives[e].cur_x = self.actives[e].top_x(y);
            }
            ae = self.actives[e].next_in_ael;
        }
    }

    /// Finishes an edge at the top of its bound, returning the next edge to
    /// visit.
    fn do_maxima(&mut self, ae: ActiveIdx) -> Option<ActiveIdx> {
        let prev_e = self.actives[ae].prev_in_ael;
        let mut next_e = self.actives[ae].next_in_ael;

        if self.is_open_end(ae) {
            if self.is_hot(ae) {
                let top = self.actives[ae].top;
                self.add_out_pt(ae, top);
            }
            if !self.actives[ae].is_horizontal() {
                if self.is_hot(ae) {
                    self.detach_open_end(ae);
                }
                self.delete_from_ael(ae);
            }
            return next_e;
        }

        // A horizontal maxima pair is dealt with by `do_horizontal`.
        let Some(max_pair) = self.get_maxima_pair(ae) else {
            return next_e;
        };

        if self.actives[ae].join_with != JoinWith::None {
            let top = self.actives[ae].top;
            self.split(ae, top);
        }
        if self.actives[max_pair].join_with != JoinWith::None {
            let top = self.actives[max_pair].top;
            self.split(max_pair, top);
        }

        // Process any edges between the maxima pair.
        while let Some(n) = next_e {
            if n == max_pair {
                break;
            }
            let top = self.actives[ae].top;
            self.intersect_edges(ae, n, top);
            self.swap_positions_in_ael(ae, n);
            next_e = self.actives[ae].next_in_ael;
        }

        let top = self.actives[ae].top;
        if self.is_hot(ae) {
            self.add_local_max_poly(ae, max_pair, top);
        }
        if self.actives[ae].local_min.is_open {
            self.delete_from_ael(max_pair);
            self.delete_from_ael(ae);
        } else {
            self.delete_from_ael(ae);
            self.delete_from_ael(max_pair);
        }
        match prev_e {
            Some(p) => self.actives[p].next_in_ael,
            None => self.ael_head,
        }
    }

    /// Moves an edge on to the next edge of its bound.
    fn update_edge_into_ael(&mut self, ae: ActiveIdx) {
        let next_v = self.next_vertex(ae);
        let e = &mut self.actives[ae];
        e.bot = e.top;
        e.vertex_top = next_v;
        e.top = self.vertices[next_v].pt;
        e.cur_x = e.bot.x;
        e.set_dx();

        if e.join_with != JoinWith::None {
            let bot = e.bot;
            self.split(ae, bot);
        }

        if self.actives[ae].is_horizontal() {
            if !self.actives[ae].local_min.is_open {
                self.trim_horz(ae);
            }
            return;
        }
        self.insert_scanline(self.actives[ae].top.y);
        let bot = self.actives[ae].bot;
        self.check_join_left(ae, bot, false);
        self.check_join_right(ae, bot, true);
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&mut self) {
        let mut prev = None;
        let mut ae = self.ael_head;
        while let Some(e) = ae {
            assert_eq!(self.actives[e].prev_in_ael, prev, "broken AEL link at {e:?}");
            prev = Some(e);
            ae = self.actives[e].next_in_ael;
        }
        for idx in self.outrecs.indices() {
            let mut seen = 0;
            let mut o = self.outrecs[idx].owner;
            while let Some(or) = o {
                seen += 1;
                assert!(seen <= self.outrecs.len(), "owner cycle through {idx:?}");
                o = self.outrecs[or].owner;
            }
        }
    }
}
