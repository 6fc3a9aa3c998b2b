//! Output records and the rings of points they own.
//!
//! Each [`OutRec`] holds a circular doubly-linked ring of [`OutPt`]s. While a
//! record is still growing, two hot edges are attached to it: points added by
//! the front edge go after `pts`, and points added by the back edge go before
//! it, so that `pts` is always the most recent front point and `pts.next` the
//! most recent back point.

use crate::geom::{
    cross_product, dot_product, is_collinear, perpendic_dist_from_line_sqr,
    path2_contains_path1, segment_intersect_point, segments_intersect, Point64,
    PointInPolygonResult,
};
use crate::paths::Path64;

use super::{ActiveIdx, JoinWith, OutPt, OutPtIdx, OutRec, OutRecIdx, SweepState};

impl SweepState<'_> {
    pub(super) fn new_outrec(&mut self) -> OutRecIdx {
        self.outrecs.push(OutRec::default())
    }

    /// Allocates a single-point ring.
    pub(super) fn new_outpt(&mut self, pt: Point64, outrec: OutRecIdx) -> OutPtIdx {
        let idx = self.outpts.next_idx();
        self.outpts.push(OutPt {
            pt,
            next: idx,
            prev: idx,
            outrec,
            horz: false,
        })
    }

    /// Follows owner links from `outrec` to the nearest record that still
    /// has points.
    ///
    /// Owner links are left as they are: the poly-tree builder walks them to
    /// decide nesting.
    pub(crate) fn find_live(&self, outrec: Option<OutRecIdx>) -> Option<OutRecIdx> {
        let mut cur = outrec;
        while let Some(or) = cur {
            if self.outrecs[or].pts.is_some() {
                break;
            }
            cur = self.outrecs[or].owner;
        }
        cur
    }

    fn set_sides(&mut self, outrec: OutRecIdx, front: ActiveIdx, back: ActiveIdx) {
        self.outrecs[outrec].front_edge = Some(front);
        self.outrecs[outrec].back_edge = Some(back);
    }

    /// Is the output record's front edge `hot_edge`?
    fn outrec_is_ascending(&self, hot_edge: ActiveIdx) -> bool {
        self.is_front(hot_edge)
    }

    /// Adds `pt` to the end of the output ring that `ae` is building.
    pub(super) fn add_out_pt(&mut self, ae: ActiveIdx, pt: Point64) -> Option<OutPtIdx> {
        let outrec = self.actives[ae].outrec?;
        let to_front = self.is_front(ae);
        let op_front = self.outrecs[outrec].pts?;
        let op_back = self.outpts[op_front].next;

        if to_front && pt == self.outpts[op_front].pt {
            return Some(op_front);
        } else if !to_front && pt == self.outpts[op_back].pt {
            return Some(op_back);
        }

        let new_op = self.new_outpt(pt, outrec);
        self.outpts[op_back].prev = new_op;
        self.outpts[new_op].prev = op_front;
        self.outpts[new_op].next = op_back;
        self.outpts[op_front].next = new_op;
        if to_front {
            self.outrecs[outrec].pts = Some(new_op);
        }
        Some(new_op)
    }

    /// Starts a new output record at a local minimum of the output.
    pub(super) fn add_local_min_poly(
        &mut self,
        ae1: ActiveIdx,
        ae2: ActiveIdx,
        pt: Point64,
        is_new: bool,
    ) -> OutPtIdx {
        let outrec = self.new_outrec();
        self.actives[ae1].outrec = Some(outrec);
        self.actives[ae2].outrec = Some(outrec);

        if self.actives[ae1].is_open() {
            self.outrecs[outrec].owner = None;
            self.outrecs[outrec].is_open = true;
            if self.actives[ae1].wind_dx > 0 {
                self.set_sides(outrec, ae1, ae2);
            } else {
                self.set_sides(outrec, ae2, ae1);
            }
        } else if let Some(prev_hot) = self.get_prev_hot_edge(ae1) {
            // Edge directions come from the input paths. Output orientation
            // is decided here by choosing which edge is in front.
            let prev_outrec = self.actives[prev_hot].outrec;
            if let Some(prev_outrec) = prev_outrec {
                if self.opts.using_polytree {
                    self.set_owner(outrec, prev_outrec);
                }
            }
            self.outrecs[outrec].owner = prev_outrec;
            if self.outrec_is_ascending(prev_hot) == is_new {
                self.set_sides(outrec, ae2, ae1);
            } else {
                self.set_sides(outrec, ae1, ae2);
            }
        } else {
            self.outrecs[outrec].owner = None;
            if is_new {
                self.set_sides(outrec, ae1, ae2);
            } else {
                self.set_sides(outrec, ae2, ae1);
            }
        }

        let op = self.new_outpt(pt, outrec);
        self.outrecs[outrec].pts = Some(op);
        op
    }

    /// Closes off output at a local maximum of the output.
    ///
    /// If the two edges belong to different records, the records are joined.
    pub(super) fn add_local_max_poly(
        &mut self,
        ae1: ActiveIdx,
        ae2: ActiveIdx,
        pt: Point64,
    ) -> Option<OutPtIdx> {
        if self.is_joined(ae1) {
            self.split(ae1, pt);
        }
        if self.is_joined(ae2) {
            self.split(ae2, pt);
        }

        if self.is_front(ae1) == self.is_front(ae2) {
            if self.is_open_end(ae1) {
                let or = self.actives[ae1].outrec?;
                self.swap_front_back_sides(or);
            } else if self.is_open_end(ae2) {
                let or = self.actives[ae2].outrec?;
                self.swap_front_back_sides(or);
            } else {
                self.succeeded = false;
                return None;
            }
        }

        let result = self.add_out_pt(ae1, pt);
        let or1 = self.actives[ae1].outrec?;
        let or2 = self.actives[ae2].outrec?;
        if or1 == or2 {
            self.outrecs[or1].pts = result;
            if self.opts.using_polytree {
                // Not necessarily the real owner; the poly-tree builder
                // checks containment again.
                match self.get_prev_hot_edge(ae1).and_then(|e| self.actives[e].outrec) {
                    None => self.outrecs[or1].owner = None,
                    Some(owner) => self.set_owner(or1, owner),
                }
            }
            self.uncouple_outrec(ae1);
        } else if self.actives[ae1].is_open() {
            // Preserve the open path's direction.
            if self.actives[ae1].wind_dx < 0 {
                self.join_outrec_paths(ae1, ae2);
            } else {
                self.join_outrec_paths(ae2, ae1);
            }
        } else if or1 < or2 {
            self.join_outrec_paths(ae1, ae2);
        } else {
            self.join_outrec_paths(ae2, ae1);
        }
        result
    }

    /// Appends `ae2`'s ring onto `ae1`'s, leaving `ae2`'s record dead.
    pub(super) fn join_outrec_paths(&mut self, ae1: ActiveIdx, ae2: ActiveIdx) {
        let (Some(or1), Some(or2)) = (self.actives[ae1].outrec, self.actives[ae2].outrec) else {
            return;
        };
        let (Some(p1_start), Some(p2_start)) = (self.outrecs[or1].pts, self.outrecs[or2].pts)
        else {
            return;
        };
        let p1_end = self.outpts[p1_start].next;
        let p2_end = self.outpts[p2_start].next;

        if self.is_front(ae1) {
            self.outpts[p2_end].prev = p1_start;
            self.outpts[p1_start].next = p2_end;
            self.outpts[p2_start].next = p1_end;
            self.outpts[p1_end].prev = p2_start;
            self.outrecs[or1].pts = Some(p2_start);
            // For open paths, ae1 and ae2 are a maxima pair.
            let front = self.outrecs[or2].front_edge;
            self.outrecs[or1].front_edge = front;
            if let Some(f) = front {
                self.actives[f].outrec = Some(or1);
            }
        } else {
            self.outpts[p1_end].prev = p2_start;
            self.outpts[p2_start].next = p1_end;
            self.outpts[p1_start].next = p2_end;
            self.outpts[p2_end].prev = p1_start;
            let back = self.outrecs[or2].back_edge;
            self.outrecs[or1].back_edge = back;
            if let Some(b) = back {
                self.actives[b].outrec = Some(or1);
            }
        }

        self.outrecs[or2].front_edge = None;
        self.outrecs[or2].back_edge = None;
        self.outrecs[or2].pts = None;
        self.set_owner(or2, or1);

        if self.is_open_end(ae1) {
            self.outrecs[or2].pts = self.outrecs[or1].pts;
            self.outrecs[or1].pts = None;
        }

        // Both edges are about to leave the AEL.
        self.actives[ae1].outrec = None;
        self.actives[ae2].outrec = None;
    }

    /// Makes `new_owner` the owner of `outrec`, without creating a cycle.
    pub(super) fn set_owner(&mut self, outrec: OutRecIdx, new_owner: OutRecIdx) {
        let owner = self.outrecs[new_owner].owner;
        self.outrecs[new_owner].owner = self.find_live(owner);

        let mut tmp = Some(new_owner);
        while let Some(t) = tmp {
            if t == outrec {
                break;
            }
            tmp = self.outrecs[t].owner;
        }
        if tmp.is_some() {
            self.outrecs[new_owner].owner = self.outrecs[outrec].owner;
        }
        self.outrecs[outrec].owner = Some(new_owner);
    }

    pub(super) fn swap_outrecs(&mut self, ae1: ActiveIdx, ae2: ActiveIdx) {
        let or1 = self.actives[ae1].outrec;
        let or2 = self.actives[ae2].outrec;
        if or1 == or2 {
            if let Some(or) = or1 {
                let rec = &mut self.outrecs[or];
                std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
            }
            return;
        }

        if let Some(or) = or1 {
            if self.outrecs[or].front_edge == Some(ae1) {
                self.outrecs[or].front_edge = Some(ae2);
            } else {
                self.outrecs[or].back_edge = Some(ae2);
            }
        }
        if let Some(or) = or2 {
            if self.outrecs[or].front_edge == Some(ae2) {
                self.outrecs[or].front_edge = Some(ae1);
            } else {
                self.outrecs[or].back_edge = Some(ae1);
            }
        }
        self.actives[ae1].outrec = or2;
        self.actives[ae2].outrec = or1;
    }

    /// Detaches both of a finished record's edges.
    fn uncouple_outrec(&mut self, ae: ActiveIdx) {
        let Some(or) = self.actives[ae].outrec else {
            return;
        };
        if let Some(f) = self.outrecs[or].front_edge.take() {
            self.actives[f].outrec = None;
        }
        if let Some(b) = self.outrecs[or].back_edge.take() {
            self.actives[b].outrec = None;
        }
    }

    fn swap_front_back_sides(&mut self, outrec: OutRecIdx) {
        // Only open paths get here.
        let rec = &mut self.outrecs[outrec];
        std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
        if let Some(pts) = rec.pts {
            rec.pts = Some(self.outpts[pts].next);
        }
    }

    pub(super) fn start_open_path(&mut self, ae: ActiveIdx, pt: Point64) -> OutPtIdx {
        let outrec = self.new_outrec();
        self.outrecs[outrec].is_open = true;
        if self.actives[ae].wind_dx > 0 {
            self.outrecs[outrec].front_edge = Some(ae);
        } else {
            self.outrecs[outrec].back_edge = Some(ae);
        }
        self.actives[ae].outrec = Some(outrec);
        let op = self.new_outpt(pt, outrec);
        self.outrecs[outrec].pts = Some(op);
        op
    }

    /// Stops an open path's edge from contributing, leaving its output where
    /// it is.
    pub(super) fn detach_open_end(&mut self, ae: ActiveIdx) {
        let Some(or) = self.actives[ae].outrec.take() else {
            return;
        };
        if self.outrecs[or].front_edge == Some(ae) {
            self.outrecs[or].front_edge = None;
        } else {
            self.outrecs[or].back_edge = None;
        }
    }

    /// Undoes a provisional join, starting a new output record at `pt`.
    pub(super) fn split(&mut self, e: ActiveIdx, pt: Point64) {
        if self.actives[e].join_with == JoinWith::Right {
            self.actives[e].join_with = JoinWith::None;
            if let Some(next) = self.actives[e].next_in_ael {
                self.actives[next].join_with = JoinWith::None;
                self.add_local_min_poly(e, next, pt, true);
            }
        } else {
            self.actives[e].join_with = JoinWith::None;
            if let Some(prev) = self.actives[e].prev_in_ael {
                self.actives[prev].join_with = JoinWith::None;
                self.add_local_min_poly(prev, e, pt, true);
            }
        }
    }

    /// Joins `e` to its left neighbor if the two are collinear and touch at
    /// `pt`.
    pub(super) fn check_join_left(&mut self, e: ActiveIdx, pt: Point64, check_curr_x: bool) {
        let Some(prev) = self.actives[e].prev_in_ael else {
            return;
        };
        if !self.joinable(e, prev, pt, check_curr_x) {
            return;
        }
        self.join_neighbors(prev, e, pt);
    }

    /// Joins `e` to its right neighbor if the two are collinear and touch at
    /// `pt`.
    pub(super) fn check_join_right(&mut self, e: ActiveIdx, pt: Point64, check_curr_x: bool) {
        let Some(next) = self.actives[e].next_in_ael else {
            return;
        };
        if !self.joinable(e, next, pt, check_curr_x) {
            return;
        }
        self.join_neighbors(e, next, pt);
    }

    fn joinable(&self, e: ActiveIdx, other: ActiveIdx, pt: Point64, check_curr_x: bool) -> bool {
        let ae = &self.actives[e];
        let ao = &self.actives[other];
        if !self.is_hot(e)
            || !self.is_hot(other)
            || ae.is_horizontal()
            || ao.is_horizontal()
            || ae.is_open()
            || ao.is_open()
        {
            return false;
        }
        // Avoid trivial joins.
        if (pt.y < ae.top.y + 2 || pt.y < ao.top.y + 2) && (ae.bot.y > pt.y || ao.bot.y > pt.y) {
            return false;
        }
        if check_curr_x {
            if perpendic_dist_from_line_sqr(pt, ao.bot, ao.top) > 0.25 {
                return false;
            }
        } else if ae.cur_x != ao.cur_x {
            return false;
        }
        is_collinear(ae.top, pt, ao.top)
    }

    /// Merges the records of two adjacent hot edges, `left` then `right`.
    fn join_neighbors(&mut self, left: ActiveIdx, right: ActiveIdx, pt: Point64) {
        let (Some(or_l), Some(or_r)) = (self.actives[left].outrec, self.actives[right].outrec)
        else {
            return;
        };
        if or_l == or_r {
            self.add_local_max_poly(left, right, pt);
        } else if or_l < or_r {
            self.join_outrec_paths(left, right);
        } else {
            self.join_outrec_paths(right, left);
        }
        self.actives[left].join_with = JoinWith::Right;
        self.actives[right].join_with = JoinWith::Left;
    }

    pub(super) fn fix_outrec_pts(&mut self, outrec: OutRecIdx) {
        let Some(start) = self.outrecs[outrec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.outpts[op].outrec = outrec;
            op = self.outpts[op].next;
            if op == start {
                break;
            }
        }
    }

    /// Inserts a copy of `op` into its ring, after it or before it.
    pub(super) fn duplicate_op(&mut self, op: OutPtIdx, insert_after: bool) -> OutPtIdx {
        let result = self.new_outpt(self.outpts[op].pt, self.outpts[op].outrec);
        if insert_after {
            let next = self.outpts[op].next;
            self.outpts[result].next = next;
            self.outpts[next].prev = result;
            self.outpts[result].prev = op;
            self.outpts[op].next = result;
        } else {
            let prev = self.outpts[op].prev;
            self.outpts[result].prev = prev;
            self.outpts[prev].next = result;
            self.outpts[result].next = op;
            self.outpts[op].prev = result;
        }
        result
    }

    /// Unlinks `op` from its ring, returning the next point (if any remain).
    fn dispose_outpt(&mut self, op: OutPtIdx) -> Option<OutPtIdx> {
        let OutPt { next, prev, .. } = self.outpts[op];
        self.outpts[prev].next = next;
        self.outpts[next].prev = prev;
        (next != op).then_some(next)
    }

    /// The signed area of a ring.
    pub(super) fn area_outpt(&self, op: OutPtIdx) -> f64 {
        let mut area = 0.0;
        let mut op2 = op;
        loop {
            let cur = &self.outpts[op2];
            let prev = self.outpts[cur.prev].pt;
            area += (prev.y + cur.pt.y) as f64 * (prev.x - cur.pt.x) as f64;
            op2 = cur.next;
            if op2 == op {
                break;
            }
        }
        area * 0.5
    }

    fn pts_really_close(pt1: Point64, pt2: Point64) -> bool {
        (pt1.x - pt2.x).abs() < 2 && (pt1.y - pt2.y).abs() < 2
    }

    /// A three-point ring with two of its points within a unit of each other.
    pub(super) fn is_very_small_triangle(&self, op: OutPtIdx) -> bool {
        let o = &self.outpts[op];
        let next = &self.outpts[o.next];
        let prev = &self.outpts[o.prev];
        next.next == o.prev
            && (Self::pts_really_close(prev.pt, next.pt)
                || Self::pts_really_close(o.pt, next.pt)
                || Self::pts_really_close(o.pt, prev.pt))
    }

    fn is_valid_closed_path(&self, op: Option<OutPtIdx>) -> bool {
        let Some(op) = op else {
            return false;
        };
        let o = &self.outpts[op];
        o.next != op && (o.next != o.prev || !self.is_very_small_triangle(op))
    }

    /// Removes collinear points and spikes from a finished closed record,
    /// then splits it wherever it crosses itself.
    ///
    /// With `preserve_collinear`, only spikes and duplicate points go.
    pub(super) fn clean_collinear(&mut self, outrec: OutRecIdx) {
        let Some(outrec) = self.find_live(Some(outrec)) else {
            return;
        };
        if self.outrecs[outrec].is_open {
            return;
        }
        if !self.is_valid_closed_path(self.outrecs[outrec].pts) {
            self.outrecs[outrec].pts = None;
            return;
        }
        let Some(mut start_op) = self.outrecs[outrec].pts else {
            return;
        };
        let mut op2 = start_op;
        loop {
            let OutPt { pt, next, prev, .. } = self.outpts[op2];
            let prev_pt = self.outpts[prev].pt;
            let next_pt = self.outpts[next].pt;
            if is_collinear(prev_pt, pt, next_pt)
                && (pt == prev_pt
                    || pt == next_pt
                    || !self.opts.preserve_collinear
                    || dot_product(prev_pt, pt, next_pt) < 0.0)
            {
                if Some(op2) == self.outrecs[outrec].pts {
                    self.outrecs[outrec].pts = Some(prev);
                }
                let remaining = self.dispose_outpt(op2);
                if !self.is_valid_closed_path(remaining) {
                    self.outrecs[outrec].pts = None;
                    return;
                }
                let Some(remaining) = remaining else {
                    return;
                };
                op2 = remaining;
                start_op = remaining;
                continue;
            }
            op2 = next;
            if op2 == start_op {
                break;
            }
        }
        self.fix_self_intersects(outrec);
    }

    fn fix_self_intersects(&mut self, outrec: OutRecIdx) {
        let Some(mut op2) = self.outrecs[outrec].pts else {
            return;
        };
        // Triangles can't self-intersect.
        if self.outpts[op2].prev == self.outpts[self.outpts[op2].next].next {
            return;
        }
        loop {
            let o = &self.outpts[op2];
            let next = o.next;
            let next_next = self.outpts[next].next;
            if segments_intersect(
                self.outpts[o.prev].pt,
                o.pt,
                self.outpts[next].pt,
                self.outpts[next_next].pt,
                false,
            ) {
                if let Some(pts) = self.outrecs[outrec].pts {
                    if op2 == pts || next == pts {
                        self.outrecs[outrec].pts = Some(self.outpts[pts].prev);
                    }
                }
                self.do_split_op(outrec, op2);
                let Some(pts) = self.outrecs[outrec].pts else {
                    return;
                };
                op2 = pts;
                if self.outpts[op2].prev == self.outpts[self.outpts[op2].next].next {
                    break;
                }
                continue;
            }
            op2 = next;
            if Some(op2) == self.outrecs[outrec].pts {
                break;
            }
        }
    }

    /// Cuts out the loop formed where the segments either side of
    /// `split_op -> split_op.next` cross.
    ///
    /// The loop becomes a new record if it's big enough and winds the same
    /// way as the remaining ring; otherwise it's dropped.
    fn do_split_op(&mut self, outrec: OutRecIdx, split_op: OutPtIdx) {
        let prev_op = self.outpts[split_op].prev;
        let next_op = self.outpts[split_op].next;
        let next_next_op = self.outpts[next_op].next;
        self.outrecs[outrec].pts = Some(prev_op);

        let ip = segment_intersect_point(
            self.outpts[prev_op].pt,
            self.outpts[split_op].pt,
            self.outpts[next_op].pt,
            self.outpts[next_next_op].pt,
        )
        .unwrap_or_default();

        let area1 = self.area_outpt(prev_op);
        let abs_area1 = area1.abs();
        if abs_area1 < 2.0 {
            self.outrecs[outrec].pts = None;
            return;
        }

        let area2 = area_triangle(ip, self.outpts[split_op].pt, self.outpts[next_op].pt);
        let abs_area2 = area2.abs();

        // Unlink split_op and its successor, inserting the intersection point
        // in their place.
        if ip == self.outpts[prev_op].pt || ip == self.outpts[next_next_op].pt {
            self.outpts[next_next_op].prev = prev_op;
            self.outpts[prev_op].next = next_next_op;
        } else {
            let new_op2 = self.new_outpt(ip, outrec);
            self.outpts[new_op2].prev = prev_op;
            self.outpts[new_op2].next = next_next_op;
            self.outpts[next_next_op].prev = new_op2;
            self.outpts[prev_op].next = new_op2;
        }

        // area1 is the whole ring before splitting, area2 just the loop. They
        // only share a sign if the loop is the bigger part or if the ring
        // crosses itself more than once.
        if !(abs_area2 > 1.0) || (!(abs_area2 > abs_area1) && (area2 > 0.0) != (area1 > 0.0)) {
            return;
        }

        let new_outrec = self.new_outrec();
        self.outrecs[new_outrec].owner = self.outrecs[outrec].owner;
        self.outpts[split_op].outrec = new_outrec;
        self.outpts[next_op].outrec = new_outrec;

        let new_op = self.new_outpt(ip, new_outrec);
        self.outpts[new_op].prev = next_op;
        self.outpts[new_op].next = split_op;
        self.outrecs[new_outrec].pts = Some(new_op);
        self.outpts[split_op].prev = new_op;
        self.outpts[next_op].next = new_op;

        if self.opts.using_polytree {
            if self.path1_inside_path2(prev_op, new_op) {
                self.outrecs[new_outrec].splits.push(outrec);
            } else {
                self.outrecs[outrec].splits.push(new_outrec);
            }
        }
    }

    /// Classifies `pt` against the ring containing `op`.
    pub(super) fn point_in_op_polygon(&self, pt: Point64, op: OutPtIdx) -> PointInPolygonResult {
        let first = &self.outpts[op];
        if op == first.next || first.prev == first.next {
            return PointInPolygonResult::IsOutside;
        }

        // Start from a point that isn't on pt's horizontal.
        let mut op = op;
        let op_start = op;
        loop {
            if self.outpts[op].pt.y != pt.y {
                break;
            }
            op = self.outpts[op].next;
            if op == op_start {
                break;
            }
        }
        if self.outpts[op].pt.y == pt.y {
            return PointInPolygonResult::IsOutside;
        }

        let mut is_above = self.outpts[op].pt.y < pt.y;
        let starting_above = is_above;
        let mut val = 0;
        let mut op2 = self.outpts[op].next;
        while op2 != op {
            if is_above {
                while op2 != op && self.outpts[op2].pt.y < pt.y {
                    op2 = self.outpts[op2].next;
                }
            } else {
                while op2 != op && self.outpts[op2].pt.y > pt.y {
                    op2 = self.outpts[op2].next;
                }
            }
            if op2 == op {
                break;
            }

            let cur = self.outpts[op2].pt;
            let prev = self.outpts[self.outpts[op2].prev].pt;
            if cur.y == pt.y {
                if cur.x == pt.x || (cur.y == prev.y && (pt.x < prev.x) != (pt.x < cur.x)) {
                    return PointInPolygonResult::IsOn;
                }
                op2 = self.outpts[op2].next;
                if op2 == op {
                    break;
                }
                continue;
            }

            if cur.x <= pt.x || prev.x <= pt.x {
                if prev.x < pt.x && cur.x < pt.x {
                    val = 1 - val;
                } else {
                    let d = cross_product(prev, cur, pt);
                    if d == 0.0 {
                        return PointInPolygonResult::IsOn;
                    }
                    if (d < 0.0) == is_above {
                        val = 1 - val;
                    }
                }
            }
            is_above = !is_above;
            op2 = self.outpts[op2].next;
        }

        if is_above != starting_above {
            let cur = self.outpts[op2].pt;
            let prev = self.outpts[self.outpts[op2].prev].pt;
            let d = cross_product(prev, cur, pt);
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

    /// Is the ring containing `op1` inside the ring containing `op2`?
    ///
    /// Two consecutive vertices on the same side decide. Failing that, the
    /// rings are compared again with collinear runs removed.
    pub(super) fn path1_inside_path2(&self, op1: OutPtIdx, op2: OutPtIdx) -> bool {
        let mut pip = PointInPolygonResult::IsOn;
        let mut op = op1;
        loop {
            match self.point_in_op_polygon(self.outpts[op].pt, op2) {
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
            op = self.outpts[op].next;
            if op == op1 {
                break;
            }
        }
        path2_contains_path1(&self.clean_path(op1), &self.clean_path(op2))
    }

    /// The ring's points, minus the middles of horizontal or vertical runs.
    fn clean_path(&self, op: OutPtIdx) -> Path64 {
        let pts = &self.outpts;
        let mut result = Vec::new();
        let mut op2 = op;
        while pts[op2].next != op {
            let (p, n, q) = (pts[op2].pt, pts[pts[op2].next].pt, pts[pts[op2].prev].pt);
            if !((p.x == n.x && p.x == q.x) || (p.y == n.y && p.y == q.y)) {
                break;
            }
            op2 = pts[op2].next;
        }
        result.push(pts[op2].pt);
        let mut prev_op = op2;
        op2 = pts[op2].next;
        while op2 != op {
            let (p, n, q) = (pts[op2].pt, pts[pts[op2].next].pt, pts[prev_op].pt);
            if (p.x != n.x || p.x != q.x) && (p.y != n.y || p.y != q.y) {
                result.push(p);
                prev_op = op2;
            }
            op2 = pts[op2].next;
        }
        result
    }

    /// Hands `from`'s split list over to `to`.
    pub(super) fn move_splits(&mut self, from: OutRecIdx, to: OutRecIdx) {
        let splits = std::mem::take(&mut self.outrecs[from].splits);
        self.outrecs[to]
            .splits
            .extend(splits.into_iter().filter(|&s| s != to));
    }
}

/// Twice the signed area of a triangle.
fn area_triangle(pt1: Point64, pt2: Point64, pt3: Point64) -> f64 {
    (pt3.y + pt1.y) as f64 * (pt3.x - pt1.x) as f64
        + (pt1.y + pt2.y) as f64 * (pt1.x - pt2.x) as f64
        + (pt2.y + pt3.y) as f64 * (pt2.x - pt3.x) as f64
}
